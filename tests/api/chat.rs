use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::TestApp;

#[tokio::test]
async fn chat_forwards_the_message_and_returns_the_webhook_reply() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/webhook/chat"))
        .and(method("POST"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "message": "Hello there" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "output": "Hi!" })))
        .expect(1)
        .mount(&test_app.chat_server)
        .await;

    let response = test_app.post_chat(json!({ "message": "Hello there" })).await;

    assert_eq!(200, response.status().as_u16());
    let reply: serde_json::Value = response.json().await.unwrap();
    assert_eq!(reply["output"], "Hi!");
}

#[tokio::test]
async fn chat_wraps_replies_without_a_known_field() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/webhook/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": 42 })))
        .mount(&test_app.chat_server)
        .await;

    let response = test_app.post_chat(json!({ "message": "Hello" })).await;

    let reply: serde_json::Value = response.json().await.unwrap();
    assert_eq!(reply["response"], r#"{"answer":42}"#);
}

#[tokio::test]
async fn chat_returns_400_when_message_is_missing_or_blank() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (json!({}), "missing message"),
        (json!({ "message": "   " }), "blank message"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_chat(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Message is required");
    }
}

#[tokio::test]
async fn chat_returns_500_when_webhook_is_not_configured() {
    let test_app = TestApp::spawn_app_with(|config| config.set_chat_webhook_url(None)).await;

    let response = test_app.post_chat(json!({ "message": "Hello" })).await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Chat webhook URL not configured");
}

#[tokio::test]
async fn chat_propagates_the_webhook_error_status() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/webhook/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("workflow offline"))
        .mount(&test_app.chat_server)
        .await;

    let response = test_app.post_chat(json!({ "message": "Hello" })).await;

    assert_eq!(503, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Webhook error: 503");
    assert_eq!(body["details"], "workflow offline");
}

#[tokio::test]
async fn chat_returns_502_when_webhook_reply_is_not_json() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/webhook/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&test_app.chat_server)
        .await;

    let response = test_app.post_chat(json!({ "message": "Hello" })).await;

    assert_eq!(502, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["details"], "Response not JSON");
}
