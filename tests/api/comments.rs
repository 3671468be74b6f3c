use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::TestApp;

fn valid_comment() -> serde_json::Value {
    json!({
        "name": "Frank",
        "email": "reader@test.com",
        "comment": "Great article, thanks for sharing!",
        "postTitle": "Rust services",
        "postSlug": "rust-services"
    })
}

#[tokio::test]
async fn comment_returns_200_and_forwards_it_by_email() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.post_comment(valid_comment()).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let received_requests = test_app.email_server.received_requests().await.unwrap();
    let email: serde_json::Value = serde_json::from_slice(&received_requests[0].body).unwrap();
    assert_eq!(email["subject"], "New comment on: Rust services");
    let text = email["content"][0]["value"].as_str().unwrap();
    assert!(text.contains("reader@test.com"));
    assert!(text.contains("/blog/rust-services"));
}

#[tokio::test]
async fn comment_is_accepted_even_if_the_email_fails() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.post_comment(valid_comment()).await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn comment_is_accepted_without_email_delivery() {
    let test_app = TestApp::spawn_app_with(|config| config.email_client = None).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.post_comment(valid_comment()).await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn comment_returns_400_when_body_is_invalid() {
    let test_app = TestApp::spawn_app().await;
    let mut missing_title = valid_comment();
    missing_title["postTitle"] = json!("");
    let mut invalid_email = valid_comment();
    invalid_email["email"] = json!("not-an-email");
    let mut short_comment = valid_comment();
    short_comment["comment"] = json!("Nice!");
    let mut invalid_name = valid_comment();
    invalid_name["name"] = json!("<script>");

    let test_cases = vec![
        (missing_title, "All fields are required"),
        (invalid_email, "Invalid email"),
        (short_comment, "Comment must be at least 10 characters long"),
        (invalid_name, "Invalid name"),
    ];

    for (invalid_body, expected_error) in test_cases {
        let response = test_app.post_comment(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status for {}",
            expected_error
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], expected_error);
    }
}
