use portfolio_site::config::NewsletterProvider;
use serde_json::json;
use wiremock::matchers::{any, body_json, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::TestApp;

#[tokio::test]
async fn subscribe_returns_200_and_persists_the_subscriber() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.post_subscription("frank@test.com").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert!(body.get("duplicated").is_none());
    assert_eq!(test_app.stored_emails(), vec!["frank@test.com"]);
}

#[tokio::test]
async fn subscribe_normalises_the_email() {
    let test_app = TestApp::spawn_app().await;

    test_app.post_subscription("  Frank@Test.COM ").await;

    assert_eq!(test_app.stored_emails(), vec!["frank@test.com"]);
}

#[tokio::test]
async fn subscribing_twice_is_reported_as_duplicated() {
    let test_app = TestApp::spawn_app().await;

    test_app.post_subscription("frank@test.com").await;
    let response = test_app.post_subscription("FRANK@test.com").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["duplicated"], true);
    assert_eq!(test_app.stored_emails().len(), 1);
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_invalid() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (json!({}), "missing email"),
        (json!({ "email": "" }), "empty email"),
        (json!({ "email": "definitely-not-an-email" }), "invalid email"),
        (json!({ "email": "reader@localhost" }), "domain without a dot"),
        (json!({ "email": "x@[127.0.0.1]" }), "ip literal domain"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app
            .post_json("/api/newsletter/subscribe", &invalid_body)
            .await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Invalid email");
    }
    assert!(test_app.stored_emails().is_empty());
}

#[tokio::test]
async fn subscribe_returns_400_when_body_is_not_json() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .api_client
        .post(format!("{}/api/newsletter/subscribe", test_app.address))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn subscribe_adds_a_list_member_with_the_mailchimp_provider() {
    let test_app = TestApp::spawn_app_with(|config| {
        config.newsletter.provider = NewsletterProvider::Mailchimp
    })
    .await;

    Mock::given(path("/lists/audience/members"))
        .and(method("POST"))
        .and(header_exists("Authorization"))
        .and(body_json(json!({
            "email_address": "frank@test.com",
            "status": "subscribed"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "member" })))
        .expect(1)
        .mount(&test_app.mailchimp_server)
        .await;

    let response = test_app.post_subscription("frank@test.com").await;

    assert_eq!(200, response.status().as_u16());
    assert!(test_app.stored_emails().is_empty());
}

#[tokio::test]
async fn existing_mailchimp_member_is_reported_as_duplicated() {
    let test_app = TestApp::spawn_app_with(|config| {
        config.newsletter.provider = NewsletterProvider::Mailchimp
    })
    .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "Member Exists",
            "status": 400
        })))
        .mount(&test_app.mailchimp_server)
        .await;

    let response = test_app.post_subscription("frank@test.com").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["duplicated"], true);
}

#[tokio::test]
async fn subscribe_returns_500_when_mailchimp_rejects_the_member() {
    let test_app = TestApp::spawn_app_with(|config| {
        config.newsletter.provider = NewsletterProvider::Mailchimp
    })
    .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "Invalid Resource",
            "status": 400
        })))
        .mount(&test_app.mailchimp_server)
        .await;

    let response = test_app.post_subscription("frank@test.com").await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn unsubscribe_removes_the_subscriber() {
    let test_app = TestApp::spawn_app().await;
    test_app.post_subscription("frank@test.com").await;
    test_app.post_subscription("ana@test.com").await;

    let response = test_app.post_unsubscription("Frank@test.com").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(test_app.stored_emails(), vec!["ana@test.com"]);
}

#[tokio::test]
async fn unsubscribing_an_unknown_email_still_succeeds() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.post_unsubscription("nobody@test.com").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "The email was not subscribed");
}

#[tokio::test]
async fn unsubscribe_returns_400_when_email_is_invalid() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.post_unsubscription("nope").await;

    assert_eq!(400, response.status().as_u16());
}
