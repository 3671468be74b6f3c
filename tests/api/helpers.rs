use reqwest::Response;
use secrecy::Secret;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::MockServer;

use portfolio_site::{
    config::{
        get_configuration, EmailClientSettings, MailchimpSettings, NewsletterProvider, Settings,
    },
    startup::Application,
};

pub const NOTIFY_SECRET: &str = "notify-secret";

/// Three posts: two share the `Backend` tag, one is long enough to take two minutes to read.
const FIXTURE_POSTS: [(&str, &str); 3] = [
    (
        "rust-services.mdx",
        "---\ntitle: \"Rust services\"\nsummary: \"Building APIs with actix\"\npublishedAt: \"2024-03-01\"\ntags: [\"Rust\", \"Backend\"]\n---\n",
    ),
    (
        "automating-with-n8n.mdx",
        "---\ntitle: \"Automating with n8n\"\nsummary: \"Webhooks everywhere\"\npublishedAt: \"2024-05-01\"\ntag: Automation\n---\nA short post about workflows.\n",
    ),
    (
        "backend-apis.md",
        "---\ntitle: \"Designing backend APIs\"\nsummary: \"Status codes and JSON bodies\"\npublishedAt: \"2024-01-01\"\ntag: Backend\n---\nKeep the error bodies consistent.\n",
    ),
];

pub struct TestApp {
    pub address: String,
    pub config: Settings,
    pub data_directory: PathBuf,
    pub email_server: MockServer,
    pub chat_server: MockServer,
    pub mailchimp_server: MockServer,
    pub api_client: reqwest::Client,
    // Removed together with the posts and store files when the test ends
    _root: TempDir,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        Self::spawn_app_with(|_| {}).await
    }

    /// `customize` runs after the test servers are wired in and before the app is built.
    pub async fn spawn_app_with(customize: impl FnOnce(&mut Settings)) -> TestApp {
        let mut config = get_configuration().expect("Missing configuration file.");
        let email_server = MockServer::start().await;
        let chat_server = MockServer::start().await;
        let mailchimp_server = MockServer::start().await;

        // Every test gets its own posts and data files
        let root = tempfile::tempdir().expect("Failed to create a temporary directory.");
        let posts_directory = root.path().join("posts");
        let data_directory = root.path().join("data");
        write_fixture_posts(&posts_directory);

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);
        config.blog.posts_directory = posts_directory;
        config.storage.data_directory = data_directory.clone();
        config.set_chat_webhook_url(Some(format!("{}/webhook/chat", chat_server.uri())));
        config.email_client = Some(EmailClientSettings {
            base_url: email_server.uri(),
            sender_email: String::from("owner@example.com"),
            api_key: Secret::new(String::from("email-key")),
            timeout_milliseconds: Some(2000),
        });
        config.newsletter.provider = NewsletterProvider::File;
        config.newsletter.notify_secret = Some(Secret::new(String::from(NOTIFY_SECRET)));
        config.mailchimp = Some(MailchimpSettings {
            api_key: Secret::new(String::from("mailchimp-key")),
            server: String::from("us22"),
            audience_id: String::from("audience"),
            base_url: Some(mailchimp_server.uri()),
            timeout_milliseconds: Some(2000),
        });

        customize(&mut config);

        let application = Application::build(config.clone())
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            config,
            data_directory,
            email_server,
            chat_server,
            mailchimp_server,
            api_client: reqwest::Client::new(),
            _root: root,
        }
    }

    pub async fn post_json(&self, route: &str, body: &serde_json::Value) -> Response {
        self.api_client
            .post(format!("{}{}", self.address, route))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, route: &str) -> Response {
        self.api_client
            .get(format!("{}{}", self.address, route))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_chat(&self, body: serde_json::Value) -> Response {
        self.post_json("/api/chat", &body).await
    }

    pub async fn post_comment(&self, body: serde_json::Value) -> Response {
        self.post_json("/api/comments", &body).await
    }

    pub async fn post_subscription(&self, email: &str) -> Response {
        self.post_json(
            "/api/newsletter/subscribe",
            &serde_json::json!({ "email": email }),
        )
        .await
    }

    pub async fn post_unsubscription(&self, email: &str) -> Response {
        self.post_json(
            "/api/newsletter/unsubscribe",
            &serde_json::json!({ "email": email }),
        )
        .await
    }

    pub async fn post_notification(&self, body: serde_json::Value) -> Response {
        self.post_json("/api/newsletter/notify", &body).await
    }

    /// Subscribers as persisted in `newsletter.json`.
    pub fn stored_emails(&self) -> Vec<String> {
        read_json(&self.data_directory.join("newsletter.json"))
            .map(|store| {
                store["subscribers"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|subscriber| subscriber["email"].as_str().unwrap().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn notified_slugs(&self) -> Vec<String> {
        read_json(&self.data_directory.join("notified.json"))
            .map(|store| {
                store["slugs"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|slug| slug.as_str().unwrap().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn write_fixture_posts(directory: &Path) {
    std::fs::create_dir_all(directory).expect("Failed to create the posts directory.");

    for (file_name, frontmatter) in FIXTURE_POSTS {
        let mut document = String::from(frontmatter);
        if file_name == "rust-services.mdx" {
            document.push_str(&"word ".repeat(250));
        }
        std::fs::write(directory.join(file_name), document)
            .expect("Failed to write a fixture post.");
    }
}

fn read_json(path: &Path) -> Option<serde_json::Value> {
    let raw = std::fs::read_to_string(path).ok()?;
    Some(serde_json::from_str(&raw).expect("Store file is not valid JSON."))
}
