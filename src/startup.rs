use actix_web::dev::Server;
use actix_web::error::InternalError;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::json;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::blog::loader::BlogError;
use crate::blog::BlogIndex;
use crate::chat_client::ChatClient;
use crate::config::{NewsletterProvider, Settings};
use crate::email_client::EmailClient;
use crate::mailchimp_client::MailchimpClient;
use crate::newsletter::SubscriptionProvider;
use crate::routes::{
    blog_stats, get_post, handle_chat, handle_new_comment, handle_subscribe, handle_unsubscribe,
    health_check, list_posts, list_tags, publish_post_notification, NotifySecret,
};
use crate::storage::notified::NotifiedStore;
use crate::storage::subscribers::SubscriberStore;

/// Public URL of the site, used to build links inside emails.
pub struct ApplicationBaseUrl(pub String);

pub struct Application {
    pub port: u16,
    pub server: Server,
}

/// Everything the request handlers share.
pub struct AppState {
    pub blog: BlogIndex,
    pub subscription_provider: SubscriptionProvider,
    pub subscriber_store: Arc<SubscriberStore>,
    pub notified_store: NotifiedStore,
    pub chat_client: Option<ChatClient>,
    pub email_client: Option<EmailClient>,
    pub base_url: ApplicationBaseUrl,
    pub notify_secret: NotifySecret,
}

#[derive(thiserror::Error)]
pub enum StartupError {
    #[error("Failed to load the configuration.")]
    Config(#[from] config::ConfigError),
    #[error("Failed to load the blog posts.")]
    Blog(#[from] BlogError),
    #[error("Failed to build an HTTP client.")]
    HttpClient(#[from] reqwest::Error),
    #[error("Sender email is not valid: {0}")]
    InvalidSender(String),
    #[error("The mailchimp provider is selected but the mailchimp section is missing.")]
    MissingMailchimp,
    #[error("Failed to start the HTTP server.")]
    Io(#[from] std::io::Error),
}

impl std::fmt::Debug for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::error_chain_fmt(self, f)
    }
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, StartupError> {
        let state = build_state(&config)?;

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, state)?;

        tracing::info!("Server listening on {}:{}", config.application.get_host(), port);

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn build_state(config: &Settings) -> Result<AppState, StartupError> {
    let blog = BlogIndex::load(&config.blog.posts_directory, config.blog.words_per_minute)?;

    let data_directory = &config.storage.data_directory;
    let subscriber_store = Arc::new(SubscriberStore::new(data_directory));
    let notified_store = NotifiedStore::new(data_directory);

    let subscription_provider = match config.newsletter.provider {
        NewsletterProvider::File => SubscriptionProvider::File(subscriber_store.clone()),
        NewsletterProvider::Mailchimp => {
            let mailchimp = config
                .mailchimp
                .as_ref()
                .ok_or(StartupError::MissingMailchimp)?;
            SubscriptionProvider::Mailchimp(MailchimpClient::new(
                mailchimp.get_base_url(),
                mailchimp.audience_id.clone(),
                mailchimp.api_key.clone(),
                mailchimp.get_timeout(),
            )?)
        }
    };

    let chat_client = match &config.chat.webhook_url {
        Some(webhook_url) if !webhook_url.trim().is_empty() => Some(ChatClient::new(
            webhook_url.clone(),
            config.chat.api_key.clone(),
            config.chat.get_timeout(),
        )?),
        _ => {
            tracing::warn!("Chat webhook URL is not configured");
            None
        }
    };

    let email_client = match &config.email_client {
        Some(settings) => {
            let sender = settings
                .get_sender_email()
                .map_err(StartupError::InvalidSender)?;
            Some(EmailClient::new(
                settings.get_base_url(),
                sender,
                settings.get_api_key(),
                settings.get_timeout(),
            )?)
        }
        None => {
            tracing::warn!("Email delivery is not configured");
            None
        }
    };

    Ok(AppState {
        blog,
        subscription_provider,
        subscriber_store,
        notified_store,
        chat_client,
        email_client,
        base_url: ApplicationBaseUrl(config.get_app_base_url()),
        notify_secret: NotifySecret(config.newsletter.notify_secret.clone()),
    })
}

pub fn run(listener: TcpListener, state: AppState) -> Result<Server, std::io::Error> {
    let blog = web::Data::new(state.blog);
    let subscription_provider = web::Data::new(state.subscription_provider);
    let subscriber_store = web::Data::from(state.subscriber_store);
    let notified_store = web::Data::new(state.notified_store);
    let chat_client = web::Data::new(state.chat_client);
    let email_client = web::Data::new(state.email_client);
    let base_url = web::Data::new(state.base_url);
    let notify_secret = web::Data::new(state.notify_secret);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let response =
                    HttpResponse::BadRequest().json(json!({ "error": "Invalid JSON body" }));
                InternalError::from_response(err, response).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let response = HttpResponse::BadRequest()
                    .json(json!({ "error": format!("Invalid query string: {}", err) }));
                InternalError::from_response(err, response).into()
            }))
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .route("/chat", web::post().to(handle_chat))
                    .route("/comments", web::post().to(handle_new_comment))
                    .route("/newsletter/subscribe", web::post().to(handle_subscribe))
                    .route("/newsletter/unsubscribe", web::post().to(handle_unsubscribe))
                    .route("/newsletter/notify", web::post().to(publish_post_notification))
                    .route("/posts", web::get().to(list_posts))
                    .route("/posts/{slug}", web::get().to(get_post))
                    .route("/tags", web::get().to(list_tags))
                    .route("/stats", web::get().to(blog_stats)),
            )
            .app_data(blog.clone())
            .app_data(subscription_provider.clone())
            .app_data(subscriber_store.clone())
            .app_data(notified_store.clone())
            .app_data(chat_client.clone())
            .app_data(email_client.clone())
            .app_data(base_url.clone())
            .app_data(notify_secret.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
