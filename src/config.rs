use std::path::PathBuf;
use std::time;

use config::{Config, ConfigError, File};
use secrecy::Secret;
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};

use crate::blog::stats::DEFAULT_WORDS_PER_MINUTE;
use crate::domain::subscriber_email::SubscriberEmail;

#[derive(Debug)]
pub enum Environment {
    Development,
    Production,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub blog: BlogSettings,
    pub storage: StorageSettings,
    pub chat: ChatSettings,
    pub newsletter: NewsletterSettings,
    pub mailchimp: Option<MailchimpSettings>,
    pub email_client: Option<EmailClientSettings>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    // Public URL of the site, used for links inside emails
    pub base_url: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct BlogSettings {
    pub posts_directory: PathBuf,
    #[serde(
        default = "default_words_per_minute",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub words_per_minute: u32,
}

fn default_words_per_minute() -> u32 {
    DEFAULT_WORDS_PER_MINUTE
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct StorageSettings {
    pub data_directory: PathBuf,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ChatSettings {
    // Chat is disabled (500 on every message) while this is unset
    pub webhook_url: Option<String>,
    pub api_key: Option<Secret<String>>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub timeout_milliseconds: Option<u64>,
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NewsletterProvider {
    File,
    Mailchimp,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct NewsletterSettings {
    pub provider: NewsletterProvider,
    // Shared secret required by the notify endpoint. Unset means notify always answers 401.
    pub notify_secret: Option<Secret<String>>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct MailchimpSettings {
    pub api_key: Secret<String>,
    // Data center prefix, e.g. "us22"
    pub server: String,
    pub audience_id: String,
    pub base_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub timeout_milliseconds: Option<u64>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub api_key: Secret<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub timeout_milliseconds: Option<u64>,
}

impl Settings {
    pub fn get_address(&self) -> String {
        format!(
            "{}:{}",
            self.application.get_host(),
            self.application.get_port()
        )
    }

    pub fn get_app_base_url(&self) -> String {
        self.application.get_base_url()
    }

    pub fn set_app_port(&mut self, port: u16) {
        self.application.port = port;
    }

    pub fn set_chat_webhook_url(&mut self, webhook_url: Option<String>) {
        self.chat.webhook_url = webhook_url
    }
}

impl ApplicationSettings {
    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_host(&self) -> String {
        self.host.clone()
    }

    pub fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}

impl ChatSettings {
    pub fn get_timeout(&self) -> Option<time::Duration> {
        self.timeout_milliseconds.map(time::Duration::from_millis)
    }
}

impl MailchimpSettings {
    pub fn get_base_url(&self) -> String {
        match &self.base_url {
            Some(base_url) => base_url.clone(),
            None => format!("https://{}.api.mailchimp.com/3.0", self.server),
        }
    }

    pub fn get_timeout(&self) -> Option<time::Duration> {
        self.timeout_milliseconds.map(time::Duration::from_millis)
    }
}

impl EmailClientSettings {
    pub fn get_sender_email(&self) -> Result<SubscriberEmail, String> {
        SubscriberEmail::parse(self.sender_email.clone())
    }

    pub fn get_base_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn get_api_key(&self) -> Secret<String> {
        self.api_key.clone()
    }

    pub fn get_timeout(&self) -> Option<time::Duration> {
        self.timeout_milliseconds.map(time::Duration::from_millis)
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            unknown_env => Err(format!(
                "{} is not supported environment. Use either 'development' or 'production'.",
                unknown_env
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let root_path = std::env::current_dir()
        .map_err(|err| {
            ConfigError::Message(format!(
                "Failed to determine the current directory: {}",
                err
            ))
        })?;
    let config_directory = root_path.join("config");
    // Uses development environment by default
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "development".into())
        .try_into()
        .map_err(ConfigError::Message)?;
    let config_base_filepath = config_directory.join("base");
    let config_env_filepath = config_directory.join(environment.as_str());

    // It merges the base configuration file with the one from the specific environment (development or production)
    let settings = Config::builder()
        .add_source(File::from(config_base_filepath).required(true))
        .add_source(File::from(config_env_filepath).required(true))
        // Merge settings from environment variables with a prefix of APP and "__" separator
        // E.g APP_CHAT__WEBHOOK_URL would set Settings.chat.webhook_url
        .add_source(
            config::Environment::with_prefix("app")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    tracing::info!("Application environment = {:?}", environment);

    // Try to convert the value from the configuration file into a Settings type
    settings.try_deserialize()
}
