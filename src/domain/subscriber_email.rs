use std::fmt;

use validator::validate_email;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Normalises (trim + lowercase) and validates an email address.
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        let normalized = normalize(&email);

        if normalized.is_empty() {
            return Err(String::from("email cannot be empty"));
        }

        if !validate_email(&normalized) || !has_dotted_domain(&normalized) {
            return Err(format!("{} email is not valid", email));
        }

        Ok(Self(normalized))
    }
}

pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Site addresses only: `reader@localhost` or `x@[127.0.0.1]` are not accepted.
fn has_dotted_domain(email: &str) -> bool {
    email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| !domain.starts_with('[') && domain.contains('.'))
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
