//! Credential handling for webhook URLs and access tokens
//!
//! A Slack incoming-webhook URL and a BigQuery OAuth token are both bearer
//! credentials. They are held in [`SecretString`], which redacts `Debug`
//! output and zeroes the buffer on drop. Call `expose_secret()` only at the
//! point the value goes on the wire.
//!
//! # Example
//!
//! ```rust
//! use bq_backup::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let webhook = secret_string("https://hooks.slack.com/services/T0/B0/abc".to_string());
//! assert!(!format!("{webhook:?}").contains("hooks.slack.com"));
//! assert!(webhook.expose_secret().as_ref().starts_with("https://"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String payload of a secret; zeroized when dropped
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string used for webhook URLs and bearer tokens
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_webhook_not_in_debug_output() {
        let webhook = secret_string("https://hooks.slack.com/services/T0/B0/abc".to_string());
        let debug_output = format!("{webhook:?}");
        assert!(!debug_output.contains("hooks.slack.com"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_expose_secret() {
        let token = secret_string("ya29.token".to_string());
        assert_eq!(token.expose_secret(), "ya29.token");
        assert!(!token.expose_secret().is_empty());
    }

    #[test]
    fn test_blank_secret_is_empty() {
        let token = secret_string("   ".to_string());
        assert!(token.expose_secret().is_empty());
    }

    #[test]
    fn test_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Slack {
            webhook: SecretString,
        }

        let slack: Slack = toml::from_str(r#"webhook = "https://hooks.example.com/x""#).unwrap();
        assert_eq!(slack.webhook.expose_secret(), "https://hooks.example.com/x");
    }
}
