//! OAuth access tokens for the BigQuery API
//!
//! A static token from configuration wins. Otherwise tokens are fetched from
//! the GCE metadata server for the default service account and cached until
//! shortly before they expire.

use super::models::TokenResponse;
use crate::config::{secret_string, BigQueryConfig, SecretString};
use crate::domain::{BackupError, Result};
use reqwest::Client;
use secrecy::ExposeSecret;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const METADATA_TOKEN_PATH: &str =
    "/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens are refreshed this long before the server-reported expiry
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Token fetched from the metadata server with its refresh deadline
pub struct CachedToken {
    token: SecretString,
    expires_at: Instant,
}

/// Source of bearer tokens for BigQuery requests
pub enum TokenSource {
    Static(SecretString),
    Metadata {
        url: String,
        cache: RwLock<Option<CachedToken>>,
    },
}

impl TokenSource {
    pub fn from_config(config: &BigQueryConfig) -> Self {
        match config.access_token {
            Some(ref token) if !token.expose_secret().is_empty() => {
                TokenSource::Static(token.clone())
            }
            _ => TokenSource::Metadata {
                url: format!(
                    "{}{}",
                    config.metadata_endpoint.trim_end_matches('/'),
                    METADATA_TOKEN_PATH
                ),
                cache: RwLock::new(None),
            },
        }
    }

    /// Return a valid token, fetching a fresh one from the metadata server
    /// when the cached token is missing or about to expire
    pub async fn token(&self, client: &Client) -> Result<SecretString> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Metadata { url, cache } => {
                if let Some(cached) = cache.read().await.as_ref() {
                    if cached.expires_at > Instant::now() {
                        return Ok(cached.token.clone());
                    }
                }

                let mut guard = cache.write().await;
                // Another task may have refreshed while we waited for the lock.
                if let Some(cached) = guard.as_ref() {
                    if cached.expires_at > Instant::now() {
                        return Ok(cached.token.clone());
                    }
                }

                let fetched = fetch_metadata_token(client, url).await?;
                let lifetime = Duration::from_secs(fetched.expires_in.unwrap_or(300));
                let token = secret_string(fetched.access_token);
                *guard = Some(CachedToken {
                    token: token.clone(),
                    expires_at: Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN),
                });

                tracing::debug!(
                    expires_in_secs = lifetime.as_secs(),
                    "Fetched access token from metadata server"
                );
                Ok(token)
            }
        }
    }
}

async fn fetch_metadata_token(client: &Client, url: &str) -> Result<TokenResponse> {
    let resp = client
        .get(url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| {
            BackupError::Authentication(format!("metadata server unreachable: {e}"))
        })?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(BackupError::Authentication(format!(
            "metadata server returned {status}: {body}"
        )));
    }

    resp.json::<TokenResponse>()
        .await
        .map_err(|e| BackupError::Authentication(format!("invalid token response: {e}")))
}
