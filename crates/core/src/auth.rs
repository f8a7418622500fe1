//! Bearer token acquisition
//!
//! One [`TokenProvider`] is shared by the source and destination clients. A
//! static token is returned as is; client-credentials tokens are cached and
//! refreshed shortly before they expire.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::AuthMethod;
use crate::error::AuthError;

/// Tokens closer than this to expiry are refreshed, capped at half the
/// token lifetime
pub const REFRESH_MARGIN: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

impl CachedToken {
    fn issued(value: String, now: Instant, lifetime: Duration) -> Self {
        let margin = REFRESH_MARGIN.min(lifetime / 2);
        Self {
            value,
            refresh_at: now + (lifetime - margin),
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now < self.refresh_at
    }
}

/// Supplies bearer tokens for API calls
pub struct TokenProvider {
    method: AuthMethod,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Create a provider for the given method
    pub fn new(method: AuthMethod) -> Self {
        Self::with_client(method, reqwest::Client::new())
    }

    /// Create a provider reusing an existing HTTP client
    pub fn with_client(method: AuthMethod, client: reqwest::Client) -> Self {
        Self {
            method,
            client,
            cached: Mutex::new(None),
        }
    }

    /// Current bearer token, fetching a new one when needed
    pub async fn token(&self) -> Result<String, AuthError> {
        let (client_id, client_secret, token_url, scopes) = match &self.method {
            AuthMethod::Token(token) => return Ok(token.clone()),
            AuthMethod::ClientCredentials {
                client_id,
                client_secret,
                token_url,
                scopes,
            } => (client_id, client_secret, token_url, scopes),
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }

        debug!(token_url = %token_url, "Requesting access token");
        let scope = scopes.join(" ");
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("scope", scope.as_str()),
        ];

        let response = self
            .client
            .post(token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        let token = CachedToken::issued(
            parsed.access_token,
            Instant::now(),
            Duration::from_secs(parsed.expires_in),
        );
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Drop any cached token so the next call fetches a new one
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}
