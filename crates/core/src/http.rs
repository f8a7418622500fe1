//! Shared HTTP transport for the Cognite APIs
//!
//! Attaches the bearer token, retries throttled and failed requests with
//! exponential backoff and decodes JSON bodies. Errors come back as
//! [`TransportError`] and are mapped by each client to its own error type.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::TokenProvider;
use crate::error::{AuthError, DestinationError, SourceError};

/// Failure of a single API call after retries
#[derive(Debug)]
pub enum TransportError {
    Network(String),
    Status { status: u16, body: String },
    Parse(String),
    Auth(AuthError),
}

impl TransportError {
    /// Attach the endpoint and convert for the source side
    pub fn into_source(self, endpoint: &str) -> SourceError {
        let endpoint = endpoint.to_string();
        match self {
            TransportError::Network(reason) => SourceError::Network { endpoint, reason },
            TransportError::Status { status, body } => SourceError::Status {
                endpoint,
                status,
                body,
            },
            TransportError::Parse(reason) => SourceError::Parse { endpoint, reason },
            TransportError::Auth(err) => SourceError::Auth(err),
        }
    }

    /// Attach the endpoint and convert for the destination side
    pub fn into_destination(self, endpoint: &str) -> DestinationError {
        let endpoint = endpoint.to_string();
        match self {
            TransportError::Network(reason) => DestinationError::Network { endpoint, reason },
            TransportError::Status { status, body } => DestinationError::Status {
                endpoint,
                status,
                body,
            },
            TransportError::Parse(reason) => DestinationError::Parse { endpoint, reason },
            TransportError::Auth(err) => err.into(),
        }
    }
}

/// Whether a status is worth retrying
pub fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Backoff before retry number `attempt` (0-based): 100ms, 200ms, 400ms, ...
pub fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(100 * (1u64 << attempt.min(16)))
}

/// JSON-over-HTTP transport bound to one API root
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_root: String,
    tokens: Arc<TokenProvider>,
    max_retries: u32,
}

impl HttpTransport {
    /// Create a transport; `api_root` is prefixed to every path
    pub fn new(
        client: reqwest::Client,
        api_root: impl Into<String>,
        tokens: Arc<TokenProvider>,
        max_retries: u32,
    ) -> Self {
        Self {
            client,
            api_root: api_root.into().trim_end_matches('/').to_string(),
            tokens,
            max_retries,
        }
    }

    /// Full URL of a path below the API root
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, TransportError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(backoff(attempt - 1)).await;
            }

            let token = self.tokens.token().await.map_err(TransportError::Auth)?;
            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", token))
                .json(body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    warn!(url = %url, attempt, error = %e, "Request failed");
                    last_error = Some(TransportError::Network(e.to_string()));
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| TransportError::Network(e.to_string()))?;
                // Some ingest endpoints answer with an empty body
                let text = if text.trim().is_empty() { "null" } else { &text };
                return serde_json::from_str(text).map_err(|e| TransportError::Parse(e.to_string()));
            }

            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::UNAUTHORIZED && attempt == 0 {
                debug!(url = %url, "Unauthorized, refreshing token");
                self.tokens.invalidate().await;
                last_error = Some(TransportError::Status {
                    status: status.as_u16(),
                    body,
                });
                continue;
            }
            if !is_retryable(status) {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            warn!(url = %url, attempt, status = status.as_u16(), "Retryable response");
            last_error = Some(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Err(last_error.unwrap_or_else(|| TransportError::Network("request was not sent".to_string())))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthMethod;
    use serde_json::{Value, json};

    fn transport(base: &str, max_retries: u32) -> HttpTransport {
        let tokens = Arc::new(TokenProvider::new(AuthMethod::Token("t0k3n".to_string())));
        HttpTransport::new(reqwest::Client::new(), format!("{base}/api"), tokens, max_retries)
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff(0), Duration::from_millis(100));
        assert_eq!(backoff(1), Duration::from_millis(200));
        assert_eq!(backoff(3), Duration::from_millis(800));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_url_joins_paths() {
        let t = transport("http://localhost", 0);
        assert_eq!(t.url("/assets/list"), "http://localhost/api/assets/list");
        assert_eq!(t.url("assets/list"), "http://localhost/api/assets/list");
    }

    #[tokio::test]
    async fn test_post_retries_then_succeeds() {
        let (base, recorded) = test_server::serve(vec![
            (503, "{}".to_string()),
            (429, "{}".to_string()),
            (200, r#"{"ok":true}"#.to_string()),
        ])
        .await;

        let result: Value = transport(&base, 3)
            .post("things/list", &json!({"limit": 1}))
            .await
            .unwrap();

        assert_eq!(result, json!({"ok": true}));
        let requests = recorded.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].0, "/api/things/list");
        assert_eq!(requests[0].1, r#"{"limit":1}"#);
    }

    #[tokio::test]
    async fn test_post_gives_up_after_max_retries() {
        let (base, _) =
            test_server::serve(vec![(500, "boom".to_string()), (500, "boom".to_string())]).await;

        let result: Result<Value, _> = transport(&base, 1).post("x", &json!({})).await;
        match result {
            Err(TransportError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let (base, recorded) = test_server::serve(vec![(400, "bad".to_string())]).await;

        let result: Result<Value, _> = transport(&base, 3).post("x", &json!({})).await;
        assert!(matches!(result, Err(TransportError::Status { status: 400, .. })));
        assert_eq!(recorded.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_body_decodes_as_unit() {
        let (base, _) = test_server::serve(vec![(200, String::new())]).await;
        let result: Result<(), _> = transport(&base, 0).post("x", &json!({})).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_error_mapping_keeps_endpoint() {
        let err = TransportError::Status {
            status: 404,
            body: "nope".to_string(),
        }
        .into_destination("wells/ingest");
        assert!(err.to_string().contains("wells/ingest"));

        let err = TransportError::Network("refused".to_string()).into_source("assets/list");
        assert!(matches!(err, SourceError::Network { .. }));
    }
}
