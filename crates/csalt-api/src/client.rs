// User API HTTP client
//
// Wraps `reqwest::Client` with base-URL handling, the `Authorization`
// token header, and status-code → `Error` mapping. Endpoint methods live
// in `auth.rs` and `devices.rs` as inherent impls.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// HTTP client for the Cacophony user API.
///
/// Holds the username the session belongs to and, once authenticated, the
/// bearer token sent in the `Authorization` header.
pub struct UserApiClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    token: Option<SecretString>,
}

impl UserApiClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        username: String,
        token: Option<SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, username, token))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: String,
        token: Option<SecretString>,
    ) -> Self {
        Self {
            http,
            base_url,
            username,
            token,
        }
    }

    /// The user this client authenticates as.
    pub fn user(&self) -> &str {
        &self.username
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The current token, if any.
    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    /// Forget the current token (e.g. after the server rejected it).
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path, keeping any path prefix on the base URL.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&full)?)
    }

    /// The `Authorization` header value, or an auth error when no token is held.
    pub(crate) fn authorization(&self) -> Result<&str, Error> {
        self.token
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .ok_or_else(|| Error::Authentication {
                message: format!("no token held for {}", self.username),
            })
    }

    // ── Response handling ────────────────────────────────────────────

    /// Map the response status to an `Error`, or decode the JSON body.
    pub(crate) async fn parse_json<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: error_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
            });
        }

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(Error::Validation {
                message: error_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
            });
        }

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_else(|| "no response body".into()),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.messages.is_empty() {
            return Some(parsed.messages.join("; "));
        }
        if parsed.message.is_some() {
            return parsed.message;
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
