// User API authentication
//
// Password login yields a short session token; `request_token` trades it
// for a longer-lived token suitable for saving between runs.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use crate::client::UserApiClient;
use crate::error::Error;
use crate::models::{LoginRequest, TokenAccess, TokenRequest, TokenResponse};

/// Lifetime class of an issued token. Saved tokens are always long-lived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenTtl {
    #[default]
    Long,
}

impl TokenTtl {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Long => "long",
        }
    }
}

impl fmt::Display for TokenTtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl UserApiClient {
    /// Authenticate with username/password.
    ///
    /// On success the returned session token replaces any token held by
    /// the client. A rejected password is `Error::Authentication`; every
    /// other failure keeps its own kind so callers can tell "wrong password"
    /// from "server unreachable".
    pub async fn authenticate(&mut self, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("authenticate_user")?;
        debug!("authenticating {} at {url}", self.user());

        let body = LoginRequest {
            name_or_email: self.user(),
            password: password.expose_secret(),
        };

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let token = token_from(Self::parse_json(resp).await?)?;
        self.set_token(token);
        debug!("authentication successful");
        Ok(())
    }

    /// Request a new token with the given lifetime, authorised by the
    /// currently held token. Read-only device access is all csalt needs.
    pub async fn request_token(&self, ttl: TokenTtl) -> Result<SecretString, Error> {
        let url = self.api_url("token")?;
        debug!("requesting {ttl} token at {url}");

        let body = TokenRequest {
            ttl,
            access: TokenAccess { devices: "r" },
        };

        let resp = self
            .http()
            .post(url)
            .header(reqwest::header::AUTHORIZATION, self.authorization()?)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        token_from(Self::parse_json(resp).await?)
    }
}

fn token_from(resp: TokenResponse) -> Result<SecretString, Error> {
    match resp.token {
        Some(token) if resp.success && !token.is_empty() => Ok(SecretString::from(token)),
        _ => Err(Error::Authentication {
            message: if resp.messages.is_empty() {
                "server did not issue a token".into()
            } else {
                resp.messages.join("; ")
            },
        }),
    }
}
