//! The Cacophony user API as a [`NameTranslator`].

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use csalt_api::transport::TlsMode;
use csalt_api::{DeviceName, TokenTtl, TransportConfig, UserApiClient};
use csalt_config::{Config, TokenStore};
use csalt_core::{CoreError, NameTranslator, ParsedQuery, Resolution, SessionContext};

/// HTTP settings from the config file.
pub fn transport_config(cfg: &Config) -> TransportConfig {
    let mut transport = TransportConfig::default();
    if let Some(ref path) = cfg.ca_cert {
        transport.tls = TlsMode::CustomCa(path.clone());
    }
    if let Some(secs) = cfg.timeout {
        transport = transport.with_timeout(Duration::from_secs(secs));
    }
    transport
}

/// API client plus the store fresh tokens are saved to.
pub struct Directory {
    client: UserApiClient,
    tokens: TokenStore,
}

impl Directory {
    pub fn new(
        ctx: &SessionContext,
        transport: &TransportConfig,
        tokens: TokenStore,
    ) -> Result<Self, CoreError> {
        let token = ctx
            .token
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_owned()));
        let client =
            UserApiClient::new(ctx.server_url.clone(), ctx.username.clone(), token, transport)?;
        Ok(Self::with_client(client, tokens))
    }

    pub fn with_client(client: UserApiClient, tokens: TokenStore) -> Self {
        Self { client, tokens }
    }
}

impl NameTranslator for Directory {
    fn user(&self) -> &str {
        self.client.user()
    }

    fn has_token(&self) -> bool {
        self.client.has_token()
    }

    /// Log in, swap the session token for a long-lived device-read token
    /// and save it for later runs.
    async fn authenticate(&mut self, password: &SecretString) -> Result<(), CoreError> {
        self.client.clear_token();
        self.client.authenticate(password).await?;

        let ttl = TokenTtl::Long;
        let token = self.client.request_token(ttl).await?;
        self.tokens
            .save(self.client.user(), &token, ttl.as_str())
            .map_err(|e| CoreError::TokenStore {
                message: e.to_string(),
            })?;
        debug!(path = %self.tokens.path_for(self.client.user()).display(), "token saved");

        self.client.set_token(token);
        Ok(())
    }

    async fn translate(&self, query: &ParsedQuery) -> Result<Resolution, CoreError> {
        let devices: Vec<DeviceName> = query
            .devices()
            .iter()
            .map(|d| DeviceName {
                group_name: d.group_name.clone(),
                device_name: d.device_name.clone(),
            })
            .collect();

        let response = self.client.translate_names(query.groups(), &devices).await?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use csalt_core::ResolvedDevice;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn directory(server: &MockServer, tokens: &std::path::Path) -> Directory {
        let client = UserApiClient::with_client(
            reqwest::Client::new(),
            Url::parse(&server.uri()).unwrap(),
            "alice".into(),
            None,
        );
        Directory::with_client(client, TokenStore::new(tokens))
    }

    #[tokio::test]
    async fn authenticate_saves_long_token() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path("/authenticate_user"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "token": "JWT session" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(header("authorization", "JWT session"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "token": "JWT long" })),
            )
            .mount(&server)
            .await;

        let mut directory = directory(&server, dir.path());
        directory
            .authenticate(&SecretString::from("pw".to_owned()))
            .await
            .unwrap();

        assert!(directory.has_token());
        let saved = TokenStore::new(dir.path()).read("alice").unwrap().unwrap();
        assert_eq!(saved.expose_secret(), "JWT long");
    }

    #[tokio::test]
    async fn translate_maps_both_match_lists() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/api/v1/devices/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "devices": [{ "groupname": "g1", "devicename": "a", "saltId": 1 }],
                "nameMatches": [{ "groupname": "g2", "devicename": "gp", "saltId": 2 }]
            })))
            .mount(&server)
            .await;

        let mut directory = directory(&server, dir.path());
        directory.client.set_token(SecretString::from("JWT t".to_owned()));

        let res = directory
            .translate(&ParsedQuery::parse("g1:,gp"))
            .await
            .unwrap();
        assert_eq!(res.group_matches, vec![ResolvedDevice::new("g1", "a", 1)]);
        assert_eq!(res.name_matches, vec![ResolvedDevice::new("g2", "gp", 2)]);
    }
}
