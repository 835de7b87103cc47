//! Server, prefix and username resolution.
//!
//! Priority, highest first:
//! - server/prefix: environment flag > `--server` alias > saved
//!   `server_url` > production fallback, then any literal prefix flag.
//! - username: `--user` > alias `user_name` > saved `user_name`. `None`
//!   means the caller has to ask.

use csalt_core::Environment;
use url::Url;

use crate::{Config, ConfigError};

/// Command-line overrides of the identifier prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PrefixOverride {
    /// Use whatever the selected server implies.
    #[default]
    Derived,
    /// Use this prefix regardless of server.
    Literal(String),
    /// Produce unprefixed `pi-<id>` targets.
    Suppressed,
}

/// Server-related command-line selections.
#[derive(Debug, Clone, Default)]
pub struct ServerSelection {
    pub environment: Option<Environment>,
    pub alias: Option<String>,
    pub prefix: PrefixOverride,
    pub user: Option<String>,
}

/// Outcome of resolving a [`ServerSelection`] against the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedServer {
    pub url: Url,
    pub prefix: String,
    pub username: Option<String>,
}

/// Resolve the API server, identifier prefix and username.
pub fn resolve_server(
    cfg: &Config,
    selection: &ServerSelection,
) -> Result<ResolvedServer, ConfigError> {
    let mut alias_user: Option<String> = None;

    let (url_str, derived_prefix) = if let Some(env) = selection.environment {
        (env.api_url(), env.default_prefix().to_owned())
    } else if let Some(ref alias) = selection.alias {
        let server = cfg
            .servers
            .get(alias)
            .ok_or_else(|| ConfigError::AliasNotFound {
                alias: alias.clone(),
                available: cfg.alias_names(),
            })?;
        alias_user.clone_from(&server.user_name);
        (
            server.url.clone(),
            server.salt_prefix.clone().unwrap_or_default(),
        )
    } else if let Some(url) = cfg.server_url.as_deref().filter(|u| !u.is_empty()) {
        (url.to_owned(), String::new())
    } else {
        (Environment::Production.api_url(), String::new())
    };

    let url: Url = url_str.parse().map_err(|_| ConfigError::Validation {
        field: "server url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let prefix = match &selection.prefix {
        PrefixOverride::Derived => derived_prefix,
        PrefixOverride::Literal(p) => p.clone(),
        PrefixOverride::Suppressed => String::new(),
    };

    let username = selection
        .user
        .clone()
        .or(alias_user)
        .or_else(|| cfg.user_name.clone())
        .filter(|u| !u.is_empty());

    Ok(ResolvedServer {
        url,
        prefix,
        username,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::ServerAlias;
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        let mut cfg = Config {
            user_name: Some("alice".into()),
            server_url: Some("https://saved.example.org".into()),
            ..Config::default()
        };
        cfg.servers.insert(
            "staging".into(),
            ServerAlias {
                url: "https://staging.example.org".into(),
                salt_prefix: Some("stage".into()),
                user_name: Some("bob".into()),
            },
        );
        cfg
    }

    #[test]
    fn environment_flag_wins_over_alias() {
        let sel = ServerSelection {
            environment: Some(Environment::Test),
            alias: Some("staging".into()),
            ..ServerSelection::default()
        };
        let r = resolve_server(&config(), &sel).unwrap();
        assert_eq!(r.url.as_str(), "https://api-test.cacophony.org.nz/");
        assert_eq!(r.prefix, "test");
        assert_eq!(r.username.as_deref(), Some("alice"));
    }

    #[test]
    fn alias_supplies_url_prefix_and_user() {
        let sel = ServerSelection {
            alias: Some("staging".into()),
            ..ServerSelection::default()
        };
        let r = resolve_server(&config(), &sel).unwrap();
        assert_eq!(r.url.as_str(), "https://staging.example.org/");
        assert_eq!(r.prefix, "stage");
        assert_eq!(r.username.as_deref(), Some("bob"));
    }

    #[test]
    fn unknown_alias_is_reported() {
        let sel = ServerSelection {
            alias: Some("prod2".into()),
            ..ServerSelection::default()
        };
        match resolve_server(&config(), &sel) {
            Err(ConfigError::AliasNotFound { alias, available }) => {
                assert_eq!(alias, "prod2");
                assert_eq!(available, vec!["staging".to_owned()]);
            }
            other => panic!("expected AliasNotFound, got {other:?}"),
        }
    }

    #[test]
    fn saved_url_then_fallback() {
        let r = resolve_server(&config(), &ServerSelection::default()).unwrap();
        assert_eq!(r.url.as_str(), "https://saved.example.org/");
        assert_eq!(r.prefix, "");

        let r = resolve_server(&Config::default(), &ServerSelection::default()).unwrap();
        assert_eq!(r.url.as_str(), "https://api.cacophony.org.nz/");
        assert_eq!(r.username, None);
    }

    #[test]
    fn literal_prefix_and_suppression_override() {
        let mut sel = ServerSelection {
            alias: Some("staging".into()),
            prefix: PrefixOverride::Literal("test".into()),
            ..ServerSelection::default()
        };
        assert_eq!(resolve_server(&config(), &sel).unwrap().prefix, "test");

        sel.environment = Some(Environment::Test);
        sel.prefix = PrefixOverride::Suppressed;
        assert_eq!(resolve_server(&config(), &sel).unwrap().prefix, "");
    }

    #[test]
    fn user_flag_wins() {
        let sel = ServerSelection {
            alias: Some("staging".into()),
            user: Some("dave".into()),
            ..ServerSelection::default()
        };
        assert_eq!(
            resolve_server(&config(), &sel).unwrap().username.as_deref(),
            Some("dave")
        );
    }

    #[test]
    fn invalid_saved_url() {
        let cfg = Config {
            server_url: Some("not a url".into()),
            ..Config::default()
        };
        assert!(matches!(
            resolve_server(&cfg, &ServerSelection::default()),
            Err(ConfigError::Validation { .. })
        ));
    }
}
