//! Shared configuration for csalt.
//!
//! TOML config with named server aliases, server/prefix/username
//! resolution, and the per-user token store. The binary layers its
//! command-line flags and interactive prompts on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod session;
pub mod token;

pub use session::{PrefixOverride, ResolvedServer, ServerSelection, resolve_server};
pub use token::TokenStore;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Cannot find {alias} server info in config")]
    AliasNotFound { alias: String, available: Vec<String> },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("unreadable token file {path}: {source}")]
    TokenFormat {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Default username for the directory API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Default API server URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// HTTP request timeout in seconds. Unset means no overall timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Extra CA certificate (PEM) to trust for the API server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Where saved tokens live. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_dir: Option<PathBuf>,

    /// Named API servers, selected with `--server NAME`.
    #[serde(default)]
    pub servers: BTreeMap<String, ServerAlias>,

    /// How salt is invoked.
    #[serde(default)]
    pub salt: SaltSettings,
}

impl Config {
    /// Token store for this configuration.
    pub fn token_store(&self) -> TokenStore {
        self.token_dir
            .as_ref()
            .map_or_else(TokenStore::default_location, |dir| TokenStore::new(dir.clone()))
    }

    /// Names of all configured server aliases, sorted.
    pub fn alias_names(&self) -> Vec<String> {
        self.servers.keys().cloned().collect()
    }
}

/// A named API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerAlias {
    /// API base URL (e.g., "https://api-staging.example.org").
    pub url: String,

    /// Salt id prefix for devices registered on this server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt_prefix: Option<String>,

    /// Username to use on this server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SaltSettings {
    /// Salt executable.
    #[serde(default = "default_command")]
    pub command: String,

    /// Program used to run salt with elevated privileges.
    #[serde(default = "default_elevate")]
    pub elevate: String,
}

impl Default for SaltSettings {
    fn default() -> Self {
        Self {
            command: default_command(),
            elevate: default_elevate(),
        }
    }
}

fn default_command() -> String {
    "salt".into()
}
fn default_elevate() -> String {
    "sudo".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("nz", "cacophony", "csalt")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding saved tokens.
pub fn token_dir() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("tokens");
            p
        },
        |dirs| dirs.data_dir().join("tokens"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("csalt");
    p
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the config from `path` + `CSALT_*` environment variables.
///
/// A missing file is not an error; nested keys come from double
/// underscores (`CSALT_SALT__ELEVATE=doas`).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CSALT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
