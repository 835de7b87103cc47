//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and a process exit code.

use std::fmt::Write as _;
use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

use csalt_config::ConfigError;
use csalt_core::{AmbiguousNames, CoreError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code, unused_assignments)]
pub enum CliError {
    // ── Arguments ────────────────────────────────────────────────────
    #[error("Commands/deviceinfo must be specified")]
    #[diagnostic(
        code(csalt::usage),
        help("Usage: csalt [OPTIONS] DEVICEINFO COMMANDS...\nRun csalt --help for examples.")
    )]
    InsufficientArguments,

    // ── Configuration ────────────────────────────────────────────────
    #[error("Cannot find {alias} server info in config")]
    #[diagnostic(
        code(csalt::alias_not_found),
        help(
            "Configured servers: {available}\n\
             Add one under [servers.{alias}] in {path}"
        )
    )]
    AliasNotFound {
        alias: String,
        available: String,
        path: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(csalt::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(csalt::config), help("Check the config file at {path}"))]
    Config { message: String, path: String },

    // ── Directory ────────────────────────────────────────────────────
    #[error("Cannot connect to API server")]
    #[diagnostic(
        code(csalt::connection_failed),
        help(
            "{reason}\n\
             Check network access, or pick another server with --server, --test or --live."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(csalt::auth_failed),
        help("Check the username (--user or user_name in the config file) and password.")
    )]
    AuthFailed { message: String },

    #[error("Max password attempts ({attempts}) reached")]
    #[diagnostic(code(csalt::auth_failed))]
    MaxPasswordAttempts { attempts: u32 },

    #[error("Interactive prompt failed: {message}")]
    #[diagnostic(
        code(csalt::prompt),
        help("A terminal is needed to enter credentials. Run csalt interactively once to save a token.")
    )]
    Prompt { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(csalt::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    #[error("Could not save token: {message}")]
    #[diagnostic(code(csalt::token_store))]
    TokenStore { message: String },

    // ── Resolution ───────────────────────────────────────────────────
    #[error("{summary}")]
    #[diagnostic(code(csalt::ambiguous))]
    Ambiguous {
        summary: String,
        #[help]
        matches: Option<String>,
    },

    #[error("No valid devices found")]
    #[diagnostic(
        code(csalt::no_devices),
        help("Check the names with: csalt -v -s DEVICEINFO")
    )]
    NoDevices,

    // ── Execution ────────────────────────────────────────────────────
    #[error("Could not launch {program}")]
    #[diagnostic(
        code(csalt::launch),
        help("Is {program} installed and on PATH? See [salt] in the config file.")
    )]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` {}", describe_status(*.code))]
    #[diagnostic(code(csalt::tool_failed))]
    ToolFailed { command: String, code: Option<i32> },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn describe_status(code: Option<i32>) -> String {
    code.map_or_else(
        || "was terminated by a signal".to_owned(),
        |c| format!("exited with status {c}"),
    )
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InsufficientArguments
            | Self::AliasNotFound { .. }
            | Self::Validation { .. }
            | Self::Config { .. } => exit_code::USAGE,
            Self::AuthFailed { .. } | Self::MaxPasswordAttempts { .. } | Self::Prompt { .. } => {
                exit_code::AUTH
            }
            Self::NoDevices => exit_code::NOT_FOUND,
            Self::Ambiguous { .. } => exit_code::CONFLICT,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::ToolFailed { code, .. } => code.unwrap_or(exit_code::GENERAL),
            _ => exit_code::GENERAL,
        }
    }
}

/// One "Device X matches:" block per ambiguous name.
fn ambiguity_help(err: &AmbiguousNames) -> String {
    let mut out = String::new();
    for ambiguity in err.ambiguities() {
        let _ = writeln!(out, "Device {} matches:", ambiguity.name);
        for device in &ambiguity.matches {
            let _ = writeln!(out, "  {device}");
        }
    }
    out.push_str("Qualify each name as group:devicename.");
    out
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientArguments => CliError::InsufficientArguments,
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::MaxPasswordAttempts { attempts } => {
                CliError::MaxPasswordAttempts { attempts }
            }
            CoreError::Prompt { message } => CliError::Prompt { message },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "query".into(),
                reason: message,
            },
            CoreError::Api { message, status } => CliError::ApiError { message, status },
            CoreError::TokenStore { message } => CliError::TokenStore { message },
            CoreError::Ambiguous(err) => CliError::Ambiguous {
                summary: err.to_string(),
                matches: Some(ambiguity_help(&err)),
            },
            CoreError::NoDevices => CliError::NoDevices,
        }
    }
}

impl From<AmbiguousNames> for CliError {
    fn from(err: AmbiguousNames) -> Self {
        CoreError::from(err).into()
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl CliError {
    /// Map a config error, pointing help text at the config file in use.
    pub fn from_config(err: ConfigError, config_path: &Path) -> Self {
        let path = config_path.display().to_string();
        match err {
            ConfigError::AliasNotFound { alias, available } => CliError::AliasNotFound {
                alias,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
                path,
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
                path,
            },
        }
    }
}
