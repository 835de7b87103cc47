// ── Core error types ──
//
// Run-level errors. The `From<csalt_api::Error>` impl folds transport
// details into the handful of kinds the CLI reacts to differently.

use thiserror::Error;

use crate::dedup::AmbiguousNames;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Arguments ────────────────────────────────────────────────────
    #[error("Commands/deviceinfo must be specified")]
    InsufficientArguments,

    // ── Directory ────────────────────────────────────────────────────
    #[error("Cannot connect to API server: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Max password attempts ({attempts}) reached")]
    MaxPasswordAttempts { attempts: u32 },

    #[error("Could not read password: {message}")]
    Prompt { message: String },

    #[error("Request rejected by API: {message}")]
    ValidationFailed { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Could not save token: {message}")]
    TokenStore { message: String },

    // ── Resolution ───────────────────────────────────────────────────
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousNames),

    #[error("No valid devices found")]
    NoDevices,
}

impl CoreError {
    /// Returns `true` if a fresh password prompt might resolve this error.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<csalt_api::Error> for CoreError {
    fn from(err: csalt_api::Error) -> Self {
        match err {
            csalt_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            csalt_api::Error::Validation { message } => CoreError::ValidationFailed { message },
            csalt_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            ref e if e.is_connect() => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            other => CoreError::Api {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_auth_error_maps_to_authentication() {
        let err = CoreError::from(csalt_api::Error::Authentication {
            message: "expired".into(),
        });
        assert!(err.is_authentication());
    }

    #[test]
    fn api_status_error_keeps_status() {
        let err = CoreError::from(csalt_api::Error::Api {
            status: 503,
            message: "down".into(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(503), .. }));
        assert!(!err.is_authentication());
    }
}
