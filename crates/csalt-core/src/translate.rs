// ── Authentication + translation flow ──
//
// The directory is reached through `NameTranslator` and passwords through
// `PasswordPrompt`, so the retry rules below are testable without a
// terminal or a server.

use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::Resolution;
use crate::query::ParsedQuery;

/// Password prompts allowed per authentication cycle.
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// Source of interactive passwords. `attempt` starts at 1.
pub trait PasswordPrompt {
    fn read_password(&mut self, user: &str, attempt: u32) -> std::io::Result<SecretString>;
}

/// The remote directory that turns names into devices.
#[allow(async_fn_in_trait)]
pub trait NameTranslator {
    /// User the session authenticates as.
    fn user(&self) -> &str;

    /// Whether a token is held (it may still turn out to be expired).
    fn has_token(&self) -> bool;

    /// Exchange a password for a fresh token and keep it for later runs.
    async fn authenticate(&mut self, password: &SecretString) -> Result<(), CoreError>;

    async fn translate(&self, query: &ParsedQuery) -> Result<Resolution, CoreError>;
}

/// Prompt for a password until the directory accepts it.
///
/// Wrong passwords are retried up to [`MAX_PASSWORD_ATTEMPTS`] times; any
/// other failure ends the cycle at once.
pub async fn authenticate<T, P>(translator: &mut T, prompt: &mut P) -> Result<(), CoreError>
where
    T: NameTranslator,
    P: PasswordPrompt,
{
    for attempt in 1..=MAX_PASSWORD_ATTEMPTS {
        let password = prompt
            .read_password(translator.user(), attempt)
            .map_err(|e| CoreError::Prompt {
                message: e.to_string(),
            })?;

        match translator.authenticate(&password).await {
            Ok(()) => {
                debug!(attempt, "authenticated");
                return Ok(());
            }
            Err(e) if e.is_authentication() => {
                warn!(attempt, "incorrect user/password");
            }
            Err(e) => return Err(e),
        }
    }

    Err(CoreError::MaxPasswordAttempts {
        attempts: MAX_PASSWORD_ATTEMPTS,
    })
}

/// Resolve a query, authenticating when needed.
///
/// Without a token the user is authenticated up front. If the directory
/// then rejects the token, one fresh authentication cycle runs and the
/// translation is retried exactly once; whatever that retry returns is
/// final.
pub async fn resolve<T, P>(
    translator: &mut T,
    prompt: &mut P,
    query: &ParsedQuery,
) -> Result<Resolution, CoreError>
where
    T: NameTranslator,
    P: PasswordPrompt,
{
    if !translator.has_token() {
        info!(user = translator.user(), "no saved token, authentication required");
        authenticate(translator, prompt).await?;
    }

    match translator.translate(query).await {
        Err(e) if e.is_authentication() => {
            info!(error = %e, "token rejected, re-authenticating");
            authenticate(translator, prompt).await?;
            translator.translate(query).await
        }
        other => other,
    }
}
