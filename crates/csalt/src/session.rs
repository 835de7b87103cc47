//! Builds the run's [`SessionContext`] from flags, config and saved token.

use std::path::Path;

use tracing::{debug, warn};

use csalt_config::{Config, PrefixOverride, ServerSelection, TokenStore, resolve_server};
use csalt_core::{Environment, SessionContext, TEST_PREFIX};

use crate::cli::Cli;
use crate::error::CliError;
use crate::prompt;

/// Translate server flags into a [`ServerSelection`].
pub fn server_selection(cli: &Cli) -> ServerSelection {
    let opts = &cli.server;

    let environment = if opts.test {
        Some(Environment::Test)
    } else if opts.live {
        Some(Environment::Production)
    } else {
        None
    };

    let prefix = if opts.test_prefix {
        PrefixOverride::Literal(TEST_PREFIX.to_owned())
    } else if let Some(ref p) = opts.prefix {
        PrefixOverride::Literal(p.clone())
    } else if opts.no_prefix {
        PrefixOverride::Suppressed
    } else {
        PrefixOverride::Derived
    };

    ServerSelection {
        environment,
        alias: opts.server.clone(),
        prefix,
        user: opts.user.clone(),
    }
}

/// Resolve server, prefix and username, prompting for (and saving) the
/// username if none is configured, then load any saved token.
pub fn build_context(
    cli: &Cli,
    cfg: &mut Config,
    config_path: &Path,
    tokens: &TokenStore,
) -> Result<SessionContext, CliError> {
    let resolved = resolve_server(cfg, &server_selection(cli))
        .map_err(|e| CliError::from_config(e, config_path))?;

    let username = if let Some(user) = resolved.username {
        user
    } else {
        let user = prompt::prompt_username()?;
        cfg.user_name = Some(user.clone());
        if let Err(e) = csalt_config::save_config(cfg, config_path) {
            warn!(error = %e, path = %config_path.display(), "could not save username to config");
        }
        user
    };

    let token = match tokens.read(&username) {
        Ok(token) => token,
        Err(e) => {
            debug!(error = %e, "ignoring unreadable saved token");
            None
        }
    };

    debug!(
        server = %resolved.url,
        prefix = %resolved.prefix,
        user = %username,
        saved_token = token.is_some(),
        "session"
    );

    Ok(SessionContext {
        server_url: resolved.url,
        username,
        prefix: resolved.prefix,
        token,
        debug: cli.global.debug,
        verbose: cli.global.verbose > 0,
    })
}
