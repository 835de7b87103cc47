// ── Session context ──

use secrecy::SecretString;
use url::Url;

use crate::identifier::IdentifierFormatter;

pub const LIVE_API_HOST: &str = "api.cacophony.org.nz";
pub const TEST_API_HOST: &str = "api-test.cacophony.org.nz";

/// Identifier prefix used by the test environment.
pub const TEST_PREFIX: &str = "test";

/// A well-known directory environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Test,
}

impl Environment {
    pub fn api_host(self) -> &'static str {
        match self {
            Self::Production => LIVE_API_HOST,
            Self::Test => TEST_API_HOST,
        }
    }

    pub fn api_url(self) -> String {
        format!("https://{}", self.api_host())
    }

    /// Salt id prefix for devices registered in this environment.
    pub fn default_prefix(self) -> &'static str {
        match self {
            Self::Production => "",
            Self::Test => TEST_PREFIX,
        }
    }
}

/// Everything a run needs to talk to the directory, built once and then
/// only read.
#[derive(Debug)]
pub struct SessionContext {
    pub server_url: Url,
    pub username: String,
    pub prefix: String,
    pub token: Option<SecretString>,
    /// Show diagnostics: token read failures, the exact command executed.
    pub debug: bool,
    /// Show lookups and translated matches.
    pub verbose: bool,
}

impl SessionContext {
    pub fn formatter(&self) -> IdentifierFormatter {
        IdentifierFormatter::new(&self.prefix)
    }
}
