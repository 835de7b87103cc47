//! Name resolution core for `csalt`.
//!
//! Everything here is free of terminal and filesystem I/O:
//!
//! - **[`ParsedQuery`]**: the `DEVICEINFO` argument split into device and
//!   group references.
//! - **[`translate`]**: the authenticate → translate → re-authenticate flow,
//!   written against the [`NameTranslator`] and [`PasswordPrompt`] seams.
//! - **[`check_duplicates`]**: the all-or-nothing ambiguity gate.
//! - **[`IdentifierFormatter`]**: `pi[-prefix]-<id>` salt targets.
//! - **[`dispatch`]**: deciding between pass-through and translation, and
//!   assembling the final salt invocation.

pub mod dedup;
pub mod dispatch;
pub mod error;
pub mod identifier;
pub mod model;
pub mod query;
pub mod session;
pub mod translate;

pub use dedup::{Ambiguity, AmbiguousNames, check_duplicates};
pub use dispatch::{Invocation, MULTI_TARGET_FLAG, Plan, plan, salt_arguments};
pub use error::CoreError;
pub use identifier::{BASE_TOKEN, IdentifierFormatter, format_target_id};
pub use model::{Resolution, ResolvedDevice};
pub use query::{DeviceReference, ParsedQuery, Term};
pub use session::{Environment, SessionContext, TEST_PREFIX};
pub use translate::{MAX_PASSWORD_ATTEMPTS, NameTranslator, PasswordPrompt};
