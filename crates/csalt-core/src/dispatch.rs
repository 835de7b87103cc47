// ── Dispatch planning ──
//
// Decides, before any network traffic, whether a run forwards its
// arguments to salt untouched or goes through name translation, and
// assembles the final salt argument list afterwards.

use crate::error::CoreError;
use crate::query::ParsedQuery;

/// Salt's list-targeting flag, required when more than one id is given.
pub const MULTI_TARGET_FLAG: &str = "-L";

/// What a run will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Hand these arguments to salt as-is.
    Passthrough(Vec<String>),
    /// Translate the query first. With `show` the ids are printed; with no
    /// `commands` nothing is dispatched.
    Translate { show: bool, commands: Vec<String> },
}

/// Choose a plan from the parsed query, the trailing command tokens and
/// the show flag.
///
/// | commands | query                     | plan                          |
/// |----------|---------------------------|-------------------------------|
/// | none     | blank                     | `InsufficientArguments`       |
/// | none     | any, `--show`             | translate, print only         |
/// | none     | unstructured              | pass the raw text through     |
/// | none     | structured                | `InsufficientArguments`       |
/// | some     | no device/group values    | pass raw text + commands      |
/// | some     | device/group values       | translate and dispatch        |
pub fn plan(query: &ParsedQuery, commands: &[String], show: bool) -> Result<Plan, CoreError> {
    if commands.is_empty() {
        if !query.is_raw() {
            return Err(CoreError::InsufficientArguments);
        }
        if show {
            return Ok(Plan::Translate {
                show,
                commands: Vec::new(),
            });
        }
        if query.is_structured() {
            return Err(CoreError::InsufficientArguments);
        }
        return Ok(Plan::Passthrough(vec![query.raw().to_owned()]));
    }

    if !query.has_values() {
        let mut args = Vec::with_capacity(commands.len() + 1);
        if query.is_raw() {
            args.push(query.raw().to_owned());
        }
        args.extend_from_slice(commands);
        return Ok(Plan::Passthrough(args));
    }

    Ok(Plan::Translate {
        show,
        commands: commands.to_vec(),
    })
}

/// Salt arguments for translated targets: `[-L] "<id> <id> ..." <commands...>`.
pub fn salt_arguments(ids: &[String], commands: &[String]) -> Result<Vec<String>, CoreError> {
    if ids.is_empty() {
        return Err(CoreError::NoDevices);
    }

    let mut args = Vec::with_capacity(commands.len() + 2);
    if ids.len() > 1 {
        args.push(MULTI_TARGET_FLAG.to_owned());
    }
    args.push(ids.join(" "));
    args.extend_from_slice(commands);
    Ok(args)
}

/// A fully assembled external command: `<elevate> <program> <args...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub elevate: String,
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(elevate: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            elevate: elevate.into(),
            program: program.into(),
            args,
        }
    }

    /// Arguments handed to the elevation program.
    pub fn elevated_args(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// Human-readable command line for debug output.
    pub fn command_line(&self) -> String {
        let mut line = self.elevate.clone();
        for arg in self.elevated_args() {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}
