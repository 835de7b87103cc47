//! Clap derive structures for the `csalt` CLI.
//!
//! Kept free of other crate modules so `build.rs` can include it for man
//! page generation.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser};

const EXAMPLES: &str = "\
Examples:
  csalt gp test.ping                      device gp in any group
  csalt group1:,group2:gp test.ping       all of group1, plus gp in group2
  csalt --test group1: cmd.run uptime     against the test API server
  csalt -s gp                             print salt ids only
  csalt '' '*' test.ping                  empty DEVICEINFO, passed to salt as-is";

// ── Top-Level CLI ────────────────────────────────────────────────────

/// csalt -- run salt against devices by name
#[derive(Debug, Parser)]
#[command(
    name = "csalt",
    version,
    about = "Run salt against Cacophony devices by device and group name",
    long_about = "Translates device and group names into salt minion ids using the\n\
        Cacophony API, then runs salt against them.\n\n\
        DEVICEINFO is a comma-separated list of terms:\n  \
        devicename, :devicename   device in any group\n  \
        groupname:devicename      device in one group\n  \
        groupname:                every device in the group",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Devices and groups to target, comma separated
    #[arg(value_name = "DEVICEINFO")]
    pub device_info: Option<String>,

    /// Salt function and arguments
    #[arg(value_name = "COMMANDS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub commands: Vec<String>,

    #[command(flatten)]
    pub server: ServerOpts,

    #[command(flatten)]
    pub global: GlobalOpts,
}

// ── Server selection ─────────────────────────────────────────────────

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ServerOpts {
    /// Use a server alias from the config file
    #[arg(long, value_name = "NAME", conflicts_with_all = ["test", "live"])]
    pub server: Option<String>,

    /// Use the test API server (test salt prefix)
    #[arg(long, conflicts_with = "live")]
    pub test: bool,

    /// Use the production API server
    #[arg(long)]
    pub live: bool,

    /// Use the test salt prefix (pi-test-<id>) with any server
    #[arg(long, short = 't', conflicts_with_all = ["prefix", "no_prefix"])]
    pub test_prefix: bool,

    /// Use this salt prefix (pi-<prefix>-<id>)
    #[arg(long, value_name = "PREFIX", conflicts_with = "no_prefix")]
    pub prefix: Option<String>,

    /// Produce unprefixed salt ids (pi-<id>)
    #[arg(long)]
    pub no_prefix: bool,

    /// API username (overrides config)
    #[arg(long, value_name = "USER")]
    pub user: Option<String>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Print translated salt ids
    #[arg(long, short = 's')]
    pub show: bool,

    /// Print diagnostics and the exact command executed
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Increase verbosity (-v shows lookups and matches, -vv logs requests)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, value_name = "PATH", env = "CSALT_CONFIG")]
    pub config: Option<PathBuf>,
}
