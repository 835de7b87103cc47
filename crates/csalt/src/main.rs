mod cli;
mod directory;
mod error;
mod exec;
mod output;
mod prompt;
mod session;

use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use csalt_config::Config;
use csalt_core::{Invocation, ParsedQuery, Plan, translate};

use crate::cli::Cli;
use crate::directory::Directory;
use crate::error::CliError;
use crate::prompt::TerminalPrompt;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.debug);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, debug: bool) {
    let filter = match (verbosity, debug) {
        (0, false) => "warn",
        (1, false) => "info",
        (0..=2, _) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let query = ParsedQuery::parse(cli.device_info.as_deref().unwrap_or_default());
    let plan = csalt_core::plan(&query, &cli.commands, cli.global.show)?;
    tracing::debug!(?plan, "dispatch plan");

    let config_path = cli
        .global
        .config
        .clone()
        .unwrap_or_else(csalt_config::config_path);
    let mut cfg = csalt_config::load_config(&config_path)
        .map_err(|e| CliError::from_config(e, &config_path))?;

    match plan {
        Plan::Passthrough(args) => exec::run(&salt_invocation(&cfg, args), cli.global.debug),
        Plan::Translate { show, commands } => {
            translate_and_run(&cli, &query, &mut cfg, &config_path, show, &commands).await
        }
    }
}

fn salt_invocation(cfg: &Config, args: Vec<String>) -> Invocation {
    Invocation::new(&cfg.salt.elevate, &cfg.salt.command, args)
}

async fn translate_and_run(
    cli: &Cli,
    query: &ParsedQuery,
    cfg: &mut Config,
    config_path: &Path,
    show: bool,
    commands: &[String],
) -> Result<(), CliError> {
    let tokens = cfg.token_store();
    let ctx = session::build_context(cli, cfg, config_path, &tokens)?;
    let formatter = ctx.formatter();

    if ctx.verbose {
        output::print_lines(&output::lookup_lines(query));
    }

    let mut directory = Directory::new(&ctx, &directory::transport_config(cfg), tokens)?;
    let resolution = translate::resolve(&mut directory, &mut TerminalPrompt, query).await?;

    if ctx.verbose {
        output::print_lines(&output::resolution_lines(&resolution, &formatter));
    }

    resolution.check_duplicates()?;

    let ids = formatter.format_all(resolution.targets());
    if ids.is_empty() {
        return Err(CliError::NoDevices);
    }
    if show {
        output::print_lines(&[output::show_line(&ids)]);
    }
    if commands.is_empty() {
        return Ok(());
    }

    let args = csalt_core::salt_arguments(&ids, commands)?;
    exec::run(&salt_invocation(cfg, args), ctx.debug)
}
