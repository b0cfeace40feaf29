use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use clap::Parser;
use colored::Colorize;
use pyglot::cli::{Arguments, ExitStatus};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `PYGLOT_LOG=debug`.
const LOG_ENV_VAR: &str = "PYGLOT_LOG";

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_tracing(args.verbose());

    match pyglot::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".bold().red(), err);
            ExitStatus::Error.into()
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}
