use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{extract::extract, init::init},
    exit_status::ExitStatus,
};

/// Dispatch to the command handler for the parsed arguments.
///
/// # Returns
/// - `Ok(ExitStatus)` once the command has run
/// - `Err` if the command fails (e.g. syntax error, invalid config)
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Extract(args)) => extract(args),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
