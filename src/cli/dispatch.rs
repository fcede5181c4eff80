//! Command dispatch, kept out of the binary.

use super::args::Commands;
use super::inject_handler::{handle_emit, handle_inject, handle_rules};
use crate::exit::SolmutantExit;
use anyhow::Result;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: Commands) -> Result<SolmutantExit> {
    match command {
        Commands::Inject(args) => handle_inject(&args),
        Commands::Rules { json } => Ok(handle_rules(json)),
        Commands::Emit { path } => handle_emit(&path),
    }
}
