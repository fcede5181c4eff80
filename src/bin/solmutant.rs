use clap::Parser;
use colored::Colorize;
use solmutant_core::cli::{self, Cli};
use solmutant_core::exit::SolmutantExit;

fn main() -> SolmutantExit {
    let cli = Cli::parse();

    let result = if let Some(cmd) = cli.command {
        cli::dispatch::execute(cmd)
    } else {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        Ok(SolmutantExit::Success)
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            SolmutantExit::Error
        }
    }
}
