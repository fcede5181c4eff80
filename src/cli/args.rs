// src/cli/args.rs
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "solmutant",
    version,
    about = "Injects vulnerability patterns into Solidity sources"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate compiler-verified vulnerable variants of every input
    Inject(InjectArgs),
    /// List the rule catalog
    Rules {
        #[arg(long)]
        json: bool,
    },
    /// Parse one file and print the regenerated source
    Emit {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct InjectArgs {
    /// Solidity files or directories to scan
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
    /// Only run these rules (repeatable)
    #[arg(long = "rule", value_name = "ID")]
    pub rules: Vec<String>,
    /// Output directory [default: from solmutant.toml, else `vul`]
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
    /// Worker threads
    #[arg(long, short)]
    pub jobs: Option<usize>,
    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
    /// Store variants without asking the compiler
    #[arg(long)]
    pub no_verify: bool,
}
