// src/cli/inject_handler.rs
use crate::codegen::emit_tree;
use crate::config::{Config, RuleSelection};
use crate::driver::batch::collect_sources;
use crate::driver::report;
use crate::driver::{Driver, DriverOptions, VariantRecord};
use crate::error::MutationError;
use crate::events::EventLogger;
use crate::exit::SolmutantExit;
use crate::frontend::{CompilerFrontend, SolcFrontend};
use crate::rules::Catalog;
use crate::store::FsArtifactStore;
use super::args::InjectArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

fn working_config() -> Result<Config> {
    let cwd = std::env::current_dir().context("cannot read the working directory")?;
    Ok(Config::load(&cwd))
}

/// Handles the inject command.
///
/// # Errors
/// Returns error if the compiler command is unusable or the run fails for a
/// reason other than persistence.
pub fn handle_inject(args: &InjectArgs) -> Result<SolmutantExit> {
    let config = working_config()?;
    let frontend = SolcFrontend::new(&config.compiler).context("invalid [compiler] settings")?;
    run_inject(args, &config, &frontend)
}

/// Rule set for a run: `--rule` flags win over `[rules] enabled`; `[rules]
/// disabled` only applies when no flag was given.
///
/// # Errors
/// Returns the first unknown rule id.
pub fn select_catalog(cli_rules: &[String], config: &RuleSelection) -> Result<Catalog, String> {
    if !cli_rules.is_empty() {
        return Catalog::standard().select(cli_rules);
    }
    if let Some(unknown) = config
        .disabled
        .iter()
        .find(|id| Catalog::standard().get(id).is_none())
    {
        return Err(unknown.clone());
    }
    Ok(Catalog::standard()
        .select(&config.enabled)?
        .without(&config.disabled))
}

/// The inject pipeline with an explicit frontend.
///
/// # Errors
/// Returns error on failures that are neither bad input nor persistence.
pub fn run_inject(
    args: &InjectArgs,
    config: &Config,
    frontend: &dyn CompilerFrontend,
) -> Result<SolmutantExit> {
    let catalog = match select_catalog(&args.rules, &config.rules) {
        Ok(catalog) => catalog,
        Err(unknown) => {
            eprintln!("{} unknown rule `{unknown}`", "error:".red().bold());
            return Ok(SolmutantExit::InvalidInput);
        }
    };

    let out_dir = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));
    let files = match collect_sources(&args.paths, Some(&out_dir)) {
        Ok(files) => files,
        Err(e @ MutationError::Io { .. }) => {
            eprintln!("{} {e}", "error:".red().bold());
            return Ok(SolmutantExit::InvalidInput);
        }
        Err(e) => return Err(e).context("cannot scan inputs"),
    };
    if files.is_empty() {
        eprintln!("{} no .sol files found", "error:".red().bold());
        return Ok(SolmutantExit::InvalidInput);
    }

    let store = match FsArtifactStore::new(&out_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return Ok(SolmutantExit::PersistenceFailure);
        }
    };
    let events = EventLogger::new(&out_dir);
    let options = DriverOptions {
        annotate: config.output.annotate,
        verify: !args.no_verify,
        keep_rejected: config.output.keep_rejected,
        write_baseline: config.output.write_baseline,
    };
    let driver = Driver::new(&catalog, frontend, &store, options).with_events(&events);
    let jobs = args.jobs.unwrap_or(config.jobs);

    if !args.json {
        print_header(&files, &catalog, &out_dir, jobs);
    }

    let total = files.len();
    let positions: HashMap<&Path, usize> = files
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_path(), i + 1))
        .collect();
    let json = args.json;
    let on_variant = |path: &Path, record: &VariantRecord| {
        if !json {
            let cur = positions.get(path).copied().unwrap_or_default();
            println!("{}", report::format_progress(cur, total, path, record));
        }
    };

    let batch = match driver.run_batch(&files, jobs, &on_variant) {
        Ok(batch) => batch,
        Err(e @ MutationError::Persistence { .. }) => {
            eprintln!("{} {e}", "error:".red().bold());
            return Ok(SolmutantExit::PersistenceFailure);
        }
        Err(e) => return Err(e).context("injection run failed"),
    };

    for file in batch.files.iter().filter(|f| f.error.is_some()) {
        eprintln!(
            "{} skipped {}: {}",
            "warning:".yellow().bold(),
            file.path.display(),
            file.error.as_deref().unwrap_or_default()
        );
    }

    if json {
        println!("{}", report::format_json(&batch));
    } else {
        println!("{}", report::format_summary(&batch));
    }

    if batch.produced() > 0 && batch.kept() == 0 {
        return Ok(SolmutantExit::NothingAccepted);
    }
    Ok(SolmutantExit::Success)
}

fn print_header(files: &[PathBuf], catalog: &Catalog, out_dir: &Path, jobs: usize) {
    println!();
    println!("{}", "SOLMUTANT".bold().cyan());
    println!("{}", "═".repeat(60));
    println!("  Files:    {}", files.len().to_string().cyan());
    println!("  Rules:    {}", catalog.len().to_string().cyan());
    println!("  Workers:  {}", jobs.to_string().cyan());
    println!("  Output:   {}", out_dir.display().to_string().cyan());
    println!("{}", "═".repeat(60));
    println!();
}

/// Handles the rules command.
#[must_use]
pub fn handle_rules(json: bool) -> SolmutantExit {
    let catalog = Catalog::standard();
    if json {
        println!("{}", report::format_rules_json(&catalog));
    } else {
        print!("{}", report::format_rules(&catalog));
    }
    SolmutantExit::Success
}

/// Handles the emit command.
///
/// # Errors
/// Returns error if the file cannot be read, parsed or regenerated.
pub fn handle_emit(path: &Path) -> Result<SolmutantExit> {
    let config = working_config()?;
    let frontend = SolcFrontend::new(&config.compiler).context("invalid [compiler] settings")?;
    print!("{}", emit_file(path, &frontend)?);
    Ok(SolmutantExit::Success)
}

/// Parses `path` with `frontend` and regenerates its source.
///
/// # Errors
/// Returns error if the file cannot be read, parsed or regenerated.
pub fn emit_file(path: &Path, frontend: &dyn CompilerFrontend) -> Result<String> {
    let source =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let tree = frontend
        .parse(path, &source)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    emit_tree(&tree).with_context(|| format!("cannot regenerate {}", path.display()))
}
