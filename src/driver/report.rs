// src/driver/report.rs
//! Terminal and JSON rendering of a run.

use super::batch::BatchReport;
use super::{Outcome, VariantRecord};
use crate::rules::Catalog;
use colored::Colorize;
use std::fmt::Write;
use std::path::Path;

/// One line per finished candidate; `current` is the input's position and
/// the id is the one in the artifact names.
#[must_use]
pub fn format_progress(
    current: usize,
    total: usize,
    path: &Path,
    record: &VariantRecord,
) -> String {
    let status = match &record.outcome {
        Outcome::Accepted => "ACCEPTED".green(),
        Outcome::Unverified => "UNVERIFIED".cyan(),
        Outcome::Rejected => "REJECTED".yellow().bold(),
        Outcome::Skipped { .. } => "SKIPPED".dimmed(),
    };
    let file = path.display();
    let rule = record.rule;
    let id = record.candidate;
    format!("[{current}/{total}] {file}  {rule}  #{id}  ... {status}")
}

#[must_use]
pub fn format_summary(report: &BatchReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "═".repeat(60));
    let _ = writeln!(out, "{}", "INJECTION COMPLETE".bold());
    let _ = writeln!(out, "{}", "═".repeat(60));
    let _ = writeln!(out);
    let _ = writeln!(out, "  Files:            {}", report.files.len());
    let _ = writeln!(out, "  Variants:         {}", report.produced());
    let _ = writeln!(out, "  Accepted:         {}", report.accepted.to_string().green());
    if report.unverified > 0 {
        let _ = writeln!(out, "  Unverified:       {}", report.unverified.to_string().cyan());
    }
    let _ = writeln!(out, "  Rejected:         {}", format_count(report.rejected));
    let _ = writeln!(out, "  Skipped:          {}", report.skipped);
    if report.failed_files > 0 {
        let _ = writeln!(
            out,
            "  Failed files:     {}",
            report.failed_files.to_string().red()
        );
    }

    let duration_secs = report.duration_ms / 1000;
    let _ = writeln!(out, "  Duration:         {duration_secs}s");
    let _ = writeln!(out);

    for file in report.files.iter().filter(|f| f.error.is_some()) {
        let error = file.error.as_deref().unwrap_or_default();
        let _ = writeln!(out, "  {} {}: {error}", "✗".red(), file.path.display());
    }

    out
}

fn format_count(count: usize) -> colored::ColoredString {
    if count == 0 {
        count.to_string().green()
    } else {
        count.to_string().yellow()
    }
}

/// The whole report for machine consumption.
#[must_use]
pub fn format_json(report: &BatchReport) -> String {
    let output = serde_json::json!({
        "summary": {
            "files": report.files.len(),
            "accepted": report.accepted,
            "unverified": report.unverified,
            "rejected": report.rejected,
            "skipped": report.skipped,
            "failed_files": report.failed_files,
            "duration_ms": report.duration_ms,
        },
        "files": report.files,
    });
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// The rule table for `solmutant rules`.
#[must_use]
pub fn format_rules(catalog: &Catalog) -> String {
    let mut out = String::new();
    for rule in catalog.iter() {
        let _ = writeln!(
            out,
            "  {:<7} {:<8} {}",
            rule.id().cyan(),
            rule.operation().as_str(),
            rule.name().bold()
        );
        let _ = writeln!(out, "          {}", rule.description().dimmed());
    }
    out
}

#[must_use]
pub fn format_rules_json(catalog: &Catalog) -> String {
    let rules: Vec<_> = catalog
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id(),
                "name": r.name(),
                "operation": r.operation(),
                "suffix": r.suffix(),
                "description": r.description(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&rules).unwrap_or_else(|_| "[]".to_string())
}
