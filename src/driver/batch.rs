// src/driver/batch.rs
//! Many inputs at once.
//!
//! Files are independent: each one gets its own baseline and its own clones,
//! so they fan out across a rayon pool. Results come back in input order.

use super::{input_stem, Driver, FileReport, Outcome, VariantRecord};
use crate::error::{MutationError, Result};
use crate::events::EventKind;
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Expands `paths` into the `.sol` files below them, sorted and deduplicated.
///
/// Anything under `exclude` (the output directory) is skipped so a second
/// run never mutates the variants of the first.
///
/// # Errors
/// `Io` if a named path does not exist.
pub fn collect_sources(paths: &[PathBuf], exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    let exclude = exclude.and_then(|p| p.canonicalize().ok());
    let mut files = Vec::new();
    for root in paths {
        if !root.exists() {
            return Err(MutationError::Io {
                source: io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
                path: root.clone(),
            });
        }
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_excluded(e.path(), exclude.as_deref()));
        files.extend(accumulate_sources(walker));
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_excluded(path: &Path, exclude: Option<&Path>) -> bool {
    let Some(exclude) = exclude else {
        return false;
    };
    path.canonicalize().is_ok_and(|p| p == exclude)
}

fn accumulate_sources<I>(walker: I) -> Vec<PathBuf>
where
    I: Iterator<Item = walkdir::Result<walkdir::DirEntry>>,
{
    walker
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "sol"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Artifact name for each of `files`, in the same order.
///
/// Normally the file stem. Inputs that share a stem are prefixed with their
/// directories below the deepest directory they have in common, joined by
/// `__`: `a/Token.sol` and `b/Token.sol` become `a__Token` and `b__Token`.
#[must_use]
pub fn artifact_stems(files: &[PathBuf]) -> Vec<String> {
    let mut stems: Vec<String> = files.iter().map(|f| input_stem(f)).collect();
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, stem) in stems.iter().enumerate() {
        groups.entry(stem.clone()).or_default().push(i);
    }
    for (stem, members) in groups.into_iter().filter(|(_, m)| m.len() > 1) {
        let dirs: Vec<Vec<String>> = members.iter().map(|&i| dir_parts(&files[i])).collect();
        let shared = shared_prefix(&dirs);
        for (&i, dir) in members.iter().zip(&dirs) {
            let mut parts = dir[shared..].to_vec();
            parts.push(stem.clone());
            stems[i] = parts.join("__");
        }
    }
    stems
}

fn dir_parts(path: &Path) -> Vec<String> {
    path.parent()
        .map(|dir| {
            dir.components()
                .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

fn shared_prefix(dirs: &[Vec<String>]) -> usize {
    let Some(first) = dirs.first() else {
        return 0;
    };
    (0..first.len())
        .take_while(|&k| dirs.iter().all(|d| d.get(k) == Some(&first[k])))
        .count()
}

/// Totals over a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub accepted: usize,
    pub unverified: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub failed_files: usize,
    pub duration_ms: u128,
}

impl BatchReport {
    fn tally(files: Vec<FileReport>, duration_ms: u128) -> Self {
        let sum = |pred: fn(&Outcome) -> bool| -> usize {
            files.iter().map(|f| f.count(pred)).sum()
        };
        let accepted = sum(|o| matches!(o, Outcome::Accepted));
        let unverified = sum(|o| matches!(o, Outcome::Unverified));
        let rejected = sum(|o| matches!(o, Outcome::Rejected));
        let skipped = sum(|o| matches!(o, Outcome::Skipped { .. }));
        let failed_files = files.iter().filter(|f| f.error.is_some()).count();
        Self {
            files,
            accepted,
            unverified,
            rejected,
            skipped,
            failed_files,
            duration_ms,
        }
    }

    /// Variants that were written as kept, verified or not.
    #[must_use]
    pub fn kept(&self) -> usize {
        self.accepted + self.unverified
    }

    #[must_use]
    pub fn produced(&self) -> usize {
        self.kept() + self.rejected
    }
}

impl Driver<'_> {
    /// Runs every file on a pool of `jobs` workers, naming artifacts with
    /// [`artifact_stems`].
    ///
    /// `on_variant` is called from the workers as records come in.
    ///
    /// # Errors
    /// `Persistence` from any worker ends the run; `Other` if the pool cannot
    /// be built.
    pub fn run_batch<F>(
        &self,
        files: &[PathBuf],
        jobs: usize,
        on_variant: &F,
    ) -> Result<BatchReport>
    where
        F: Fn(&Path, &VariantRecord) + Sync,
    {
        use rayon::prelude::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

        let start = std::time::Instant::now();
        self.log(EventKind::RunStarted {
            files: files.len(),
            rules: self.catalog.iter().map(|r| r.id().to_string()).collect(),
        });

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs.max(1))
            .build()
            .map_err(|e| MutationError::Other(format!("cannot start workers: {e}")))?;
        let stems = artifact_stems(files);
        let reports: Vec<FileReport> = pool.install(|| {
            files
                .par_iter()
                .zip(stems.par_iter())
                .map(|(path, stem)| self.run_file(path, stem, |record| on_variant(path, record)))
                .collect::<Result<_>>()
        })?;

        let report = BatchReport::tally(reports, start.elapsed().as_millis());
        self.log(EventKind::RunFinished {
            accepted: report.kept(),
            rejected: report.rejected,
            skipped: report.skipped,
            failed_files: report.failed_files,
        });
        Ok(report)
    }
}
