// src/driver/mod.rs
//! Turns one baseline tree into independent variants.
//!
//! Every `(rule, candidate)` pair starts from its own clone of the untouched
//! baseline: clone, rewrite, splice, emit, verify, store. A candidate whose
//! rewrite fails structurally is skipped; only persistence failures end the
//! run.

pub mod batch;
pub mod report;

use crate::ast::{NodeId, Tree};
use crate::codegen::emit_tree;
use crate::error::{MutationError, Result};
use crate::events::{EventKind, EventLogger};
use crate::frontend::CompilerFrontend;
use crate::rules::{mutate, Catalog, Rule};
use crate::store::{ArtifactStore, VariantKey, VariantStatus};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    /// Attach the `@notice vuln,...` marker to synthesized nodes.
    pub annotate: bool,
    /// Ask the compiler about every variant.
    pub verify: bool,
    pub keep_rejected: bool,
    pub write_baseline: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            annotate: true,
            verify: true,
            keep_rejected: true,
            write_baseline: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Accepted,
    /// Stored without verification.
    Unverified,
    Rejected,
    /// The rewrite did not fit this candidate.
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantRecord {
    pub rule: &'static str,
    pub candidate: NodeId,
    /// Candidate id for rewrites in place, first synthesized id for
    /// additions. Absent when the candidate was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<NodeId>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Everything one input produced.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub candidates: usize,
    pub records: Vec<VariantRecord>,
    /// Set when the input could not be read or parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn failed(path: &Path, error: &MutationError) -> Self {
        Self {
            path: path.to_path_buf(),
            candidates: 0,
            records: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    #[must_use]
    pub fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// A rewritten clone and its regenerated text.
struct Variant {
    id: NodeId,
    tree: Tree,
    source: String,
}

pub struct Driver<'a> {
    catalog: &'a Catalog,
    frontend: &'a dyn CompilerFrontend,
    store: &'a dyn ArtifactStore,
    events: Option<&'a EventLogger>,
    options: DriverOptions,
}

impl<'a> Driver<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a Catalog,
        frontend: &'a dyn CompilerFrontend,
        store: &'a dyn ArtifactStore,
        options: DriverOptions,
    ) -> Self {
        Self {
            catalog,
            frontend,
            store,
            events: None,
            options,
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: &'a EventLogger) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    fn log(&self, kind: EventKind) {
        if let Some(events) = self.events {
            events.log(kind);
        }
    }

    /// Reads, parses and mutates one file. Artifacts are named after
    /// `stem`.
    ///
    /// Read and parse failures are reported in the returned
    /// [`FileReport`]; only a persistence failure is returned as an error.
    ///
    /// # Errors
    /// `Persistence` if an artifact could not be written.
    pub fn run_file(
        &self,
        path: &Path,
        stem: &str,
        on_variant: impl FnMut(&VariantRecord),
    ) -> Result<FileReport> {
        self.log(EventKind::FileStarted {
            path: path.display().to_string(),
        });
        let parsed = fs::read_to_string(path)
            .map_err(|source| MutationError::Io {
                source,
                path: path.to_path_buf(),
            })
            .and_then(|source| self.frontend.parse(path, &source));
        let baseline = match parsed {
            Ok(tree) => tree,
            Err(e) => {
                self.log(EventKind::FileFailed {
                    path: path.display().to_string(),
                    error: e.to_string(),
                });
                return Ok(FileReport::failed(path, &e));
            }
        };
        self.run_named(path, stem, &baseline, on_variant)
    }

    /// Runs every rule against `baseline`, which was parsed from `path`.
    ///
    /// `baseline` is only ever read.
    ///
    /// # Errors
    /// `Persistence` if an artifact could not be written.
    pub fn run_tree(
        &self,
        path: &Path,
        baseline: &Tree,
        on_variant: impl FnMut(&VariantRecord),
    ) -> Result<FileReport> {
        self.run_named(path, &input_stem(path), baseline, on_variant)
    }

    fn run_named(
        &self,
        path: &Path,
        stem: &str,
        baseline: &Tree,
        mut on_variant: impl FnMut(&VariantRecord),
    ) -> Result<FileReport> {
        let mut report = FileReport {
            path: path.to_path_buf(),
            candidates: 0,
            records: Vec::new(),
            error: None,
        };
        for rule in self.catalog.iter() {
            let mut seen = HashSet::new();
            let candidates: Vec<NodeId> = rule
                .detect(baseline)
                .into_iter()
                .filter(|id| seen.insert(*id))
                .collect();
            if candidates.is_empty() {
                continue;
            }
            report.candidates += candidates.len();
            if self.options.write_baseline {
                self.store.store_baseline(stem, rule.suffix(), baseline)?;
            }
            for candidate in candidates {
                let record = self.run_candidate(rule, path, stem, baseline, candidate)?;
                on_variant(&record);
                report.records.push(record);
            }
        }
        Ok(report)
    }

    fn run_candidate(
        &self,
        rule: &dyn Rule,
        path: &Path,
        stem: &str,
        baseline: &Tree,
        candidate: NodeId,
    ) -> Result<VariantRecord> {
        let variant = match self.produce(rule, baseline, candidate) {
            Ok(v) => v,
            Err(e) if e.is_candidate_local() => {
                self.log(EventKind::CandidateSkipped {
                    path: path.display().to_string(),
                    rule: rule.id().to_string(),
                    candidate: candidate.0,
                    reason: e.to_string(),
                });
                return Ok(VariantRecord {
                    rule: rule.id(),
                    candidate,
                    variant: None,
                    outcome: Outcome::Skipped {
                        reason: e.to_string(),
                    },
                });
            }
            Err(e) => return Err(e),
        };

        // Clones of one baseline hand out the same fresh ids, so additions
        // are named after the candidate they were anchored on.
        let key = VariantKey::new(stem, candidate, rule.suffix());
        let variant_id = variant.id;
        let outcome = self.settle(path, &key, variant)?;
        let accepted = !matches!(outcome, Outcome::Rejected);
        self.log(if accepted {
            EventKind::VariantAccepted {
                path: path.display().to_string(),
                rule: rule.id().to_string(),
                id: key.id.0,
                verified: outcome == Outcome::Accepted,
            }
        } else {
            EventKind::VariantRejected {
                path: path.display().to_string(),
                rule: rule.id().to_string(),
                id: key.id.0,
            }
        });
        Ok(VariantRecord {
            rule: rule.id(),
            candidate,
            variant: Some(variant_id),
            outcome,
        })
    }

    /// Clone, rewrite and regenerate. The clone is private to this call.
    fn produce(&self, rule: &dyn Rule, baseline: &Tree, candidate: NodeId) -> Result<Variant> {
        let mut tree = baseline.clone();
        let id = mutate(rule, &mut tree, candidate, self.options.annotate)?;
        let source = emit_tree(&tree)?;
        Ok(Variant { id, tree, source })
    }

    /// Verifies and stores one variant.
    fn settle(&self, path: &Path, key: &VariantKey, variant: Variant) -> Result<Outcome> {
        if !self.options.verify {
            self.store
                .store_accepted(key, &variant.source, &variant.tree, VariantStatus::Unverified)?;
            return Ok(Outcome::Unverified);
        }
        let verdict = self.frontend.verify(path, &variant.source);
        if verdict.accepted {
            let tree = verdict.tree.unwrap_or(variant.tree);
            self.store
                .store_accepted(key, &variant.source, &tree, VariantStatus::Accepted)?;
            return Ok(Outcome::Accepted);
        }
        if self.options.keep_rejected {
            self.store
                .store_rejected(key, &variant.source, &verdict.diagnostics)?;
        }
        Ok(Outcome::Rejected)
    }
}

/// File name without the `.sol` extension.
#[must_use]
pub fn input_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
