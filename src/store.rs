// src/store.rs
//! Where variants end up.
//!
//! [`FsArtifactStore`] keeps the legacy file naming under one output
//! directory and adds `manifest.jsonl`, one line per stored variant. A line is
//! appended only after every file it points at has been written. A key is
//! written at most once per store, so no line ever points at overwritten
//! files.

use crate::ast::{NodeId, Tree};
use crate::error::{MutationError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Deterministic name of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VariantKey {
    /// Input file name without `.sol`.
    pub stem: String,
    /// Candidate the rule matched. Unique per rule within one input, also
    /// for additions whose synthesized ids repeat across clones.
    pub id: NodeId,
    pub suffix: String,
}

impl VariantKey {
    #[must_use]
    pub fn new(stem: &str, id: NodeId, suffix: &str) -> Self {
        Self {
            stem: stem.to_string(),
            id,
            suffix: suffix.to_string(),
        }
    }

    /// `{stem}_{id}_vul_{suffix}`, without extension.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}_{}_vul_{}", self.stem, self.id, self.suffix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantStatus {
    /// The compiler accepted the regenerated source.
    Accepted,
    /// Stored without asking the compiler.
    Unverified,
    Rejected,
}

pub trait ArtifactStore: Send + Sync {
    /// Baseline tree of `stem`, written once per rule suffix.
    ///
    /// # Errors
    /// `Persistence` if the write fails.
    fn store_baseline(&self, stem: &str, suffix: &str, tree: &Tree) -> Result<()>;

    /// A variant that is kept with its tree.
    ///
    /// # Errors
    /// `Persistence` if any file or the manifest line cannot be written.
    fn store_accepted(
        &self,
        key: &VariantKey,
        source: &str,
        tree: &Tree,
        status: VariantStatus,
    ) -> Result<()>;

    /// A variant the compiler refused.
    ///
    /// # Errors
    /// `Persistence` if any file or the manifest line cannot be written.
    fn store_rejected(&self, key: &VariantKey, source: &str, diagnostics: &str) -> Result<()>;
}

#[derive(Serialize)]
struct ManifestLine<'a> {
    key: String,
    stem: &'a str,
    id: NodeId,
    rule: &'a str,
    status: VariantStatus,
    sha256: String,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<String>,
}

pub struct FsArtifactStore {
    root: PathBuf,
    manifest: Mutex<()>,
    /// Variant keys written through this store.
    claimed: Mutex<HashSet<String>>,
}

impl FsArtifactStore {
    /// Creates `root` if needed.
    ///
    /// # Errors
    /// `Persistence` if the directory cannot be created.
    pub fn new(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).map_err(|source| MutationError::Persistence {
            source,
            path: root.to_path_buf(),
        })?;
        Ok(Self {
            root: root.to_path_buf(),
            manifest: Mutex::new(()),
            claimed: Mutex::new(HashSet::new()),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("manifest.jsonl")
    }

    fn write(&self, name: &str, contents: &str) -> Result<String> {
        let path = self.root.join(name);
        fs::write(&path, contents).map_err(|source| MutationError::Persistence { source, path })?;
        Ok(name.to_string())
    }

    fn claim(&self, base: &str) -> Result<()> {
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        if claimed.insert(base.to_string()) {
            return Ok(());
        }
        Err(MutationError::Persistence {
            source: io::Error::new(io::ErrorKind::AlreadyExists, "variant key already stored"),
            path: self.root.join(format!("{base}.sol")),
        })
    }

    fn append_manifest(&self, line: &ManifestLine<'_>) -> Result<()> {
        let path = self.manifest_path();
        let mut text = serde_json::to_string(line)?;
        text.push('\n');
        let _guard = self.manifest.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| MutationError::Persistence {
                source,
                path: path.clone(),
            })?;
        file.write_all(text.as_bytes())
            .map_err(|source| MutationError::Persistence { source, path })
    }
}

fn sha256_hex(text: &str) -> String {
    Sha256::digest(text.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

impl ArtifactStore for FsArtifactStore {
    fn store_baseline(&self, stem: &str, suffix: &str, tree: &Tree) -> Result<()> {
        self.write(&format!("{stem}_n_orig_ast_{suffix}.json"), &tree.to_json()?)?;
        Ok(())
    }

    fn store_accepted(
        &self,
        key: &VariantKey,
        source: &str,
        tree: &Tree,
        status: VariantStatus,
    ) -> Result<()> {
        let base = key.file_stem();
        self.claim(&base)?;
        let source_file = self.write(&format!("{base}.sol"), source)?;
        let tree_file = self.write(&format!("{base}.json"), &tree.to_json()?)?;
        self.append_manifest(&ManifestLine {
            key: base,
            stem: &key.stem,
            id: key.id,
            rule: &key.suffix,
            status,
            sha256: sha256_hex(source),
            source: source_file,
            tree: Some(tree_file),
            diagnostics: None,
        })
    }

    fn store_rejected(&self, key: &VariantKey, source: &str, diagnostics: &str) -> Result<()> {
        let base = key.file_stem();
        self.claim(&base)?;
        let source_file = self.write(&format!("{base}.sol"), source)?;
        let log_file = self.write(&format!("{base}.log"), diagnostics)?;
        self.append_manifest(&ManifestLine {
            key: base,
            stem: &key.stem,
            id: key.id,
            rule: &key.suffix,
            status: VariantStatus::Rejected,
            sha256: sha256_hex(source),
            source: source_file,
            tree: None,
            diagnostics: Some(log_file),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::rules::fixture::contract;

    fn manifest(store: &FsArtifactStore) -> Vec<serde_json::Value> {
        fs::read_to_string(store.manifest_path())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn key_names_follow_legacy_layout() {
        let key = VariantKey::new("Token", NodeId(57), "1-3-1");
        assert_eq!(key.file_stem(), "Token_57_vul_1-3-1");
    }

    #[test]
    fn accepted_variant_writes_source_tree_and_catalog_line() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(&dir.path().join("vul")).unwrap();
        let tree = contract("");
        let key = VariantKey::new("Token", NodeId(57), "1-3-1");
        store
            .store_accepted(&key, "contract Target {}\n", &tree, VariantStatus::Accepted)
            .unwrap();
        store.store_baseline("Token", "1-3-1", &tree).unwrap();

        assert!(store.root().join("Token_57_vul_1-3-1.sol").is_file());
        assert!(store.root().join("Token_57_vul_1-3-1.json").is_file());
        assert!(store.root().join("Token_n_orig_ast_1-3-1.json").is_file());
        let lines = manifest(&store);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["status"], "accepted");
        assert_eq!(lines[0]["id"], 57);
        assert_eq!(lines[0]["sha256"], sha256_hex("contract Target {}\n"));
        assert_eq!(lines[0]["sha256"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn rejected_variant_keeps_diagnostics_not_tree() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path()).unwrap();
        let key = VariantKey::new("Token", NodeId(9), "5-6-2");
        store.store_rejected(&key, "broken", "TypeError").unwrap();

        assert!(!store.root().join("Token_9_vul_5-6-2.json").exists());
        let log = fs::read_to_string(store.root().join("Token_9_vul_5-6-2.log")).unwrap();
        assert_eq!(log, "TypeError");
        let lines = manifest(&store);
        assert_eq!(lines[0]["status"], "rejected");
        assert_eq!(lines[0]["diagnostics"], "Token_9_vul_5-6-2.log");
    }

    #[test]
    fn failed_write_is_persistence_and_leaves_no_catalog_line() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path()).unwrap();
        let key = VariantKey::new("Token", NodeId(9), "5-6-2");
        fs::create_dir(store.root().join("Token_9_vul_5-6-2.sol")).unwrap();
        let err = store.store_rejected(&key, "broken", "TypeError");
        assert!(matches!(err, Err(MutationError::Persistence { .. })));
        assert!(!store.manifest_path().exists());
    }

    #[test]
    fn a_key_is_stored_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path()).unwrap();
        let tree = contract("");
        let key = VariantKey::new("Vault", NodeId(10), "6-1-7");
        store
            .store_accepted(&key, "first", &tree, VariantStatus::Accepted)
            .unwrap();
        let err = store.store_accepted(&key, "second", &tree, VariantStatus::Accepted);
        assert!(matches!(err, Err(MutationError::Persistence { .. })));
        let err = store.store_rejected(&key, "third", "TypeError");
        assert!(matches!(err, Err(MutationError::Persistence { .. })));

        let source = fs::read_to_string(store.root().join("Vault_10_vul_6-1-7.sol")).unwrap();
        assert_eq!(source, "first");
        assert_eq!(manifest(&store).len(), 1);
    }
}
