// src/events.rs
//! Machine-readable event logging for audit trails.
//!
//! Events are appended to `<output dir>/events.jsonl`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    RunStarted {
        files: usize,
        rules: Vec<String>,
    },
    FileStarted {
        path: String,
    },
    VariantAccepted {
        path: String,
        rule: String,
        id: u64,
        verified: bool,
    },
    VariantRejected {
        path: String,
        rule: String,
        id: u64,
    },
    CandidateSkipped {
        path: String,
        rule: String,
        candidate: u64,
        reason: String,
    },
    FileFailed {
        path: String,
        error: String,
    },
    RunFinished {
        accepted: usize,
        rejected: usize,
        skipped: usize,
        failed_files: usize,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SolmutantEvent {
    pub timestamp: u64,
    pub kind: EventKind,
}

#[derive(Clone)]
pub struct EventLogger {
    log_path: PathBuf,
}

impl EventLogger {
    #[must_use]
    pub fn new(output_dir: &Path) -> Self {
        let log_path = output_dir.join("events.jsonl");
        Self { log_path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn log(&self, kind: EventKind) {
        // Best-effort: a lost event never stops variant generation.
        if let Ok(json) = Self::serialize_event(kind) {
            let _ = self.append_to_file(&json);
        }
    }

    fn serialize_event(kind: EventKind) -> Result<String> {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let event = SolmutantEvent { timestamp, kind };
        Ok(serde_json::to_string(&event)?)
    }

    /// One `write_all` per line so workers appending at once keep whole lines.
    fn append_to_file(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        file.write_all(format!("{line}\n").as_bytes())?;
        Ok(())
    }
}
