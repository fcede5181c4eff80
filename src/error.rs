// src/error.rs
use crate::ast::NodeId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MutationError {
    /// A rewrite or the generator needed a child that the node does not have.
    #[error("structural error in {kind}: {detail}")]
    Structural { kind: &'static str, detail: String },

    #[error("node #{id} not found in tree")]
    NotFound { id: NodeId },

    #[error("failed to persist artifact {path}: {source}")]
    Persistence {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("compiler frontend failed: {0}")]
    Frontend(String),

    #[error("Generic error: {0}")]
    Other(String),
}

impl MutationError {
    pub fn structural(kind: &'static str, detail: impl Into<String>) -> Self {
        Self::Structural {
            kind,
            detail: detail.into(),
        }
    }

    /// True for failures that only invalidate the candidate being processed.
    #[must_use]
    pub fn is_candidate_local(&self) -> bool {
        matches!(self, Self::Structural { .. } | Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, MutationError>;

// Allow `?` on std::io::Error by converting to MutationError::Io with unknown path.
impl From<std::io::Error> for MutationError {
    fn from(source: std::io::Error) -> Self {
        MutationError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl From<walkdir::Error> for MutationError {
    fn from(e: walkdir::Error) -> Self {
        MutationError::Other(e.to_string())
    }
}
