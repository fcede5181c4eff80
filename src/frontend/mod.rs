// src/frontend/mod.rs
//! Boundary with the compiler that parses baselines and verifies variants.

pub mod pragma;
mod solc;

pub use solc::SolcFrontend;

use crate::ast::Tree;
use crate::error::Result;
use std::path::Path;

/// Verdict on one regenerated source.
#[derive(Debug, Clone)]
pub struct Verification {
    pub accepted: bool,
    /// Combined compiler output, kept for rejected variants.
    pub diagnostics: String,
    /// The compiler's own tree for accepted source, when it produced one.
    pub tree: Option<Tree>,
}

impl Verification {
    #[must_use]
    pub fn rejected(diagnostics: impl Into<String>) -> Self {
        Self {
            accepted: false,
            diagnostics: diagnostics.into(),
            tree: None,
        }
    }
}

pub trait CompilerFrontend: Send + Sync {
    /// Parses `source`, which was read from `path`, into a baseline tree.
    ///
    /// # Errors
    /// `Frontend` if the compiler fails or its output is not a known tree.
    fn parse(&self, path: &Path, source: &str) -> Result<Tree>;

    /// Recompiles a variant of the file at `path`. A compiler that cannot be
    /// run counts as a rejection.
    fn verify(&self, path: &Path, source: &str) -> Verification;
}
