// src/frontend/solc.rs
//! `solc` invoked as a subprocess on a scratch copy of the input.
//!
//! The scratch file sits next to the input so relative imports resolve, and
//! each call gets its own, so parallel pipelines never share compiler files.
//! Nothing is written with `--output-dir`; the tree is read from stdout.

use super::{pragma, CompilerFrontend, Verification};
use crate::ast::Tree;
use crate::config::CompilerConfig;
use crate::error::{MutationError, Result};
use serde::de::IgnoredAny;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

pub struct SolcFrontend {
    program: String,
    args: Vec<String>,
    select_version: bool,
    version_floor: BTreeMap<String, String>,
}

impl SolcFrontend {
    /// # Errors
    /// `Frontend` if the command line cannot be split or is empty.
    pub fn new(config: &CompilerConfig) -> Result<Self> {
        let mut parts = shell_words::split(&config.command)
            .map_err(|e| MutationError::Frontend(format!("bad compiler command: {e}")))?;
        if parts.is_empty() {
            return Err(MutationError::Frontend("empty compiler command".to_string()));
        }
        let program = parts.remove(0);
        parts.extend(config.extra_args.iter().cloned());
        Ok(Self {
            program,
            args: parts,
            select_version: config.select_version,
            version_floor: config.version_floor.clone(),
        })
    }

    fn scratch_copy(path: &Path, source: &str) -> Result<NamedTempFile> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let io_err = |source: std::io::Error| MutationError::Io {
            source,
            path: dir.to_path_buf(),
        };
        let mut file = tempfile::Builder::new()
            .prefix(".solmutant-")
            .suffix(".sol")
            .tempfile_in(dir)
            .map_err(io_err)?;
        file.write_all(source.as_bytes()).map_err(io_err)?;
        file.flush().map_err(io_err)?;
        Ok(file)
    }

    /// Runs the compiler on a scratch copy of `source` from the scratch's
    /// directory, so its output headers carry the bare file name.
    fn run(&self, path: &Path, source: &str, flags: &[&str]) -> Result<(Output, String)> {
        let scratch = Self::scratch_copy(path, source)?;
        let name = scratch
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| MutationError::Other("scratch file has no name".to_string()))?;
        let mut command = Command::new(&self.program);
        command.args(&self.args).args(flags).arg(&name);
        if let Some(dir) = scratch.path().parent() {
            command.current_dir(dir);
        }
        if self.select_version {
            if let Some(version) = pragma::select_version(source, &self.version_floor) {
                command.env("SOLC_VERSION", version);
            }
        }
        let output = command
            .output()
            .map_err(|e| MutationError::Frontend(format!("cannot run {}: {e}", self.program)))?;
        Ok((output, name))
    }
}

fn combined(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// The JSON tree printed under the `======= <file> =======` header.
pub(crate) fn ast_section<'a>(stdout: &'a str, file: &str) -> Option<&'a str> {
    let header = format!("======= {file} =======");
    let after = stdout.find(&header)? + header.len();
    let start = after + stdout[after..].find('{')?;
    let rest = &stdout[start..];
    let mut de = serde_json::Deserializer::from_str(rest);
    de.disable_recursion_limit();
    let mut values = de.into_iter::<IgnoredAny>();
    values.next()?.ok()?;
    Some(&rest[..values.byte_offset()])
}

impl CompilerFrontend for SolcFrontend {
    fn parse(&self, path: &Path, source: &str) -> Result<Tree> {
        let (output, name) = self.run(path, source, &["--ast-compact-json"])?;
        if !output.status.success() {
            return Err(MutationError::Frontend(combined(&output)));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let json = ast_section(&stdout, &name).ok_or_else(|| {
            MutationError::Frontend(format!("no AST for {} in compiler output", path.display()))
        })?;
        Tree::from_json(json).map_err(|e| {
            MutationError::Frontend(format!("unreadable AST for {}: {e}", path.display()))
        })
    }

    fn verify(&self, path: &Path, source: &str) -> Verification {
        let (output, name) = match self.run(path, source, &["--bin", "--ast-compact-json"]) {
            Ok(run) => run,
            Err(e) => return Verification::rejected(e.to_string()),
        };
        let diagnostics = combined(&output);
        if !output.status.success() {
            return Verification::rejected(diagnostics);
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let tree = ast_section(&stdout, &name).and_then(|json| Tree::from_json(json).ok());
        Verification {
            accepted: true,
            diagnostics,
            tree,
        }
    }
}
