use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Program and leading arguments, split with shell rules.
    #[serde(default = "default_command")]
    pub command: String,
    /// Pass the pragma-derived version through `SOLC_VERSION`.
    #[serde(default = "default_true")]
    pub select_version: bool,
    /// Versions that are remapped before selection.
    #[serde(default = "default_version_floor")]
    pub version_floor: BTreeMap<String, String>,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            select_version: true,
            version_floor: default_version_floor(),
            extra_args: Vec::new(),
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default = "default_true")]
    pub keep_rejected: bool,
    #[serde(default = "default_true")]
    pub write_baseline: bool,
    #[serde(default = "default_true")]
    pub annotate: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            keep_rejected: true,
            write_baseline: true,
            annotate: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSelection {
    /// Empty means every rule.
    #[serde(default)]
    pub enabled: Vec<String>,
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// Contents of `solmutant.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub rules: RuleSelection,
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compiler: CompilerConfig::default(),
            output: OutputConfig::default(),
            rules: RuleSelection::default(),
            jobs: default_jobs(),
        }
    }
}

const fn default_true() -> bool { true }
fn default_command() -> String { "solc".to_string() }
fn default_output_dir() -> String { "vul".to_string() }

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8))
        .unwrap_or(4)
}

/// Early 0.4 releases lack the AST shape the generator expects.
fn default_version_floor() -> BTreeMap<String, String> {
    ["0.4.0", "0.4.10", "0.4.11", "0.4.13", "0.4.16", "0.4.17", "0.4.18", "0.4.19", "0.4.20", "0.4.21", "0.4.22"]
        .into_iter()
        .map(|v| (v.to_string(), "0.4.25".to_string()))
        .collect()
}
