// src/config/mod.rs
//! Run settings from `solmutant.toml`.
pub mod types;

pub use self::types::{CompilerConfig, Config, OutputConfig, RuleSelection};
use colored::Colorize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "solmutant.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `solmutant.toml` from `dir`.
    ///
    /// A missing file yields the defaults. A malformed one is reported on
    /// stderr and also yields the defaults.
    #[must_use]
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };
        match Self::parse(&content) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "{} ignoring {}: {e}",
                    "warning:".yellow().bold(),
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// # Errors
    /// Returns the TOML error if `content` is not a valid configuration.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
