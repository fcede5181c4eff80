// src/cli/mod.rs
//! CLI command handlers.

pub mod args;
pub mod dispatch;
pub mod inject_handler;

pub use args::{Cli, Commands, InjectArgs};
