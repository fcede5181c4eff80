pub mod ast;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod exit;
pub mod frontend;
pub mod locate;
pub mod rules;
pub mod splice;
pub mod store;
