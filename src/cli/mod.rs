//! CLI module for the `jdl` binary

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use error::CliError;
