//! GHZ command-line interface.
//!
//! The binary lives in `main.rs`; argument definitions and command bodies are
//! kept here so integration tests can drive them directly.

pub mod cli;
pub mod commands;

pub use cli::{CircuitFormat, Cli, Commands, OutputFormat, RunArgs};
