//! Mailsift CLI library.
//!
//! Provides the command-line surface of the pipeline: configuration
//! loading, the file-backed mailbox adapter, command execution, and
//! output formatting. The binary in `main.rs` is a thin wrapper.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod output;

pub use cli::{Cli, Command};
pub use config::{Config, LlmSettings};
pub use error::{CliError, Result};
pub use mailbox::JsonMailbox;
pub use output::Formatter;
