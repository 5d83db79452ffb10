//! git command execution layer
//!
//! This module handles executing git commands and parsing their output.

mod backend;
pub mod constants;
mod executor;
/// Parser module (public for integration testing)
pub mod parser;
mod policy;

pub use backend::GitBackend;
pub use executor::{CommandOutput, GitExecutor, RunOptions};
pub use policy::{NoRewritePolicy, PublishedHistoryPolicy, RewritePolicy};

use std::io;
use thiserror::Error;

/// Errors that can occur when executing git commands
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("git command failed (exit code {exit_code}): {stderr}")]
    CommandFailed { stderr: String, exit_code: i32 },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("git is not installed or not in PATH")]
    GitNotFound,

    #[error("git {version} is not supported (minimum {minimum})")]
    UnsupportedVersion { version: String, minimum: String },
}
