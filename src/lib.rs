//! gitfixup - safe fixup + autosquash for git
//!
//! Folds staged changes into an earlier commit and autosquashes in one
//! step, and drops whitespace-only edits from a file.
//!
//! This library provides:
//! - [`config`]: Settings from git config and the command line
//! - [`git`]: git command execution and parsing
//! - [`model`]: Domain models
//! - [`view`]: Command-line history view
//! - [`workflow`]: The fixup and whitespace workflows

pub mod config;
pub mod git;
pub mod model;
pub mod view;
pub mod workflow;
