//! Configuration
//!
//! Settings come from git config and are overridden by command-line flags.

use std::path::Path;

use crate::git::GitExecutor;
use crate::git::constants::{commands, config_keys, flags};

/// Effective settings for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    /// Rewrite commits already on a remote-tracking branch
    pub allow_rewrite_published: bool,
    /// Answer confirmation prompts with yes
    pub assume_yes: bool,
}

/// Command-line values; `None` keeps the git config value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigOverrides {
    pub allow_rewrite_published: Option<bool>,
    pub assume_yes: Option<bool>,
}

impl Config {
    /// Read `gitfixup.*` keys visible from `workdir`
    ///
    /// Unset keys, or a git that cannot be run, fall back to defaults.
    pub fn load(executor: &GitExecutor, workdir: &Path) -> Self {
        let read = |key: &str| read_bool(executor, workdir, key).unwrap_or(false);
        let config = Self {
            allow_rewrite_published: read(config_keys::ALLOW_REWRITE_PUBLISHED),
            assume_yes: read(config_keys::ASSUME_YES),
        };
        tracing::debug!(?config, "loaded git config");
        config
    }

    /// Apply command-line overrides
    pub fn merge(self, overrides: ConfigOverrides) -> Self {
        Self {
            allow_rewrite_published: overrides
                .allow_rewrite_published
                .unwrap_or(self.allow_rewrite_published),
            assume_yes: overrides.assume_yes.unwrap_or(self.assume_yes),
        }
    }
}

fn read_bool(executor: &GitExecutor, workdir: &Path, key: &str) -> Option<bool> {
    let output = executor
        .run(workdir, &[commands::CONFIG, flags::BOOL, flags::GET, key])
        .ok()?;
    if !output.success() {
        return None;
    }
    parse_bool(&output.stdout)
}

/// Parse `git config --bool` output
fn parse_bool(output: &str) -> Option<bool> {
    match output.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
