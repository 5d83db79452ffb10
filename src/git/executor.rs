//! git command executor
//!
//! Handles running git commands and capturing their output.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::instrument;

use super::GitError;
use super::constants::{self, env, errors, flags, special};

/// Per-invocation options for a git child process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Suppress sequence and message editors for this one child process
    pub noninteractive: bool,
}

impl RunOptions {
    pub fn noninteractive() -> Self {
        Self {
            noninteractive: true,
        }
    }
}

/// Exit status and captured output of one git invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code (0 = success, -1 = killed by signal)
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// stderr if non-empty, otherwise stdout
    pub fn message(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }

    /// Convert a non-zero status into `GitError::CommandFailed`
    pub fn into_result(self) -> Result<String, GitError> {
        if self.success() {
            Ok(self.stdout)
        } else if self.stderr.contains(errors::NOT_A_REPO) {
            Err(GitError::NotARepository)
        } else {
            Err(GitError::CommandFailed {
                stderr: self.stderr,
                exit_code: self.status,
            })
        }
    }
}

/// Executor for git commands
#[derive(Debug, Clone)]
pub struct GitExecutor {
    /// Path or name of the git binary
    binary: PathBuf,
}

impl Default for GitExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl GitExecutor {
    /// Create an executor using `$GITFIXUP_GIT` or `git` from PATH
    pub fn new() -> Self {
        let binary = std::env::var_os(constants::GIT_BINARY_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(constants::GIT_COMMAND));
        Self { binary }
    }

    /// Create an executor for a specific git binary
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run a git command in `workdir`, capturing output regardless of exit status
    ///
    /// Only a failure to spawn the process is an error; interpreting the
    /// status is left to the caller.
    #[instrument(
        skip(self, options),
        fields(
            git_command = args.join(" "),
            repository_path = %workdir.display(),
            noninteractive = options.noninteractive,
            success = tracing::field::Empty,
        )
    )]
    pub fn run_with(
        &self,
        workdir: &Path,
        args: &[&str],
        options: RunOptions,
    ) -> Result<CommandOutput, GitError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(flags::NO_PAGER).args(args).current_dir(workdir);

        if options.noninteractive {
            cmd.env(env::SEQUENCE_EDITOR, env::ACCEPT_UNCHANGED)
                .env(env::EDITOR, env::ACCEPT_UNCHANGED);
        }

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::GitNotFound
            } else {
                GitError::IoError(e)
            }
        })?;

        let result = CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::Span::current().record("success", result.success());
        if !result.success() {
            tracing::debug!(exit_code = result.status, stderr = %result.stderr.trim(), "git command returned non-zero");
        }
        Ok(result)
    }

    /// Run a git command with default options
    pub fn run(&self, workdir: &Path, args: &[&str]) -> Result<CommandOutput, GitError> {
        self.run_with(workdir, args, RunOptions::default())
    }

    /// Get the git version
    pub fn version(&self, workdir: &Path) -> Result<String, GitError> {
        let output = self.run(workdir, &[flags::VERSION])?.into_result()?;
        // Output format: "git version 2.43.0"
        let trimmed = output.trim();
        Ok(trimmed
            .strip_prefix(special::VERSION_PREFIX)
            .unwrap_or(trimmed)
            .to_string())
    }

    /// Check if git version is supported
    pub fn check_version(&self, workdir: &Path) -> Result<(), GitError> {
        let version = self.version(workdir)?;
        if !is_version_supported(&version, constants::MIN_GIT_VERSION) {
            return Err(GitError::UnsupportedVersion {
                version,
                minimum: constants::MIN_GIT_VERSION.to_string(),
            });
        }
        Ok(())
    }
}

/// Compare version strings (simple semver comparison)
///
/// Handles vendor suffixes like "2.39.3 (Apple Git-146)" and "2.45.0.windows.1".
fn is_version_supported(version: &str, minimum: &str) -> bool {
    let parse_version = |v: &str| -> Option<(u32, u32, u32)> {
        let core = v.split_whitespace().next()?;
        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() >= 2 {
            let major = parts[0].parse().ok()?;
            let minor = parts[1].parse().ok()?;
            // Strip prerelease suffix (e.g., "0-rc1" -> "0")
            let patch = parts
                .get(2)
                .and_then(|p| p.split('-').next().and_then(|n| n.parse().ok()))
                .unwrap_or(0);
            Some((major, minor, patch))
        } else {
            None
        }
    };

    match (parse_version(version), parse_version(minimum)) {
        (Some(v), Some(m)) => v >= m,
        _ => false,
    }
}
