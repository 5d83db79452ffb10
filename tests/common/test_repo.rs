//! TestRepo helper for integration tests.
//!
//! Provides a temporary git repository for testing gitfixup operations.

use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// A temporary git repository for testing.
///
/// The repository is automatically cleaned up when the TestRepo is dropped.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new git repository in a temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let repo = Self { dir };

        repo.git(&["init", "-q"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.git(&["config", "core.autocrlf", "false"]);
        repo
    }

    /// Get the path to the repository root.
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Execute a git command in this repository.
    ///
    /// # Panics
    ///
    /// Panics if the command fails to execute or returns a non-zero exit code.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to execute git command");

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!(
                "git {:?} failed with exit code {:?}:\n{}",
                args,
                output.status.code(),
                stderr
            );
        }

        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Execute a git command, returning Result instead of panicking.
    ///
    /// Use this when testing error cases or when failure is expected.
    pub fn git_result(&self, args: &[&str]) -> Result<String, String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to execute git command");

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).into_owned())
        }
    }

    /// Write a file in the repository.
    pub fn write_file(&self, name: &str, content: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&path, content).expect("Failed to write file");
    }

    /// Read a file from the repository.
    ///
    /// Returns an empty string if the file does not exist.
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).unwrap_or_default()
    }

    /// Write, stage, and commit a file, returning the new commit id.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> String {
        self.write_file(name, content);
        self.git(&["add", name]);
        self.git(&["commit", "-q", "-m", message]);
        self.rev_parse("HEAD")
    }

    /// Write and stage a file without committing.
    pub fn stage_file(&self, name: &str, content: &str) {
        self.write_file(name, content);
        self.git(&["add", name]);
    }

    /// Resolve a revision to its full commit id.
    pub fn rev_parse(&self, rev: &str) -> String {
        self.git(&["rev-parse", rev]).trim().to_string()
    }

    /// Subjects of all commits reachable from HEAD, newest first.
    pub fn subjects(&self) -> Vec<String> {
        self.git(&["log", "--format=%s"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Content of `name` as of `rev`.
    pub fn show_file(&self, rev: &str, name: &str) -> String {
        self.git(&["show", &format!("{}:{}", rev, name)])
    }

    /// Whether the index differs from HEAD.
    pub fn has_staged_changes(&self) -> bool {
        self.git_result(&["diff", "--cached", "--quiet"]).is_err()
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}
