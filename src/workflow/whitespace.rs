//! Whitespace-only change dropping
//!
//! Reverts the whitespace-only edits in one file while keeping its
//! substantive edits, by replaying a context-free `git diff -w` on top of
//! the committed version. The on-disk content is snapshotted first and
//! written back if the working file cannot be rebuilt.

use std::fs;
use std::io::Write;
use std::path::{Component, Path};

use super::WorkflowError;
use super::validate::resolve_root;
use crate::git::GitBackend;
use crate::git::parser::Parser;
use crate::model::{Notification, PendingPatch};

/// Whether the caller holds unsaved edits for the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferState {
    #[default]
    Saved,
    Modified,
}

/// Result of a successful drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No substantive diff; nothing was touched
    NothingToDo(Notification),
    /// Whitespace-only edits reverted; substantive edits kept and staged
    Dropped(Notification),
}

impl DropOutcome {
    pub fn notification(&self) -> &Notification {
        match self {
            DropOutcome::NothingToDo(n) | DropOutcome::Dropped(n) => n,
        }
    }
}

/// Drops whitespace-only changes from a single file
pub struct WhitespaceDiffDropper<'a, B: GitBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: GitBackend + ?Sized> WhitespaceDiffDropper<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub fn run(&self, file: &Path, buffer: BufferState) -> Result<DropOutcome, WorkflowError> {
        let file = fs::canonicalize(file)?;
        let dir = file.parent().unwrap_or(Path::new("/"));
        let root = fs::canonicalize(resolve_root(self.backend, dir)?)?;

        if buffer == BufferState::Modified {
            return Err(WorkflowError::UnsavedChanges(file));
        }
        let relative = file
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .map_err(|_| WorkflowError::NotAWorkingTree(file.clone()))?;
        let shown = slash_path(&relative);

        self.require_nothing_staged(&root, &relative)?;

        let output = self.backend.diff_worktree(&root, &relative, true)?;
        if !output.success() {
            return Err(WorkflowError::PreflightQueryFailed {
                status: output.status,
                message: output.message().to_string(),
            });
        }
        // Older gits print bare headers for whitespace-only files
        if !has_hunks(&output.stdout) {
            tracing::info!(path = %shown, "no substantive changes");
            return Ok(DropOutcome::NothingToDo(Notification::info(format!(
                "No whitespace-insensitive changes in {}",
                shown
            ))));
        }

        let files = Parser::parse_diff_file_names(&output.stdout);
        if files.iter().any(|f| *f != shown) {
            return Err(WorkflowError::PatchOutOfScope {
                path: shown,
                files,
            });
        }

        let target = root.join(&relative);
        let patch = PendingPatch::new(relative, output.stdout, fs::read(&target)?);
        self.replay(&root, &target, &patch)?;

        tracing::info!(path = %shown, "whitespace-only changes dropped");
        Ok(DropOutcome::Dropped(Notification::success(format!(
            "Dropped whitespace-only changes in {}",
            shown
        ))))
    }

    fn require_nothing_staged(&self, root: &Path, relative: &Path) -> Result<(), WorkflowError> {
        let output = self.backend.diff_cached_quiet(root, Some(relative))?;
        match output.status {
            0 => Ok(()),
            1 => Err(WorkflowError::StagedChangesPresent(relative.to_path_buf())),
            status => Err(WorkflowError::PreflightQueryFailed {
                status,
                message: output.message().to_string(),
            }),
        }
    }

    /// Revert the file and re-apply the substantive diff to it and the index
    fn replay(&self, root: &Path, target: &Path, patch: &PendingPatch) -> Result<(), WorkflowError> {
        // Removed when dropped, on every exit path
        let mut artifact = tempfile::Builder::new()
            .prefix("gitfixup-")
            .suffix(".patch")
            .tempfile()?;
        artifact.write_all(patch.diff.as_bytes())?;
        artifact.flush()?;

        let output = self.backend.apply_check(root, artifact.path())?;
        if !output.success() {
            return Err(WorkflowError::PatchDoesNotApply {
                status: output.status,
                output: output.message().to_string(),
            });
        }

        let snapshot = scopeguard::guard(&patch.snapshot, |snapshot| {
            restore_snapshot(target, snapshot);
        });

        let output = self.backend.revert_file(root, patch.path())?;
        if !output.success() {
            return Err(WorkflowError::RevertFailed {
                path: patch.path().to_path_buf(),
                status: output.status,
            });
        }

        let output = self.backend.apply_patch(root, artifact.path(), false)?;
        if !output.success() {
            return Err(WorkflowError::PatchApplyFailed {
                status: output.status,
                output: output.message().to_string(),
            });
        }

        // Working file is final; keep it even if staging fails
        scopeguard::ScopeGuard::into_inner(snapshot);

        let output = self.backend.apply_patch(root, artifact.path(), true)?;
        if !output.success() {
            return Err(WorkflowError::StageFailed {
                status: output.status,
                output: output.message().to_string(),
            });
        }

        if let Err(e) = artifact.close() {
            tracing::warn!(error = %e, "could not remove patch file");
        }
        Ok(())
    }
}

fn restore_snapshot(target: &Path, snapshot: &[u8]) {
    match fs::write(target, snapshot) {
        Ok(()) => tracing::warn!(path = %target.display(), "restored original content"),
        Err(e) => tracing::error!(
            path = %target.display(),
            error = %e,
            "could not restore original content"
        ),
    }
}

fn has_hunks(diff: &str) -> bool {
    diff.lines().any(|line| line.starts_with("@@"))
}

/// Repository-relative path with `/` separators, as git prints it
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
