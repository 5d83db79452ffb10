//! Fixup and whitespace workflows
//!
//! Each workflow composes several git commands into one operation, with
//! every precondition checked before the first mutating command runs.

mod fixup;
mod graph;
mod prompt;
mod validate;
mod whitespace;

pub use fixup::{FixupOrchestrator, FixupReport, FixupState, HistoryView};
pub use graph::CommitGraphQuery;
pub use prompt::{AssumeYes, Confirm, TerminalPrompt};
pub use validate::RevisionValidator;
pub use whitespace::{BufferState, DropOutcome, WhitespaceDiffDropper};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::git::GitError;

/// Broad class of a workflow failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Environment not ready; nothing was touched
    Precondition,
    /// Bad revision input; nothing was touched
    Validation,
    /// Repository state rules the operation out; nothing was touched
    Preflight,
    /// A mutating command failed; the repository may need follow-up
    Mutation,
    /// The user chose not to proceed
    Declined,
    /// Running git itself failed
    Internal,
}

/// Errors raised by the workflows
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("{} is not inside a git working tree", .0.display())]
    NotAWorkingTree(PathBuf),

    #[error("{} has unsaved changes", .0.display())]
    UnsavedChanges(PathBuf),

    #[error("{} has staged changes; unstage them first", .0.display())]
    StagedChangesPresent(PathBuf),

    #[error("Revision is empty")]
    EmptyRevision,

    #[error("Unsafe revision {revision:?}: {reason}")]
    UnsafeRevision { revision: String, reason: String },

    #[error("Revision {0:?} does not name a commit")]
    UnresolvableRevision(String),

    #[error("Incomplete range {0:?}: both sides are required")]
    IncompleteRange(String),

    #[error("{0:?} is a range; fixup needs a single commit")]
    RangeNotAllowed(String),

    #[error("{commit} is a merge commit with {parents} parents; fixup cannot pick a rebase base")]
    MergeCommitUnsupported { commit: String, parents: usize },

    #[error("{commit} is not an ancestor of HEAD; only the current branch can be fixed up")]
    NotAnAncestor { commit: String },

    #[error("Could not read parents of {commit}: {message}")]
    QueryFailed { commit: String, message: String },

    #[error("No staged changes to fix up")]
    NoStagedChanges,

    #[error("Unstaged changes present; the autosquash rebase would refuse to run. Stash or stage them first")]
    UnstagedChangesPresent,

    #[error("Preflight query failed (exit code {status}): {message}")]
    PreflightQueryFailed { status: i32, message: String },

    #[error("Rewriting history is not allowed: {0}")]
    RewriteNotAllowed(String),

    #[error("Declined")]
    UserDeclined,

    #[error("Fixup commit failed (exit code {status}): {output}")]
    FixupCommitFailed { status: i32, output: String },

    #[error(
        "Rebase failed (exit code {status}): {output}\nThe fixup commit remains in history; finish or abort the rebase manually"
    )]
    RebaseFailed { status: i32, output: String },

    #[error("Diff for {path} unexpectedly touches {files:?}")]
    PatchOutOfScope { path: String, files: Vec<String> },

    #[error("Patch does not apply (exit code {status}): {output}")]
    PatchDoesNotApply { status: i32, output: String },

    #[error("Could not revert {} (exit code {status}); original content restored", .path.display())]
    RevertFailed { path: PathBuf, status: i32 },

    #[error("Applying patch failed (exit code {status}); original content restored: {output}")]
    PatchApplyFailed { status: i32, output: String },

    #[error("Staging patch failed (exit code {status}): {output}")]
    StageFailed { status: i32, output: String },

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::NotAWorkingTree(_)
            | WorkflowError::UnsavedChanges(_)
            | WorkflowError::StagedChangesPresent(_) => ErrorKind::Precondition,
            WorkflowError::EmptyRevision
            | WorkflowError::UnsafeRevision { .. }
            | WorkflowError::UnresolvableRevision(_)
            | WorkflowError::IncompleteRange(_)
            | WorkflowError::RangeNotAllowed(_)
            | WorkflowError::MergeCommitUnsupported { .. }
            | WorkflowError::NotAnAncestor { .. } => ErrorKind::Validation,
            WorkflowError::QueryFailed { .. }
            | WorkflowError::NoStagedChanges
            | WorkflowError::UnstagedChangesPresent
            | WorkflowError::PreflightQueryFailed { .. }
            | WorkflowError::RewriteNotAllowed(_)
            | WorkflowError::PatchOutOfScope { .. }
            | WorkflowError::PatchDoesNotApply { .. } => ErrorKind::Preflight,
            WorkflowError::UserDeclined => ErrorKind::Declined,
            WorkflowError::FixupCommitFailed { .. }
            | WorkflowError::RebaseFailed { .. }
            | WorkflowError::RevertFailed { .. }
            | WorkflowError::PatchApplyFailed { .. }
            | WorkflowError::StageFailed { .. } => ErrorKind::Mutation,
            WorkflowError::Git(
                GitError::NotARepository
                | GitError::GitNotFound
                | GitError::UnsupportedVersion { .. },
            ) => ErrorKind::Precondition,
            WorkflowError::Git(_) | WorkflowError::Io(_) => ErrorKind::Internal,
        }
    }

    /// Whether the failure is known to precede any repository mutation
    pub fn is_before_mutation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Precondition | ErrorKind::Validation | ErrorKind::Preflight | ErrorKind::Declined
        )
    }
}

#[cfg(test)]
pub(crate) mod testing;
