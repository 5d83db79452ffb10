//! Fixup + autosquash orchestration
//!
//! Turns the staged changes into a `fixup!` commit for a target commit and
//! immediately autosquashes it into place:
//!
//! ```text
//! Idle -> Validating -> PreflightChecked -> FixupCommitted -> Rebasing -> Done
//!   \________\________________\_________________\______________\-> Aborted
//! ```
//!
//! Every check runs before the first mutating command. Once the fixup commit
//! exists a failed rebase leaves it in history; that is reported, not undone.

use std::io;
use std::path::{Path, PathBuf};

use super::graph::CommitGraphQuery;
use super::prompt::Confirm;
use super::validate::RevisionValidator;
use super::WorkflowError;
use crate::git::constants::special;
use crate::git::parser::{Parser, is_squash_marker};
use crate::git::{GitBackend, RewritePolicy, RunOptions};
use crate::model::{LogEntry, Notification, RebaseBase, RevisionSpec, RewritePermission};

/// Where a fixup run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixupState {
    #[default]
    Idle,
    Validating,
    PreflightChecked,
    FixupCommitted,
    Rebasing,
    Done,
    Aborted,
}

impl FixupState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FixupState::Done | FixupState::Aborted)
    }
}

/// A view of commit history that should be redrawn after history changes
pub trait HistoryView {
    fn refresh(&mut self, root: &Path) -> io::Result<()>;
}

/// Result of a successful fixup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixupReport {
    /// The commit the staged changes were folded into
    pub target: String,
    /// Where the autosquash rebase started
    pub base: RebaseBase,
    /// Working-tree root the run operated on
    pub root: PathBuf,
    pub notification: Notification,
    /// Whether a history view was told to refresh
    pub refreshed_history: bool,
}

/// Runs the fixup state machine against one working tree
pub struct FixupOrchestrator<'a, B: GitBackend + ?Sized> {
    backend: &'a B,
    policy: &'a dyn RewritePolicy,
    confirm: &'a dyn Confirm,
    state: FixupState,
}

impl<'a, B: GitBackend + ?Sized> FixupOrchestrator<'a, B> {
    pub fn new(backend: &'a B, policy: &'a dyn RewritePolicy, confirm: &'a dyn Confirm) -> Self {
        Self {
            backend,
            policy,
            confirm,
            state: FixupState::Idle,
        }
    }

    pub fn state(&self) -> FixupState {
        self.state
    }

    /// Fold the staged changes into `commit` and autosquash
    ///
    /// `workdir` is any directory inside the working tree. On success the
    /// optional history `view` is refreshed.
    pub fn run(
        &mut self,
        commit: &str,
        workdir: &Path,
        view: Option<&mut dyn HistoryView>,
    ) -> Result<FixupReport, WorkflowError> {
        self.state = FixupState::Idle;

        let mut report = match self.execute(commit, workdir) {
            Ok(report) => report,
            Err(e) => {
                self.transition(FixupState::Aborted);
                tracing::warn!(commit, error = %e, "fixup aborted");
                return Err(e);
            }
        };
        self.transition(FixupState::Done);

        if let Some(view) = view {
            match view.refresh(&report.root) {
                Ok(()) => report.refreshed_history = true,
                Err(e) => {
                    tracing::warn!(error = %e, "history view refresh failed");
                    report.notification = Notification::warning(format!(
                        "{} (history not refreshed: {})",
                        report.notification, e
                    ));
                }
            }
        }

        tracing::info!(commit = %report.target, base = %report.base, "fixup complete");
        Ok(report)
    }

    fn execute(&mut self, commit: &str, workdir: &Path) -> Result<FixupReport, WorkflowError> {
        // Validating
        self.transition(FixupState::Validating);
        let target = match RevisionValidator::new(self.backend).validate(commit, workdir)? {
            RevisionSpec::Single(rev) => rev,
            range => return Err(WorkflowError::RangeNotAllowed(range.to_string())),
        };
        // Identity was confirmed by the validator
        let root = self.backend.toplevel(workdir)?;

        self.require_on_current_branch(&root, &target)?;

        // PreflightChecked
        self.require_staged_changes(&root)?;
        self.require_clean_work_tree(&root)?;
        self.require_rewrite_allowed(&root, &target)?;
        let base = self.rebase_base(&root, &target)?;
        self.confirm_pending_markers(&root, &base)?;
        self.transition(FixupState::PreflightChecked);

        // FixupCommitted
        let output = self
            .backend
            .commit_fixup(&root, &target, RunOptions::noninteractive())?;
        if !output.success() {
            return Err(WorkflowError::FixupCommitFailed {
                status: output.status,
                output: output.message().to_string(),
            });
        }
        self.transition(FixupState::FixupCommitted);

        // Rebasing
        self.transition(FixupState::Rebasing);
        let output = self
            .backend
            .rebase_autosquash(&root, &base, RunOptions::noninteractive())?;
        if !output.success() {
            return Err(WorkflowError::RebaseFailed {
                status: output.status,
                output: output.message().to_string(),
            });
        }

        Ok(FixupReport {
            notification: Notification::success(format!("Fixed up {}", target)),
            target,
            base,
            root,
            refreshed_history: false,
        })
    }

    fn transition(&mut self, next: FixupState) {
        debug_assert!(
            !self.state.is_terminal(),
            "no transition out of {:?}",
            self.state
        );
        debug_assert!(
            next != FixupState::Rebasing || self.state == FixupState::FixupCommitted,
            "rebase requires a fixup commit from this run"
        );
        tracing::debug!(from = ?self.state, to = ?next, "fixup state");
        self.state = next;
    }

    fn require_staged_changes(&self, root: &Path) -> Result<(), WorkflowError> {
        let output = self.backend.diff_cached_quiet(root, None)?;
        match output.status {
            0 => Err(WorkflowError::NoStagedChanges),
            1 => Ok(()),
            status => Err(WorkflowError::PreflightQueryFailed {
                status,
                message: output.message().to_string(),
            }),
        }
    }

    /// Rebasing from a commit off the current branch would replay HEAD onto it
    fn require_on_current_branch(&self, root: &Path, target: &str) -> Result<(), WorkflowError> {
        let output = self.backend.is_ancestor(root, target, special::HEAD)?;
        match output.status {
            0 => Ok(()),
            1 => Err(WorkflowError::NotAnAncestor {
                commit: target.to_string(),
            }),
            status => Err(WorkflowError::PreflightQueryFailed {
                status,
                message: output.message().to_string(),
            }),
        }
    }

    /// `rebase -i` refuses to start over unstaged edits
    fn require_clean_work_tree(&self, root: &Path) -> Result<(), WorkflowError> {
        let output = self.backend.diff_unstaged_quiet(root)?;
        match output.status {
            0 => Ok(()),
            1 => Err(WorkflowError::UnstagedChangesPresent),
            status => Err(WorkflowError::PreflightQueryFailed {
                status,
                message: output.message().to_string(),
            }),
        }
    }

    fn require_rewrite_allowed(&self, root: &Path, target: &str) -> Result<(), WorkflowError> {
        match self.policy.check(root, target) {
            RewritePermission::Allowed => Ok(()),
            RewritePermission::Unknown => {
                tracing::debug!(commit = target, "rewrite policy unavailable; skipping");
                Ok(())
            }
            RewritePermission::Disallowed(reason) => Err(WorkflowError::RewriteNotAllowed(reason)),
        }
    }

    fn rebase_base(&self, root: &Path, target: &str) -> Result<RebaseBase, WorkflowError> {
        let parents = CommitGraphQuery::new(self.backend).parents(root, target)?;
        parents
            .rebase_base()
            .ok_or_else(|| WorkflowError::MergeCommitUnsupported {
                commit: target.to_string(),
                parents: parents.len(),
            })
    }

    /// Existing squash markers in the rewritten range get squashed too; ask first
    fn confirm_pending_markers(&self, root: &Path, base: &RebaseBase) -> Result<(), WorkflowError> {
        let range = base.range_to(special::HEAD);
        let output = self
            .backend
            .log_search(root, special::SQUASH_MARKER_PATTERN, &range)?;
        if !output.success() {
            return Err(WorkflowError::QueryFailed {
                commit: range,
                message: output.message().to_string(),
            });
        }

        let pending: Vec<LogEntry> = Parser::parse_oneline_log(&output.stdout)
            .into_iter()
            .filter(|entry| is_squash_marker(&entry.subject))
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        tracing::warn!(count = pending.len(), range = %range, "pending squash markers");
        let question = format!(
            "{} commit(s) in {} already carry squash!/fixup!/amend! markers ({}); autosquash will fold them too. Proceed?",
            pending.len(),
            range,
            pending
                .iter()
                .map(|entry| entry.commit_id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        if self.confirm.confirm(&question)? {
            Ok(())
        } else {
            Err(WorkflowError::UserDeclined)
        }
    }
}
