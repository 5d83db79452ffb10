//! Recording fakes for workflow unit tests

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use super::{Confirm, HistoryView};
use crate::git::{CommandOutput, GitBackend, GitError, RewritePolicy, RunOptions};
use crate::model::{RebaseBase, RewritePermission};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Toplevel,
    IsWorkTree,
    VerifyCommit(String),
    QueryParents(String),
    DiffCachedQuiet(Option<PathBuf>),
    DiffUnstagedQuiet,
    IsAncestor { ancestor: String, descendant: String },
    CommitFixup { target: String, noninteractive: bool },
    RebaseAutosquash { base: RebaseBase, noninteractive: bool },
    DiffWorktree { path: PathBuf, ignore_whitespace: bool },
    ApplyCheck,
    RevertFile(PathBuf),
    ApplyPatch { staged: bool },
    LogSearch { pattern: String, range: String },
}

fn status(code: i32) -> CommandOutput {
    CommandOutput {
        status: code,
        stdout: String::new(),
        stderr: if code == 0 {
            String::new()
        } else {
            format!("fake failure {}", code)
        },
    }
}

fn stdout(text: &str) -> CommandOutput {
    CommandOutput {
        status: 0,
        stdout: text.to_string(),
        stderr: String::new(),
    }
}

/// Scriptable in-memory stand-in for git
///
/// File-touching calls (`revert_file`, `apply_patch`) write the scripted
/// contents to disk under `root` so snapshot handling can be observed.
pub struct FakeBackend {
    pub root: PathBuf,
    pub work_tree: bool,
    pub commits: HashSet<String>,
    pub parents: HashMap<String, Vec<String>>,
    /// `diff --cached --quiet` status for the whole index
    pub cached_status: i32,
    /// `diff --cached --quiet -- <path>` status
    pub path_cached_status: i32,
    /// `diff --quiet` status (working tree vs index)
    pub unstaged_status: i32,
    /// `merge-base --is-ancestor` status
    pub ancestor_status: i32,
    pub commit_status: i32,
    pub rebase_status: i32,
    pub log_search_status: i32,
    pub log_search_output: String,
    pub worktree_diff: String,
    pub apply_check_status: i32,
    pub revert_status: i32,
    pub apply_status: i32,
    pub stage_status: i32,
    /// Written by a successful `revert_file`
    pub committed_content: String,
    /// Written by a successful working-tree `apply_patch`
    pub patched_content: String,
    /// Written by a failing working-tree `apply_patch`
    pub apply_leaves_garbage: bool,
    /// Patch files handed to git, for cleanup assertions
    pub patch_paths: RefCell<Vec<PathBuf>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeBackend {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            work_tree: true,
            commits: HashSet::new(),
            parents: HashMap::new(),
            cached_status: 1,
            path_cached_status: 0,
            unstaged_status: 0,
            ancestor_status: 0,
            commit_status: 0,
            rebase_status: 0,
            log_search_status: 0,
            log_search_output: String::new(),
            worktree_diff: String::new(),
            apply_check_status: 0,
            revert_status: 0,
            apply_status: 0,
            stage_status: 0,
            committed_content: String::new(),
            patched_content: String::new(),
            apply_leaves_garbage: false,
            patch_paths: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_commits(mut self, commits: &[&str]) -> Self {
        self.commits.extend(commits.iter().map(|c| c.to_string()));
        self
    }

    /// Register a commit and its parents
    pub fn with_parents(mut self, commit: &str, parents: &[&str]) -> Self {
        self.commits.insert(commit.to_string());
        self.parents.insert(
            commit.to_string(),
            parents.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn verify_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::VerifyCommit(rev) => Some(rev.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| matches(c)).count()
    }

    /// Calls rendered one per line, for snapshots
    pub fn transcript(&self) -> String {
        self.calls
            .borrow()
            .iter()
            .map(|call| match call {
                Call::Toplevel => "toplevel".to_string(),
                Call::IsWorkTree => "is-work-tree".to_string(),
                Call::VerifyCommit(rev) => format!("verify-commit {}", rev),
                Call::QueryParents(commit) => format!("query-parents {}", commit),
                Call::DiffCachedQuiet(None) => "diff-cached-quiet".to_string(),
                Call::DiffCachedQuiet(Some(path)) => {
                    format!("diff-cached-quiet {}", path.display())
                }
                Call::DiffUnstagedQuiet => "diff-unstaged-quiet".to_string(),
                Call::IsAncestor {
                    ancestor,
                    descendant,
                } => format!("is-ancestor {} {}", ancestor, descendant),
                Call::CommitFixup {
                    target,
                    noninteractive,
                } => format!("commit-fixup {} noninteractive={}", target, noninteractive),
                Call::RebaseAutosquash {
                    base,
                    noninteractive,
                } => format!("rebase-autosquash {} noninteractive={}", base, noninteractive),
                Call::DiffWorktree {
                    path,
                    ignore_whitespace,
                } => format!("diff-worktree {} ignore_whitespace={}", path.display(), ignore_whitespace),
                Call::ApplyCheck => "apply-check".to_string(),
                Call::RevertFile(path) => format!("revert-file {}", path.display()),
                Call::ApplyPatch { staged } => format!("apply-patch staged={}", staged),
                Call::LogSearch { pattern, range } => format!("log-search {} {}", pattern, range),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn remember_patch(&self, patch: &Path) {
        assert!(patch.exists(), "patch file should exist while git reads it");
        self.patch_paths.borrow_mut().push(patch.to_path_buf());
    }
}

impl GitBackend for FakeBackend {
    fn toplevel(&self, _dir: &Path) -> Result<PathBuf, GitError> {
        self.record(Call::Toplevel);
        if self.work_tree {
            Ok(self.root.clone())
        } else {
            Err(GitError::NotARepository)
        }
    }

    fn is_work_tree(&self, _dir: &Path) -> Result<bool, GitError> {
        self.record(Call::IsWorkTree);
        Ok(self.work_tree)
    }

    fn verify_commit(&self, _root: &Path, rev: &str) -> Result<CommandOutput, GitError> {
        self.record(Call::VerifyCommit(rev.to_string()));
        Ok(status(if self.commits.contains(rev) { 0 } else { 1 }))
    }

    fn query_parents(&self, _root: &Path, commit: &str) -> Result<CommandOutput, GitError> {
        self.record(Call::QueryParents(commit.to_string()));
        match self.parents.get(commit) {
            Some(parents) => Ok(stdout(&format!("{}\n", parents.join(" ")))),
            None => Ok(status(128)),
        }
    }

    fn diff_cached_quiet(
        &self,
        _root: &Path,
        path: Option<&Path>,
    ) -> Result<CommandOutput, GitError> {
        self.record(Call::DiffCachedQuiet(path.map(Path::to_path_buf)));
        Ok(status(if path.is_some() {
            self.path_cached_status
        } else {
            self.cached_status
        }))
    }

    fn diff_unstaged_quiet(&self, _root: &Path) -> Result<CommandOutput, GitError> {
        self.record(Call::DiffUnstagedQuiet);
        Ok(status(self.unstaged_status))
    }

    fn is_ancestor(
        &self,
        _root: &Path,
        ancestor: &str,
        descendant: &str,
    ) -> Result<CommandOutput, GitError> {
        self.record(Call::IsAncestor {
            ancestor: ancestor.to_string(),
            descendant: descendant.to_string(),
        });
        Ok(status(self.ancestor_status))
    }

    fn commit_fixup(
        &self,
        _root: &Path,
        target: &str,
        options: RunOptions,
    ) -> Result<CommandOutput, GitError> {
        self.record(Call::CommitFixup {
            target: target.to_string(),
            noninteractive: options.noninteractive,
        });
        Ok(status(self.commit_status))
    }

    fn rebase_autosquash(
        &self,
        _root: &Path,
        base: &RebaseBase,
        options: RunOptions,
    ) -> Result<CommandOutput, GitError> {
        self.record(Call::RebaseAutosquash {
            base: base.clone(),
            noninteractive: options.noninteractive,
        });
        Ok(status(self.rebase_status))
    }

    fn diff_worktree(
        &self,
        _root: &Path,
        path: &Path,
        ignore_whitespace: bool,
    ) -> Result<CommandOutput, GitError> {
        self.record(Call::DiffWorktree {
            path: path.to_path_buf(),
            ignore_whitespace,
        });
        Ok(stdout(&self.worktree_diff))
    }

    fn apply_check(&self, _root: &Path, patch: &Path) -> Result<CommandOutput, GitError> {
        self.record(Call::ApplyCheck);
        self.remember_patch(patch);
        Ok(status(self.apply_check_status))
    }

    fn revert_file(&self, root: &Path, path: &Path) -> Result<CommandOutput, GitError> {
        self.record(Call::RevertFile(path.to_path_buf()));
        if self.revert_status == 0 {
            std::fs::write(root.join(path), &self.committed_content)?;
        }
        Ok(status(self.revert_status))
    }

    fn apply_patch(
        &self,
        root: &Path,
        patch: &Path,
        staged: bool,
    ) -> Result<CommandOutput, GitError> {
        self.record(Call::ApplyPatch { staged });
        self.remember_patch(patch);
        if staged {
            return Ok(status(self.stage_status));
        }
        let target = root.join(self.patch_target());
        if self.apply_status == 0 {
            std::fs::write(target, &self.patched_content)?;
        } else if self.apply_leaves_garbage {
            std::fs::write(target, "<<<half applied>>>")?;
        }
        Ok(status(self.apply_status))
    }

    fn log_search(
        &self,
        _root: &Path,
        pattern: &str,
        range: &str,
    ) -> Result<CommandOutput, GitError> {
        self.record(Call::LogSearch {
            pattern: pattern.to_string(),
            range: range.to_string(),
        });
        if self.log_search_status == 0 {
            Ok(stdout(&self.log_search_output))
        } else {
            Ok(status(self.log_search_status))
        }
    }
}

impl FakeBackend {
    /// The file named by the most recent `revert_file` call
    fn patch_target(&self) -> PathBuf {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find_map(|call| match call {
                Call::RevertFile(path) => Some(path.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// Confirm that answers from a script and records the questions
pub struct ScriptedConfirm {
    answer: bool,
    pub questions: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            questions: RefCell::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> usize {
        self.questions.borrow().len()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        self.questions.borrow_mut().push(question.to_string());
        Ok(self.answer)
    }
}

/// Fixed-answer rewrite policy
pub struct FixedPolicy(pub RewritePermission);

impl RewritePolicy for FixedPolicy {
    fn check(&self, _root: &Path, _commit: &str) -> RewritePermission {
        self.0.clone()
    }
}

/// History view that counts refreshes
#[derive(Default)]
pub struct CountingView {
    pub refreshes: Cell<usize>,
}

impl HistoryView for CountingView {
    fn refresh(&mut self, _root: &Path) -> io::Result<()> {
        self.refreshes.set(self.refreshes.get() + 1);
        Ok(())
    }
}
