//! Narrow git interface consumed by the workflows
//!
//! Each method issues exactly one git command against an explicit
//! working-tree root. Only a failure to run git at all is an `Err`;
//! non-zero exit statuses come back in [`CommandOutput`] for the caller
//! to interpret.

use std::path::{Path, PathBuf};

use super::GitError;
use super::constants::{commands, flags, special};
use super::executor::{CommandOutput, GitExecutor, RunOptions};
use crate::model::RebaseBase;

/// Operations the fixup and whitespace workflows need from git
pub trait GitBackend {
    /// Root of the working tree containing `dir`
    fn toplevel(&self, dir: &Path) -> Result<PathBuf, GitError>;

    /// Whether `dir` lies inside a git working tree
    fn is_work_tree(&self, dir: &Path) -> Result<bool, GitError>;

    /// `rev-parse --verify` that `rev` names a commit object
    fn verify_commit(&self, root: &Path, rev: &str) -> Result<CommandOutput, GitError>;

    /// Parent hash line of `commit`
    fn query_parents(&self, root: &Path, commit: &str) -> Result<CommandOutput, GitError>;

    /// Quiet index-vs-HEAD diff: status 0 clean, 1 dirty
    fn diff_cached_quiet(
        &self,
        root: &Path,
        path: Option<&Path>,
    ) -> Result<CommandOutput, GitError>;

    /// Quiet working-tree-vs-index diff: status 0 clean, 1 dirty
    fn diff_unstaged_quiet(&self, root: &Path) -> Result<CommandOutput, GitError>;

    /// `merge-base --is-ancestor`: status 0 yes, 1 no
    fn is_ancestor(
        &self,
        root: &Path,
        ancestor: &str,
        descendant: &str,
    ) -> Result<CommandOutput, GitError>;

    /// Commit the staged content as a fixup of `target`
    fn commit_fixup(
        &self,
        root: &Path,
        target: &str,
        options: RunOptions,
    ) -> Result<CommandOutput, GitError>;

    /// Interactive rebase with autosquash from `base`
    fn rebase_autosquash(
        &self,
        root: &Path,
        base: &RebaseBase,
        options: RunOptions,
    ) -> Result<CommandOutput, GitError>;

    /// Working file vs HEAD diff for one path
    ///
    /// Whitespace-insensitive diffs are produced without context lines and
    /// must be applied with `--unidiff-zero`.
    fn diff_worktree(
        &self,
        root: &Path,
        path: &Path,
        ignore_whitespace: bool,
    ) -> Result<CommandOutput, GitError>;

    /// Dry-run a patch against the index
    fn apply_check(&self, root: &Path, patch: &Path) -> Result<CommandOutput, GitError>;

    /// Discard working-file changes back to the index
    fn revert_file(&self, root: &Path, path: &Path) -> Result<CommandOutput, GitError>;

    /// Apply a patch to the working tree, or to the index when `staged`
    fn apply_patch(
        &self,
        root: &Path,
        patch: &Path,
        staged: bool,
    ) -> Result<CommandOutput, GitError>;

    /// One-line log of commits in `range` whose message matches `pattern`
    fn log_search(
        &self,
        root: &Path,
        pattern: &str,
        range: &str,
    ) -> Result<CommandOutput, GitError>;
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl GitBackend for GitExecutor {
    fn toplevel(&self, dir: &Path) -> Result<PathBuf, GitError> {
        let output = self
            .run(dir, &[commands::REV_PARSE, flags::SHOW_TOPLEVEL])?
            .into_result()?;
        let root = output.trim();
        if root.is_empty() {
            return Err(GitError::NotARepository);
        }
        Ok(PathBuf::from(root))
    }

    fn is_work_tree(&self, dir: &Path) -> Result<bool, GitError> {
        let output = self.run(dir, &[commands::REV_PARSE, flags::IS_INSIDE_WORK_TREE])?;
        Ok(output.success() && output.stdout.trim() == "true")
    }

    fn verify_commit(&self, root: &Path, rev: &str) -> Result<CommandOutput, GitError> {
        let peeled = format!("{}{}", rev, special::PEEL_COMMIT);
        self.run(
            root,
            &[commands::REV_PARSE, flags::VERIFY, flags::QUIET, &peeled],
        )
    }

    fn query_parents(&self, root: &Path, commit: &str) -> Result<CommandOutput, GitError> {
        self.run(
            root,
            &[
                commands::LOG,
                flags::MAX_ONE,
                flags::PARENTS_FORMAT,
                commit,
                flags::END_OF_REVS,
            ],
        )
    }

    fn diff_cached_quiet(
        &self,
        root: &Path,
        path: Option<&Path>,
    ) -> Result<CommandOutput, GitError> {
        let path = path.map(path_arg);
        let mut args = vec![commands::DIFF, flags::CACHED, flags::QUIET];
        if let Some(ref path) = path {
            args.push(flags::END_OF_REVS);
            args.push(path);
        }
        self.run(root, &args)
    }

    fn diff_unstaged_quiet(&self, root: &Path) -> Result<CommandOutput, GitError> {
        self.run(root, &[commands::DIFF, flags::QUIET])
    }

    fn is_ancestor(
        &self,
        root: &Path,
        ancestor: &str,
        descendant: &str,
    ) -> Result<CommandOutput, GitError> {
        self.run(
            root,
            &[commands::MERGE_BASE, flags::IS_ANCESTOR, ancestor, descendant],
        )
    }

    fn commit_fixup(
        &self,
        root: &Path,
        target: &str,
        options: RunOptions,
    ) -> Result<CommandOutput, GitError> {
        let fixup = format!("{}{}", special::FIXUP_PREFIX, target);
        self.run_with(root, &[commands::COMMIT, &fixup], options)
    }

    fn rebase_autosquash(
        &self,
        root: &Path,
        base: &RebaseBase,
        options: RunOptions,
    ) -> Result<CommandOutput, GitError> {
        let mut args = vec![commands::REBASE, flags::INTERACTIVE, flags::AUTOSQUASH];
        match base {
            RebaseBase::Parent(parent) => args.push(parent),
            RebaseBase::Root => args.push(flags::ROOT),
        }
        self.run_with(root, &args, options)
    }

    fn diff_worktree(
        &self,
        root: &Path,
        path: &Path,
        ignore_whitespace: bool,
    ) -> Result<CommandOutput, GitError> {
        let path = path_arg(path);
        let mut args = vec![
            flags::CONFIG_OVERRIDE,
            special::QUOTE_PATH_OFF,
            commands::DIFF,
            flags::NO_COLOR,
        ];
        if ignore_whitespace {
            args.push(flags::IGNORE_ALL_SPACE);
            args.push(flags::NO_CONTEXT);
        }
        args.push(flags::END_OF_REVS);
        args.push(&path);
        self.run(root, &args)
    }

    fn apply_check(&self, root: &Path, patch: &Path) -> Result<CommandOutput, GitError> {
        let patch = path_arg(patch);
        self.run(
            root,
            &[
                commands::APPLY,
                flags::CHECK,
                flags::CACHED,
                flags::UNIDIFF_ZERO,
                &patch,
            ],
        )
    }

    fn revert_file(&self, root: &Path, path: &Path) -> Result<CommandOutput, GitError> {
        let path = path_arg(path);
        self.run(root, &[commands::CHECKOUT, flags::END_OF_REVS, &path])
    }

    fn apply_patch(
        &self,
        root: &Path,
        patch: &Path,
        staged: bool,
    ) -> Result<CommandOutput, GitError> {
        let patch = path_arg(patch);
        let mut args = vec![commands::APPLY, flags::UNIDIFF_ZERO];
        if staged {
            args.push(flags::CACHED);
        }
        args.push(&patch);
        self.run(root, &args)
    }

    fn log_search(
        &self,
        root: &Path,
        pattern: &str,
        range: &str,
    ) -> Result<CommandOutput, GitError> {
        let grep = format!("{}{}", special::GREP_PREFIX, pattern);
        self.run(
            root,
            &[
                commands::LOG,
                flags::ONELINE,
                flags::NO_COLOR,
                flags::EXTENDED_REGEXP,
                &grep,
                range,
                flags::END_OF_REVS,
            ],
        )
    }
}
