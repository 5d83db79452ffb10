//! Best-effort history rewrite policy

use std::path::Path;

use super::constants::{commands, flags};
use super::executor::GitExecutor;
use crate::model::RewritePermission;

/// Decides whether a commit may be rewritten
///
/// Implementations never fail: anything that prevents a decision is
/// reported as [`RewritePermission::Unknown`] and the caller proceeds.
pub trait RewritePolicy {
    fn check(&self, root: &Path, commit: &str) -> RewritePermission;
}

/// Refuses to rewrite commits already on a remote-tracking branch
#[derive(Debug, Clone)]
pub struct PublishedHistoryPolicy {
    executor: GitExecutor,
    allow_published: bool,
}

impl PublishedHistoryPolicy {
    pub fn new(executor: GitExecutor, allow_published: bool) -> Self {
        Self {
            executor,
            allow_published,
        }
    }
}

impl RewritePolicy for PublishedHistoryPolicy {
    fn check(&self, root: &Path, commit: &str) -> RewritePermission {
        if self.allow_published {
            return RewritePermission::Allowed;
        }

        let output = match self.executor.run(
            root,
            &[commands::BRANCH, flags::REMOTES, flags::CONTAINS, commit],
        ) {
            Ok(output) if output.success() => output,
            Ok(output) => {
                tracing::debug!(exit_code = output.status, "published-history check unavailable");
                return RewritePermission::Unknown;
            }
            Err(e) => {
                tracing::debug!(error = %e, "published-history check unavailable");
                return RewritePermission::Unknown;
            }
        };

        published_permission(commit, &output.stdout)
    }
}

/// Policy that never has an opinion
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRewritePolicy;

impl RewritePolicy for NoRewritePolicy {
    fn check(&self, _root: &Path, _commit: &str) -> RewritePermission {
        RewritePermission::Unknown
    }
}

/// Interpret `git branch -r --contains` output
fn published_permission(commit: &str, branches: &str) -> RewritePermission {
    let remotes: Vec<&str> = branches
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains(" -> "))
        .collect();

    match remotes.as_slice() {
        [] => RewritePermission::Allowed,
        [first, ..] => RewritePermission::Disallowed(format!(
            "{} is already published on {}{}",
            commit,
            first,
            if remotes.len() > 1 {
                format!(" and {} other remote branch(es)", remotes.len() - 1)
            } else {
                String::new()
            }
        )),
    }
}
