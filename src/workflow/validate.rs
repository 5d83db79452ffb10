//! Revision string validation
//!
//! Revisions come straight from the user and end up as git arguments, so
//! anything that could be read as an option or split into several
//! arguments is rejected before git ever sees it.

use std::path::{Path, PathBuf};

use super::WorkflowError;
use crate::git::GitBackend;
use crate::model::{RangeSeparator, RevisionSpec};

/// Parses and safety-checks user-supplied revisions
pub struct RevisionValidator<'a, B: GitBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: GitBackend + ?Sized> RevisionValidator<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Validate `raw` against the working tree at `workdir`
    ///
    /// Syntax is checked first, so rejected input never reaches git.
    pub fn validate(&self, raw: &str, workdir: &Path) -> Result<RevisionSpec, WorkflowError> {
        let spec = parse_syntax(raw)?;
        require_work_tree(self.backend, workdir)?;

        for endpoint in spec.endpoints() {
            self.verify(endpoint, workdir)?;
        }

        tracing::debug!(revision = %spec, "revision validated");
        Ok(spec)
    }

    fn verify(&self, rev: &str, workdir: &Path) -> Result<(), WorkflowError> {
        let output = self.backend.verify_commit(workdir, rev)?;
        if output.success() {
            Ok(())
        } else {
            Err(WorkflowError::UnresolvableRevision(rev.to_string()))
        }
    }
}

/// Require `dir` to be inside a git working tree
pub fn require_work_tree<B: GitBackend + ?Sized>(
    backend: &B,
    dir: &Path,
) -> Result<(), WorkflowError> {
    if !dir.is_dir() || !backend.is_work_tree(dir)? {
        return Err(WorkflowError::NotAWorkingTree(dir.to_path_buf()));
    }
    Ok(())
}

/// Require a working tree at `dir` and return its root
pub fn resolve_root<B: GitBackend + ?Sized>(
    backend: &B,
    dir: &Path,
) -> Result<PathBuf, WorkflowError> {
    require_work_tree(backend, dir)?;
    Ok(backend.toplevel(dir)?)
}

/// Syntactic checks only; no git calls
fn parse_syntax(raw: &str) -> Result<RevisionSpec, WorkflowError> {
    let rev = raw.trim();
    if rev.is_empty() {
        return Err(WorkflowError::EmptyRevision);
    }
    if rev.starts_with('-') {
        return Err(WorkflowError::UnsafeRevision {
            revision: rev.to_string(),
            reason: "starts with '-'".to_string(),
        });
    }
    if let Some(c) = rev.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(WorkflowError::UnsafeRevision {
            revision: rev.to_string(),
            reason: format!("contains {:?}", c),
        });
    }

    let Some(at) = rev.find("..") else {
        return Ok(RevisionSpec::Single(rev.to_string()));
    };

    let (separator, width) = if rev[at + 2..].starts_with('.') {
        (RangeSeparator::ThreeDot, 3)
    } else {
        (RangeSeparator::TwoDot, 2)
    };
    let left = &rev[..at];
    let right = &rev[at + width..];
    if left.is_empty() || right.is_empty() {
        return Err(WorkflowError::IncompleteRange(rev.to_string()));
    }

    Ok(RevisionSpec::Range {
        left: left.to_string(),
        separator,
        right: right.to_string(),
    })
}
