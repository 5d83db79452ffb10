//! Commit parent queries

use std::path::Path;

use super::WorkflowError;
use crate::git::GitBackend;
use crate::git::parser::Parser;
use crate::model::ParentSet;

/// Resolves a commit's parents through git
pub struct CommitGraphQuery<'a, B: GitBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: GitBackend + ?Sized> CommitGraphQuery<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Parents of `commit`; never cached
    pub fn parents(&self, root: &Path, commit: &str) -> Result<ParentSet, WorkflowError> {
        let output = self.backend.query_parents(root, commit)?;
        if !output.success() {
            return Err(WorkflowError::QueryFailed {
                commit: commit.to_string(),
                message: output.message().to_string(),
            });
        }
        Ok(Parser::parse_parents(&output.stdout))
    }
}
