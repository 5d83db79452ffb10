//! Commit parent model

use std::fmt;

/// Shape of a commit by parent count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    /// No parents
    Root,
    /// Exactly one parent
    Normal,
    /// Two or more parents
    Merge,
}

/// Ordered parent ids of one commit, queried fresh per invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParentSet {
    parents: Vec<String>,
}

impl ParentSet {
    pub fn new(parents: Vec<String>) -> Self {
        Self { parents }
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn kind(&self) -> CommitKind {
        match self.parents.len() {
            0 => CommitKind::Root,
            1 => CommitKind::Normal,
            _ => CommitKind::Merge,
        }
    }

    /// Derive the rebase base; `None` for merge commits
    pub fn rebase_base(&self) -> Option<RebaseBase> {
        match self.parents.as_slice() {
            [] => Some(RebaseBase::Root),
            [parent] => Some(RebaseBase::Parent(parent.clone())),
            _ => None,
        }
    }
}

/// Where an autosquash rebase starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebaseBase {
    /// Rebase onto this parent commit
    Parent(String),
    /// Rewrite from the first commit (`--root`)
    Root,
}

impl RebaseBase {
    /// Revision range covering the commits a rebase from this base rewrites
    pub fn range_to(&self, tip: &str) -> String {
        match self {
            RebaseBase::Parent(parent) => format!("{}..{}", parent, tip),
            RebaseBase::Root => tip.to_string(),
        }
    }
}

impl fmt::Display for RebaseBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RebaseBase::Parent(parent) => f.write_str(parent),
            RebaseBase::Root => f.write_str("<root>"),
        }
    }
}
