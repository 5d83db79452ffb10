//! Revision specification model

use std::fmt;

/// Separator between the two sides of a revision range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSeparator {
    /// `A..B`: commits reachable from B but not A
    TwoDot,
    /// `A...B`: symmetric difference
    ThreeDot,
}

impl RangeSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeSeparator::TwoDot => "..",
            RangeSeparator::ThreeDot => "...",
        }
    }
}

/// A validated, trimmed revision string
///
/// Constructed only by the revision validator, so every value has passed
/// the option-injection and whitespace checks and each endpoint has been
/// verified to name a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionSpec {
    /// A single commit-ish (hash, tag, branch, relative ref)
    Single(String),
    /// A two-sided range
    Range {
        left: String,
        separator: RangeSeparator,
        right: String,
    },
}

impl RevisionSpec {
    pub fn is_range(&self) -> bool {
        matches!(self, RevisionSpec::Range { .. })
    }

    /// The commit-ish strings that were verified, left to right
    pub fn endpoints(&self) -> Vec<&str> {
        match self {
            RevisionSpec::Single(rev) => vec![rev.as_str()],
            RevisionSpec::Range { left, right, .. } => vec![left.as_str(), right.as_str()],
        }
    }
}

impl fmt::Display for RevisionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevisionSpec::Single(rev) => f.write_str(rev),
            RevisionSpec::Range {
                left,
                separator,
                right,
            } => write!(f, "{}{}{}", left, separator.as_str(), right),
        }
    }
}
