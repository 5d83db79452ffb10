//! History rewrite permission model

/// Outcome of a best-effort rewrite policy check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewritePermission {
    /// Rewriting the commit is fine
    Allowed,
    /// Policy forbids rewriting; carries the reason shown to the user
    Disallowed(String),
    /// The check could not be performed; callers proceed
    Unknown,
}
