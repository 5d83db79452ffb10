//! Commit log entry model

/// One line of `git log --oneline`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Abbreviated commit id
    pub commit_id: String,
    /// First line of the message
    pub subject: String,
}
