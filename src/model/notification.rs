//! Notification model
//!
//! Completion reports surfaced to the invoking environment.

use std::fmt;

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Success - operation completed
    Success,
    /// Info - nothing changed, or informational
    Info,
    /// Warning - completed, but needs the user's attention
    Warning,
}

/// A report to show the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The message to display
    pub message: String,
    /// Kind of notification
    pub kind: NotificationKind,
}

impl Notification {
    /// Create a new notification
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Create a success notification
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    /// Create an info notification
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Info)
    }

    /// Create a warning notification
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Warning)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
