//! Data models for gitfixup
//!
//! This module contains workflow-independent data structures representing
//! git concepts like revisions, parents, and pending patches.

mod log;
mod notification;
mod parents;
mod patch;
mod revision;
mod rewrite;

pub use log::LogEntry;
pub use notification::{Notification, NotificationKind};
pub use parents::{CommitKind, ParentSet, RebaseBase};
pub use patch::PendingPatch;
pub use revision::{RangeSeparator, RevisionSpec};
pub use rewrite::RewritePermission;
