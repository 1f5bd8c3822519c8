//! Log domain types

use serde::{Deserialize, Serialize};

/// One full set of log lines fetched for a machine instance
///
/// Lines are opaque and kept in the order the scheduler returned them.
/// A newer snapshot replaces an older one entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSnapshot {
    pub lines: Vec<String>,
    pub fetched_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl LogSnapshot {
    /// Creates a snapshot fetched now
    pub fn now(lines: Vec<String>) -> Self {
        Self {
            lines,
            fetched_at: Some(chrono::Utc::now()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines of `self` not already shown by `previous`
    ///
    /// When `previous` is a prefix of this snapshot only the tail is new.
    /// Otherwise the log was rotated or truncated and every line counts as new.
    pub fn unseen_since<'a>(&'a self, previous: &LogSnapshot) -> &'a [String] {
        if self.lines.starts_with(&previous.lines) {
            &self.lines[previous.lines.len()..]
        } else {
            &self.lines
        }
    }
}
