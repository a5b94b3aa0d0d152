//! Bounded most-recent-first histories.

use serde::{Deserialize, Serialize};

/// Default number of entries kept per history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// A fixed-capacity list of recent inputs, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundedHistory {
    capacity: usize,
    entries: Vec<String>,
}

impl BoundedHistory {
    /// Create an empty history holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    /// Record `entry` as the most recent one.
    ///
    /// An existing equal entry is moved to the front instead of duplicated.
    /// Blank input is ignored. Returns whether the history changed.
    pub fn insert_or_promote(&mut self, entry: impl Into<String>) -> bool {
        let entry = entry.into();
        if entry.trim().is_empty() {
            return false;
        }
        if self.entries.first() == Some(&entry) {
            return false;
        }

        if let Some(pos) = self.entries.iter().position(|e| *e == entry) {
            self.entries.remove(pos);
        }
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
        true
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Re-apply the capacity after loading from disk.
    pub(crate) fn normalize(&mut self) {
        self.capacity = self.capacity.max(1);
        self.entries.retain(|e| !e.trim().is_empty());
        self.entries.truncate(self.capacity);
    }
}

impl Default for BoundedHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}
