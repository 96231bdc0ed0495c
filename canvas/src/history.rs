//! Linear undo/redo timeline of full-document snapshots.
//!
//! The timeline is a list of entries plus a cursor pointing at the entry that
//! matches the live document. Pushing after an undo discards everything past
//! the cursor: there is no branching history. The oldest entries are evicted
//! once the configured limit is exceeded.
//!
//! While a snapshot is being replayed the manager is marked as replaying and
//! refuses new pushes, so restoring a snapshot never registers as an edit.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use serde::Serialize;

use crate::consts::MAX_HISTORY;
use crate::doc::{Element, now_ms};

/// One immutable snapshot of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Independent deep copy of the ordered element list.
    pub elements: Vec<Element>,
    /// What the edit was, e.g. `"Delete 2 elements"`.
    pub description: String,
    /// Milliseconds since the Unix epoch when the entry was recorded.
    pub timestamp: i64,
}

/// Description and time of an entry, without its snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    pub description: String,
    pub timestamp: i64,
    /// Whether this is the entry matching the live document.
    pub current: bool,
}

/// Bounded linear history with a replay guard.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    limit: usize,
    replaying: bool,
}

impl History {
    /// Create a timeline holding a single initial entry for `elements`.
    #[must_use]
    pub fn new(elements: &[Element], limit: usize) -> Self {
        Self {
            entries: vec![HistoryEntry { elements: elements.to_vec(), description: "Initial".to_owned(), timestamp: now_ms() }],
            cursor: 0,
            limit: limit.max(1),
            replaying: false,
        }
    }

    /// Record a snapshot of `elements` after the cursor.
    ///
    /// Returns `false` without recording while a replay is in progress.
    pub fn push(&mut self, elements: &[Element], description: &str) -> bool {
        if self.replaying {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            elements: elements.to_vec(),
            description: description.to_owned(),
            timestamp: now_ms(),
        });
        self.cursor = self.entries.len() - 1;
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
            self.cursor -= excess;
        }
        true
    }

    /// Step back one entry and return its snapshot, or `None` at the start.
    ///
    /// The returned elements are a fresh copy; the caller restores them and
    /// then calls [`History::end_replay`].
    pub fn undo(&mut self) -> Option<Vec<Element>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.replaying = true;
        Some(self.entries[self.cursor].elements.clone())
    }

    /// Step forward one entry and return its snapshot, or `None` at the end.
    pub fn redo(&mut self) -> Option<Vec<Element>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.replaying = true;
        Some(self.entries[self.cursor].elements.clone())
    }

    /// Clear the replay guard after a restored snapshot has been applied.
    pub fn end_replay(&mut self) {
        self.replaying = false;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Drop every entry and start over from `elements`.
    pub fn reset(&mut self, elements: &[Element]) {
        *self = Self::new(elements, self.limit);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the timeline keeps at least its initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Descriptions and timestamps for a history panel, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<EntryInfo> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| EntryInfo { description: e.description.clone(), timestamp: e.timestamp, current: i == self.cursor })
            .collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(&[], MAX_HISTORY)
    }
}
