//! Scroll anchor for the message list.

use serde::Serialize;

/// Tracks which row the list is anchored to and whether it follows new rows.
///
/// # Invariants
/// - `anchor` is `None` only while the list is empty.
/// - `anchor` never points past the last row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollAnchor {
    anchor: Option<usize>,
    follow_latest: bool,
}

impl Default for ScrollAnchor {
    fn default() -> Self {
        Self {
            anchor: None,
            follow_latest: true,
        }
    }
}

impl ScrollAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn follows_latest(&self) -> bool {
        self.follow_latest
    }

    /// Re-anchors after the row count changed.
    pub fn on_rows_changed(&mut self, row_count: usize) {
        if row_count == 0 {
            self.anchor = None;
            return;
        }
        let last = row_count - 1;
        self.anchor = match self.anchor {
            _ if self.follow_latest => Some(last),
            Some(index) => Some(index.min(last)),
            None => Some(last),
        };
    }

    /// Anchors to one row; following resumes only when that row is the last.
    pub fn scroll_to(&mut self, index: usize, row_count: usize) {
        if row_count == 0 {
            self.anchor = None;
            self.follow_latest = true;
            return;
        }
        let last = row_count - 1;
        let clamped = index.min(last);
        self.anchor = Some(clamped);
        self.follow_latest = clamped == last;
    }

    /// The "scroll to latest" affordance.
    pub fn scroll_to_latest(&mut self, row_count: usize) {
        self.follow_latest = true;
        self.on_rows_changed(row_count);
    }
}
