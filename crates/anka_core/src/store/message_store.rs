//! Append-only message store for one page session.
//!
//! # Responsibility
//! - Hold the ordered message sequence of one page.
//! - Surface data-quality problems (duplicate ids) without rejecting data.
//!
//! # Invariants
//! - Order is arrival order; entries are never removed or reordered.
//! - Previously appended entries are never handed out mutably.
//! - Duplicate ids are kept and counted, never deduplicated.

use crate::model::message::{Message, MessageId};
use log::{debug, warn};
use std::collections::HashSet;

/// Ordered, append-only message sequence.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    seen_ids: HashSet<MessageId>,
    duplicate_ids: usize,
    revision: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from an initial (queried) sequence, keeping its order.
    pub fn initialize(seed: Vec<Message>) -> Self {
        let mut store = Self::new();
        for message in seed {
            store.push(message);
        }
        store
    }

    /// Appends one message at the end and returns the new sequence.
    pub fn append(&mut self, message: Message) -> &[Message] {
        self.push(message);
        &self.messages
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of appended messages whose id was already present.
    pub fn duplicate_id_count(&self) -> usize {
        self.duplicate_ids
    }

    /// Monotonic counter bumped on every append.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn push(&mut self, message: Message) {
        if message.id.trim().is_empty() {
            warn!(
                "event=missing_message_id module=store status=warn index={}",
                self.messages.len()
            );
        } else if !self.seen_ids.insert(message.id.clone()) {
            self.duplicate_ids += 1;
            warn!(
                "event=duplicate_message_id module=store status=warn id={} index={}",
                message.id,
                self.messages.len()
            );
        }

        debug!(
            "event=message_append module=store status=ok id={} user_id={} elements={}",
            message.id,
            message.user_id,
            message.anka_elements.len()
        );
        self.messages.push(message);
        self.revision += 1;
    }
}
