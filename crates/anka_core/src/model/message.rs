//! Chat message model.
//!
//! # Responsibility
//! - Define the parsed message shape consumed by store, matcher and view.
//! - Define the raw `MessageData` shape returned by queries and compose input.
//!
//! # Invariants
//! - A `Message` is immutable once appended to a store.
//! - Every `ContentSegment::Element { index }` points into `anka_elements`.

use crate::model::element::{AnkaElement, AnkaElementType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Message identifier. Kept as a string because seeded and live ids come
/// from external producers.
pub type MessageId = String;
/// Participant identifier.
pub type UserId = String;
/// Page (room) identifier; doubles as the live-feed channel key.
pub type PageId = String;

/// One rendered piece of message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentSegment {
    /// Plain text run.
    Text { text: String },
    /// Reference to `Message::anka_elements[index]`.
    Element { index: usize },
}

/// Parsed chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub user_id: UserId,
    pub content: Vec<ContentSegment>,
    #[serde(default)]
    pub anka_elements: Vec<AnkaElement>,
}

impl Message {
    /// Creates a message with a generated UUIDv4 id.
    pub fn new(
        user_id: impl Into<UserId>,
        content: Vec<ContentSegment>,
        anka_elements: Vec<AnkaElement>,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), user_id, content, anka_elements)
    }

    /// Creates a message with a caller-provided id (seed/live paths).
    pub fn with_id(
        id: impl Into<MessageId>,
        user_id: impl Into<UserId>,
        content: Vec<ContentSegment>,
        anka_elements: Vec<AnkaElement>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            content,
            anka_elements,
        }
    }

    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn has_elements(&self) -> bool {
        !self.anka_elements.is_empty()
    }

    /// Distinct element types carried by this message.
    pub fn element_types(&self) -> BTreeSet<AnkaElementType> {
        self.anka_elements.iter().map(|element| element.kind).collect()
    }

    /// Concatenated text segments, elements rendered as `[[kind]]` or
    /// `[[kind:value]]`, so the result parses back into the same content.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.content {
            match segment {
                ContentSegment::Text { text } => out.push_str(text),
                ContentSegment::Element { index } => match self.anka_elements.get(*index) {
                    Some(element) => {
                        out.push_str("[[");
                        out.push_str(element.kind.as_str());
                        if let Some(value) = &element.value {
                            out.push(':');
                            out.push_str(value);
                        }
                        out.push_str("]]");
                    }
                    None => out.push_str("[[?]]"),
                },
            }
        }
        out
    }
}

/// Raw message shape as queried or composed, before content parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    pub id: MessageId,
    pub user_id: UserId,
    pub content: String,
}
