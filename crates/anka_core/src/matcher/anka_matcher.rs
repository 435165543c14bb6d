//! Host reference lookup and per-message match evaluation.
//!
//! # Responsibility
//! - Locate the latest host message carrying anka elements.
//! - Flag every message against that reference through a `MatchRule`.
//!
//! # Invariants
//! - The reference always comes from the most recent qualifying host message.
//! - No reference means no flags.
//! - `matched_ids` has set semantics: one entry per id, first-match order.
//! - Every evaluation starts from scratch; nothing carries over between passes.

use crate::matcher::rule::{MatchRule, MatchRuleKind};
use crate::model::element::{AnkaElement, AnkaElementType};
use crate::model::message::{Message, MessageId};
use log::debug;
use std::collections::{BTreeSet, HashSet};

/// Returns the last message by `host_id` that carries at least one element.
pub fn latest_host_reference<'a>(messages: &'a [Message], host_id: &str) -> Option<&'a Message> {
    messages
        .iter()
        .rev()
        .find(|message| message.is_authored_by(host_id) && message.has_elements())
}

/// Element types of the latest host reference, empty when absent.
pub fn reference_element_types(messages: &[Message], host_id: &str) -> BTreeSet<AnkaElementType> {
    latest_host_reference(messages, host_id)
        .map(Message::element_types)
        .unwrap_or_default()
}

/// Snapshot of the host reference used for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReference {
    pub message_id: MessageId,
    pub index: usize,
    pub elements: Vec<AnkaElement>,
}

/// Output of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub reference: Option<HostReference>,
    /// One flag per message index.
    pub flags: Vec<bool>,
    pub matched_ids: Vec<MessageId>,
}

impl MatchReport {
    pub fn is_flagged(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    pub fn is_id_matched(&self, id: &str) -> bool {
        self.matched_ids.iter().any(|matched| matched == id)
    }

    /// Elements shown in the page header.
    pub fn latest_host_elements(&self) -> &[AnkaElement] {
        self.reference
            .as_ref()
            .map(|reference| reference.elements.as_slice())
            .unwrap_or(&[])
    }
}

/// Evaluates message sequences with one configured rule.
pub struct AnkaMatcher {
    rule: Box<dyn MatchRule>,
}

impl Default for AnkaMatcher {
    fn default() -> Self {
        Self::from_kind(MatchRuleKind::default())
    }
}

impl AnkaMatcher {
    pub fn new(rule: Box<dyn MatchRule>) -> Self {
        Self { rule }
    }

    pub fn from_kind(kind: MatchRuleKind) -> Self {
        Self::new(kind.build())
    }

    pub fn rule_name(&self) -> &'static str {
        self.rule.name()
    }

    /// Flags every message, host messages included, against the latest reference.
    pub fn evaluate(&self, messages: &[Message], host_id: &str) -> MatchReport {
        let reference_index = messages
            .iter()
            .rposition(|message| message.is_authored_by(host_id) && message.has_elements());

        let Some(reference_index) = reference_index else {
            debug!(
                "event=match_recompute module=matcher status=ok rule={} messages={} reference=none",
                self.rule.name(),
                messages.len()
            );
            return MatchReport {
                reference: None,
                flags: vec![false; messages.len()],
                matched_ids: Vec::new(),
            };
        };

        let reference_message = &messages[reference_index];
        let reference_types = reference_message.element_types();

        let mut flags = Vec::with_capacity(messages.len());
        let mut matched_ids = Vec::new();
        let mut seen = HashSet::new();
        for message in messages {
            let matched = self.rule.is_match(&reference_types, message);
            if matched && seen.insert(message.id.as_str()) {
                matched_ids.push(message.id.clone());
            }
            flags.push(matched);
        }

        debug!(
            "event=match_recompute module=matcher status=ok rule={} messages={} reference={} matched={}",
            self.rule.name(),
            messages.len(),
            reference_message.id,
            matched_ids.len()
        );

        MatchReport {
            reference: Some(HostReference {
                message_id: reference_message.id.clone(),
                index: reference_index,
                elements: reference_message.anka_elements.clone(),
            }),
            flags,
            matched_ids,
        }
    }
}
