//! Render-ready page state.
//!
//! # Responsibility
//! - Combine store contents and match flags into rows a UI can draw.
//!
//! # Invariants
//! - Host-authored rows are never shown as matched.
//! - Rows are in store order, one per message.

use crate::matcher::anka_matcher::MatchReport;
use crate::model::element::AnkaElement;
use crate::model::message::{ContentSegment, Message, MessageId, UserId};
use crate::view::scroll::ScrollAnchor;
use serde::Serialize;

/// Connection state shown alongside the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    Live,
    Disconnected,
    Closed,
}

impl FeedStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Disconnected => "disconnected",
            Self::Closed => "closed",
        }
    }
}

/// Page header: host id plus the elements replies must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub host_id: UserId,
    pub latest_host_elements: Vec<AnkaElement>,
}

/// One rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRow {
    pub id: MessageId,
    pub user_id: UserId,
    pub segments: Vec<ContentSegment>,
    pub elements: Vec<AnkaElement>,
    pub is_host: bool,
    pub is_matched: bool,
}

/// Whole-page snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub header: HeaderView,
    pub rows: Vec<MessageRow>,
    pub scroll: ScrollAnchor,
    pub feed_status: FeedStatus,
}

impl PageView {
    pub fn build(
        host_id: &str,
        messages: &[Message],
        report: &MatchReport,
        scroll: ScrollAnchor,
        feed_status: FeedStatus,
    ) -> Self {
        let rows = messages
            .iter()
            .enumerate()
            .map(|(index, message)| {
                let is_host = message.is_authored_by(host_id);
                MessageRow {
                    id: message.id.clone(),
                    user_id: message.user_id.clone(),
                    segments: message.content.clone(),
                    elements: message.anka_elements.clone(),
                    is_host,
                    is_matched: !is_host && report.is_flagged(index),
                }
            })
            .collect();

        Self {
            header: HeaderView {
                host_id: host_id.to_string(),
                latest_host_elements: report.latest_host_elements().to_vec(),
            },
            rows,
            scroll,
            feed_status,
        }
    }

    pub fn matched_row_ids(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| row.is_matched)
            .map(|row| row.id.as_str())
            .collect()
    }
}
