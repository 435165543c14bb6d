//! Wire envelope for live feed traffic.
//!
//! Frames travel as JSON `{ "event": ..., "data": ... }`:
//! - `join`: client asks to subscribe to a page channel (`data` = page id).
//! - `get_chat`: broker delivers one new message (`data` = message).

use crate::feed::client::FeedResult;
use crate::model::message::{Message, PageId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum FeedFrame {
    #[serde(rename = "join")]
    Join(PageId),
    #[serde(rename = "get_chat")]
    GetChat(Message),
}

impl FeedFrame {
    pub fn encode(&self) -> FeedResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> FeedResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
