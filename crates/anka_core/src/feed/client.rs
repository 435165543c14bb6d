//! Live feed client contract.
//!
//! # Responsibility
//! - Define the capability set a page session needs from a message broker.
//! - Keep transport details out of session orchestration.
//!
//! # Invariants
//! - `next_message` yields messages in broker delivery order.
//! - `close` is safe to call repeatedly.

use crate::model::message::Message;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type FeedResult<T> = Result<T, FeedError>;

/// Live feed failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// Operation requires `connect` first.
    NotConnected,
    /// Broker dropped the connection; recoverable via reconnect.
    Disconnected,
    /// One frame could not be decoded; later frames are unaffected.
    Decode(String),
    /// Any other broker-side failure.
    Transport(String),
}

impl FeedError {
    /// Whether the connection must be re-established before further use.
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, Self::NotConnected | Self::Disconnected)
    }
}

impl Display for FeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "feed client is not connected"),
            Self::Disconnected => write!(f, "feed connection was lost"),
            Self::Decode(message) => write!(f, "failed to decode feed frame: {message}"),
            Self::Transport(message) => write!(f, "feed transport error: {message}"),
        }
    }
}

impl Error for FeedError {}

impl From<serde_json::Error> for FeedError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// Real-time channel client injected into a page session.
pub trait FeedClient {
    fn connect(&mut self) -> FeedResult<()>;

    /// Subscribes to the channel of one page; replaces any prior subscription.
    fn join_channel(&mut self, channel: &str) -> FeedResult<()>;

    /// Next delivered message, `Ok(None)` when nothing is pending.
    ///
    /// Messages received before a connection loss are still returned;
    /// the loss is reported once they are exhausted.
    fn next_message(&mut self) -> FeedResult<Option<Message>>;

    /// Broadcasts a locally composed message to other channel members.
    fn publish(&mut self, channel: &str, message: &Message) -> FeedResult<()>;

    fn close(&mut self) -> FeedResult<()>;
}

/// Channel name used for one page.
pub fn channel_for_page(page_id: &str) -> String {
    page_id.trim().to_string()
}
