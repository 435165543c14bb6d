//! Core domain logic for anka pages.
//! This crate is the single source of truth for message ordering and reply
//! matching; UI layers only render what it produces.

pub mod config;
pub mod feed;
pub mod groupon;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod parse;
pub mod session;
pub mod store;
pub mod view;

pub use config::{ConfigError, SessionConfig};
pub use feed::client::{channel_for_page, FeedClient, FeedError, FeedResult};
pub use feed::frame::FeedFrame;
pub use feed::local::{LocalBroker, LocalFeedClient};
pub use groupon::draft::{GrouponDraft, GrouponError, GrouponStep, SelectedMeal};
pub use logging::{default_log_level, init_logging, logging_status};
pub use matcher::anka_matcher::{
    latest_host_reference, reference_element_types, AnkaMatcher, HostReference, MatchReport,
};
pub use matcher::rule::{parse_match_rule, MatchRule, MatchRuleKind, TypeCoverage, TypeOverlap};
pub use model::element::{parse_element_type, AnkaElement, AnkaElementType, ElementTypeError};
pub use model::message::{ContentSegment, Message, MessageData, MessageId, PageId, UserId};
pub use parse::content::{parse_content, parse_message_data, ParsedContent};
pub use session::anka_session::{AnkaSession, SessionError, SessionResult};
pub use store::message_store::MessageStore;
pub use view::page::{FeedStatus, HeaderView, MessageRow, PageView};
pub use view::scroll::ScrollAnchor;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
