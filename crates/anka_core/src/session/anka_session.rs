//! Page session orchestration.
//!
//! # Responsibility
//! - Own the message store, matcher and scroll state of one open page.
//! - Pump the injected feed client and append delivered messages.
//! - Keep last known state across feed outages and allow reconnect.
//!
//! # Invariants
//! - Match flags are recomputed from scratch after every store mutation.
//! - Each delivered message is appended exactly once, in receipt order.
//! - The feed subscription is released exactly once (`close` or drop).

use crate::config::{ConfigError, SessionConfig};
use crate::feed::client::{channel_for_page, FeedClient, FeedError};
use crate::matcher::anka_matcher::{AnkaMatcher, MatchReport};
use crate::model::message::{Message, MessageId};
use crate::parse::content::parse_content;
use crate::store::message_store::MessageStore;
use crate::view::page::{FeedStatus, PageView};
use crate::view::scroll::ScrollAnchor;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Session-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Config(ConfigError),
    Feed(FeedError),
    /// Compose input had no text and no elements.
    EmptyContent,
    /// Operation attempted after `close`.
    Closed,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Feed(err) => write!(f, "{err}"),
            Self::EmptyContent => write!(f, "message content must not be empty"),
            Self::Closed => write!(f, "page session is closed"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Feed(err) => Some(err),
            Self::EmptyContent | Self::Closed => None,
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<FeedError> for SessionError {
    fn from(value: FeedError) -> Self {
        Self::Feed(value)
    }
}

/// One open anka page bound to a feed client.
pub struct AnkaSession<F: FeedClient> {
    config: SessionConfig,
    channel: String,
    store: MessageStore,
    matcher: AnkaMatcher,
    report: MatchReport,
    scroll: ScrollAnchor,
    feed: F,
    status: FeedStatus,
}

impl<F: FeedClient> AnkaSession<F> {
    /// Opens a page: validates config, seeds the store and joins the page channel.
    ///
    /// Feed failures do not fail the open; the session starts `Disconnected`
    /// and can `reconnect` later.
    pub fn start(config: SessionConfig, feed: F, seed: Vec<Message>) -> SessionResult<Self> {
        let config = config.validate()?;
        let matcher = AnkaMatcher::from_kind(config.match_rule);
        let mut session = Self {
            channel: channel_for_page(&config.page_id),
            store: MessageStore::initialize(seed),
            matcher,
            report: MatchReport::default(),
            scroll: ScrollAnchor::new(),
            feed,
            status: FeedStatus::Disconnected,
            config,
        };
        session.recompute();

        info!(
            "event=session_start module=session status=ok page_id={} host_id={} viewer_id={} rule={} seeded={}",
            session.config.page_id,
            session.config.host_id,
            session.config.viewer_id,
            session.matcher.rule_name(),
            session.store.len()
        );

        if let Err(err) = session.subscribe() {
            warn!(
                "event=feed_join module=session status=warn page_id={} error={err}",
                session.config.page_id
            );
        }
        Ok(session)
    }

    /// Drains every pending feed message into the store.
    ///
    /// Returns how many messages were appended. Undecodable frames are
    /// skipped; a lost connection stops the drain and flips the status.
    /// A disconnected session still drains what arrived before the loss.
    pub fn pump(&mut self) -> usize {
        if self.status == FeedStatus::Closed {
            return 0;
        }

        let mut appended = 0;
        loop {
            match self.feed.next_message() {
                Ok(Some(message)) => {
                    self.store.append(message);
                    appended += 1;
                }
                Ok(None) => break,
                Err(FeedError::Decode(reason)) => {
                    warn!(
                        "event=frame_decode_failed module=session status=warn page_id={} reason={reason}",
                        self.config.page_id
                    );
                }
                Err(err)
                    if err.is_connection_lost() && self.status == FeedStatus::Disconnected =>
                {
                    break;
                }
                Err(err) => {
                    self.on_feed_failure(&err);
                    break;
                }
            }
        }

        if appended > 0 {
            self.recompute();
        }
        appended
    }

    /// Appends one message as if delivered by the feed.
    pub fn receive(&mut self, message: Message) -> SessionResult<()> {
        self.ensure_open()?;
        self.store.append(message);
        self.recompute();
        Ok(())
    }

    /// Composes a message as the viewer, appends it locally and publishes it.
    ///
    /// A failed publish keeps the local message and marks the feed
    /// disconnected; the returned id is still valid.
    pub fn send(&mut self, raw_content: &str) -> SessionResult<MessageId> {
        self.ensure_open()?;
        let parsed = parse_content(raw_content.trim());
        if parsed.segments.is_empty() && parsed.elements.is_empty() {
            return Err(SessionError::EmptyContent);
        }

        let message = Message::new(
            self.config.viewer_id.clone(),
            parsed.segments,
            parsed.elements,
        );
        let id = message.id.clone();

        if self.status == FeedStatus::Live {
            if let Err(err) = self.feed.publish(&self.channel, &message) {
                self.on_feed_failure(&err);
            }
        }

        self.store.append(message);
        self.recompute();
        Ok(id)
    }

    /// Re-establishes the feed subscription; the store is left untouched.
    pub fn reconnect(&mut self) -> SessionResult<()> {
        self.ensure_open()?;
        self.subscribe()?;
        info!(
            "event=feed_reconnect module=session status=ok page_id={} messages={}",
            self.config.page_id,
            self.store.len()
        );
        Ok(())
    }

    /// Releases the feed subscription. Further calls are no-ops.
    pub fn close(&mut self) -> SessionResult<()> {
        if self.status == FeedStatus::Closed {
            return Ok(());
        }
        self.status = FeedStatus::Closed;
        let result = self.feed.close();
        info!(
            "event=session_close module=session status={} page_id={} messages={}",
            if result.is_ok() { "ok" } else { "error" },
            self.config.page_id,
            self.store.len()
        );
        result.map_err(SessionError::from)
    }

    pub fn view(&self) -> PageView {
        PageView::build(
            &self.config.host_id,
            self.store.messages(),
            &self.report,
            self.scroll,
            self.status,
        )
    }

    pub fn scroll_to(&mut self, index: usize) {
        self.scroll.scroll_to(index, self.store.len());
    }

    pub fn scroll_to_latest(&mut self) {
        self.scroll.scroll_to_latest(self.store.len());
    }

    pub fn match_report(&self) -> &MatchReport {
        &self.report
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    pub fn is_viewer_host(&self) -> bool {
        self.config.viewer_is_host()
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    fn subscribe(&mut self) -> Result<(), FeedError> {
        let joined = self
            .feed
            .connect()
            .and_then(|()| self.feed.join_channel(&self.channel));
        match joined {
            Ok(()) => {
                self.status = FeedStatus::Live;
                Ok(())
            }
            Err(err) => {
                self.status = FeedStatus::Disconnected;
                Err(err)
            }
        }
    }

    fn on_feed_failure(&mut self, err: &FeedError) {
        if err.is_connection_lost() {
            self.status = FeedStatus::Disconnected;
            warn!(
                "event=feed_disconnected module=session status=warn page_id={} messages={}",
                self.config.page_id,
                self.store.len()
            );
        } else {
            warn!(
                "event=feed_error module=session status=warn page_id={} error={err}",
                self.config.page_id
            );
        }
    }

    fn recompute(&mut self) {
        self.report = self
            .matcher
            .evaluate(self.store.messages(), &self.config.host_id);
        self.scroll.on_rows_changed(self.store.len());
    }

    fn ensure_open(&self) -> SessionResult<()> {
        if self.status == FeedStatus::Closed {
            return Err(SessionError::Closed);
        }
        Ok(())
    }
}

impl<F: FeedClient> Drop for AnkaSession<F> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("event=session_close module=session status=error error={err}");
        }
    }
}
