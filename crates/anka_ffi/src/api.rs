//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose page-session use-cases to Dart via FRB.
//! - Own the process-wide page registry and in-process broker.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported through `ok=false` envelopes, never thrown.
//! - One open session per `page_id:viewer_id` key.

use anka_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    parse_message_data, ping as ping_inner, AnkaSession, LocalBroker, LocalFeedClient,
    MessageData, SessionConfig,
};
use log::warn;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

type PageRegistry = HashMap<String, AnkaSession<LocalFeedClient>>;

static BROKER: Lazy<LocalBroker> = Lazy::new(LocalBroker::new);
static PAGES: Lazy<Mutex<PageRegistry>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for page operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageActionResponse {
    pub ok: bool,
    /// Registry key of the affected page session, when known.
    pub page_key: Option<String>,
    /// Id of the created message, for send.
    pub message_id: Option<String>,
    pub message: String,
}

impl PageActionResponse {
    fn success(message: impl Into<String>, page_key: Option<String>) -> Self {
        Self {
            ok: true,
            page_key,
            message_id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            page_key: None,
            message_id: None,
            message: message.into(),
        }
    }
}

/// Page snapshot envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageViewResponse {
    pub ok: bool,
    /// JSON-encoded page view (header, rows, scroll, feed status).
    pub view_json: String,
    /// Ids of rows rendered as matched, in row order.
    pub matched_ids: Vec<String>,
    /// `live|disconnected|closed`.
    pub feed_status: String,
    pub message: String,
}

impl PageViewResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            view_json: String::new(),
            matched_ids: Vec::new(),
            feed_status: String::new(),
            message: message.into(),
        }
    }
}

/// Opens a page session and joins its live channel.
///
/// `seed_json` is a JSON array of `{ id, userId, content }`; blank means no seed.
/// Reopening an already-open key replaces the previous session.
#[flutter_rust_bridge::frb(sync)]
pub fn page_open(
    page_id: String,
    host_id: String,
    viewer_id: String,
    seed_json: String,
) -> PageActionResponse {
    let seed = if seed_json.trim().is_empty() {
        Vec::new()
    } else {
        match serde_json::from_str::<Vec<MessageData>>(&seed_json) {
            Ok(data) => data.into_iter().map(parse_message_data).collect(),
            Err(err) => {
                return PageActionResponse::failure(format!("page_open invalid seed: {err}"))
            }
        }
    };

    let feed = match BROKER.client() {
        Ok(feed) => feed,
        Err(err) => return PageActionResponse::failure(format!("page_open failed: {err}")),
    };
    let config = SessionConfig::new(page_id, host_id, viewer_id);
    let session = match AnkaSession::start(config, feed, seed) {
        Ok(session) => session,
        Err(err) => return PageActionResponse::failure(format!("page_open failed: {err}")),
    };

    let key = page_key(&session.config().page_id, &session.config().viewer_id);
    let mut pages = match lock_pages() {
        Ok(pages) => pages,
        Err(message) => return PageActionResponse::failure(message),
    };
    if pages.insert(key.clone(), session).is_some() {
        warn!("event=page_reopen module=ffi status=warn page_key={key}");
    }
    PageActionResponse::success("Page opened.", Some(key))
}

/// Composes and sends one message as the page viewer.
#[flutter_rust_bridge::frb(sync)]
pub fn page_send(page_key: String, content: String) -> PageActionResponse {
    with_page(&page_key, |session| {
        session.pump();
        session.send(&content)
    })
    .map(|message_id| PageActionResponse {
        message_id: Some(message_id),
        ..PageActionResponse::success("Message sent.", Some(page_key.clone()))
    })
    .unwrap_or_else(|err| PageActionResponse::failure(format!("page_send failed: {err}")))
}

/// Pushes one raw message to every session joined to `page_id`.
///
/// Stands in for the server side of the live channel.
#[flutter_rust_bridge::frb(sync)]
pub fn page_deliver(page_id: String, message_json: String) -> PageActionResponse {
    let data = match serde_json::from_str::<MessageData>(&message_json) {
        Ok(data) => data,
        Err(err) => {
            return PageActionResponse::failure(format!("page_deliver invalid message: {err}"))
        }
    };
    let message = parse_message_data(data);
    match BROKER.deliver(&anka_core::channel_for_page(&page_id), &message) {
        Ok(count) => PageActionResponse {
            message_id: Some(message.id),
            ..PageActionResponse::success(format!("Delivered to {count} session(s)."), None)
        },
        Err(err) => PageActionResponse::failure(format!("page_deliver failed: {err}")),
    }
}

/// Drains pending live messages and returns the current page snapshot.
#[flutter_rust_bridge::frb(sync)]
pub fn page_view(page_key: String) -> PageViewResponse {
    let view = match with_page(&page_key, |session| {
        session.pump();
        Ok(session.view())
    }) {
        Ok(view) => view,
        Err(err) => return PageViewResponse::failure(format!("page_view failed: {err}")),
    };

    match serde_json::to_string(&view) {
        Ok(view_json) => PageViewResponse {
            ok: true,
            matched_ids: view
                .matched_row_ids()
                .into_iter()
                .map(str::to_string)
                .collect(),
            feed_status: view.feed_status.as_str().to_string(),
            message: format!("{} message(s).", view.rows.len()),
            view_json,
        },
        Err(err) => PageViewResponse::failure(format!("page_view encode failed: {err}")),
    }
}

/// Re-anchors the message list to the newest row.
#[flutter_rust_bridge::frb(sync)]
pub fn page_scroll_to_latest(page_key: String) -> PageActionResponse {
    match with_page(&page_key, |session| {
        session.scroll_to_latest();
        Ok(())
    }) {
        Ok(()) => PageActionResponse::success("Scrolled to latest.", Some(page_key)),
        Err(err) => PageActionResponse::failure(format!("page_scroll_to_latest failed: {err}")),
    }
}

/// Rejoins the page channel after a feed loss; rows are kept.
#[flutter_rust_bridge::frb(sync)]
pub fn page_reconnect(page_key: String) -> PageActionResponse {
    match with_page(&page_key, |session| session.reconnect()) {
        Ok(()) => PageActionResponse::success("Page reconnected.", Some(page_key)),
        Err(err) => PageActionResponse::failure(format!("page_reconnect failed: {err}")),
    }
}

/// Closes a page session and releases its channel subscription.
#[flutter_rust_bridge::frb(sync)]
pub fn page_close(page_key: String) -> PageActionResponse {
    let removed = match lock_pages() {
        Ok(mut pages) => pages.remove(&page_key),
        Err(message) => return PageActionResponse::failure(message),
    };
    let Some(mut session) = removed else {
        return PageActionResponse::failure(format!("page not open: {page_key}"));
    };
    match session.close() {
        Ok(()) => PageActionResponse::success("Page closed.", Some(page_key)),
        Err(err) => PageActionResponse::failure(format!("page_close failed: {err}")),
    }
}

fn page_key(page_id: &str, viewer_id: &str) -> String {
    format!("{page_id}:{viewer_id}")
}

fn lock_pages() -> Result<MutexGuard<'static, PageRegistry>, String> {
    PAGES
        .lock()
        .map_err(|_| "page registry lock poisoned".to_string())
}

fn with_page<T>(
    page_key: &str,
    f: impl FnOnce(&mut AnkaSession<LocalFeedClient>) -> anka_core::SessionResult<T>,
) -> Result<T, String> {
    let mut pages = lock_pages()?;
    let session = pages
        .get_mut(page_key)
        .ok_or_else(|| format!("page not open: {page_key}"))?;
    f(session).map_err(|err| err.to_string())
}
