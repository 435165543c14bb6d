//! Message content parser.
//!
//! # Responsibility
//! - Split raw message text into text runs and tagged anka elements.
//! - Convert raw `MessageData` into parsed `Message` values.
//!
//! # Invariants
//! - Parsing never fails; unknown tags are kept as literal text.
//! - Adjacent text runs are merged and empty runs are dropped.
//! - Element segment indexes follow element order in the source text.

use crate::model::element::{parse_element_type, AnkaElement};
use crate::model::message::{ContentSegment, Message, MessageData};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static ELEMENT_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([^\[\]:]*)(?::([^\[\]]*))?\]\]").expect("valid element tag regex")
});

/// Result of parsing one raw content string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedContent {
    pub segments: Vec<ContentSegment>,
    pub elements: Vec<AnkaElement>,
}

/// Parses `[[kind]]` / `[[kind:value]]` markup out of raw content.
pub fn parse_content(raw: &str) -> ParsedContent {
    let mut parsed = ParsedContent::default();
    let mut cursor = 0;

    for captures in ELEMENT_TAG_RE.captures_iter(raw) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let kind_raw = captures.get(1).map_or("", |m| m.as_str());
        let kind = match parse_element_type(kind_raw) {
            Ok(kind) => kind,
            Err(err) => {
                debug!("event=content_parse module=parse status=skip reason={err}");
                continue;
            }
        };

        push_text(&mut parsed.segments, &raw[cursor..whole.start()]);
        let value = captures
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        parsed.segments.push(ContentSegment::Element {
            index: parsed.elements.len(),
        });
        parsed.elements.push(AnkaElement { kind, value });
        cursor = whole.end();
    }

    push_text(&mut parsed.segments, &raw[cursor..]);
    parsed
}

/// Converts queried/composed raw data into a parsed message.
pub fn parse_message_data(data: MessageData) -> Message {
    let ParsedContent { segments, elements } = parse_content(&data.content);
    Message::with_id(data.id, data.user_id, segments, elements)
}

fn push_text(segments: &mut Vec<ContentSegment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(ContentSegment::Text { text: last }) = segments.last_mut() {
        last.push_str(text);
        return;
    }
    segments.push(ContentSegment::Text {
        text: text.to_string(),
    });
}
