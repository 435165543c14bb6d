//! Anka element model.
//!
//! # Responsibility
//! - Define the fixed set of element categories a message can be tagged with.
//! - Provide stable string ids used by content markup and wire payloads.
//!
//! # Invariants
//! - Element type strings are lowercase and never change once published.
//! - Matching compares element types only; `value` is display data.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Category of a tagged content unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnkaElementType {
    /// Dice roll, optionally with face count as value.
    Dice,
    /// Free number guess.
    Number,
    /// Pick among host-offered options.
    Choice,
    /// Color pick.
    Color,
    /// Emoji reaction.
    Emoji,
}

/// Markup/wire string for dice elements.
pub const ANKA_ELEMENT_DICE: &str = "dice";
/// Markup/wire string for number elements.
pub const ANKA_ELEMENT_NUMBER: &str = "number";
/// Markup/wire string for choice elements.
pub const ANKA_ELEMENT_CHOICE: &str = "choice";
/// Markup/wire string for color elements.
pub const ANKA_ELEMENT_COLOR: &str = "color";
/// Markup/wire string for emoji elements.
pub const ANKA_ELEMENT_EMOJI: &str = "emoji";

const SUPPORTED_ELEMENT_TYPE_STRINGS: &[&str] = &[
    ANKA_ELEMENT_DICE,
    ANKA_ELEMENT_NUMBER,
    ANKA_ELEMENT_CHOICE,
    ANKA_ELEMENT_COLOR,
    ANKA_ELEMENT_EMOJI,
];

impl AnkaElementType {
    /// All element categories in declaration order.
    pub const ALL: [AnkaElementType; 5] = [
        Self::Dice,
        Self::Number,
        Self::Choice,
        Self::Color,
        Self::Emoji,
    ];

    /// Stable string id used in markup and wire payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dice => ANKA_ELEMENT_DICE,
            Self::Number => ANKA_ELEMENT_NUMBER,
            Self::Choice => ANKA_ELEMENT_CHOICE,
            Self::Color => ANKA_ELEMENT_COLOR,
            Self::Emoji => ANKA_ELEMENT_EMOJI,
        }
    }
}

impl Display for AnkaElementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns supported element type strings.
pub fn supported_element_type_strings() -> &'static [&'static str] {
    SUPPORTED_ELEMENT_TYPE_STRINGS
}

/// Parses one element type from its markup string.
///
/// Leading/trailing whitespace is ignored; matching is case-sensitive.
pub fn parse_element_type(value: &str) -> Result<AnkaElementType, ElementTypeError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(ElementTypeError::Empty);
    }

    match normalized {
        ANKA_ELEMENT_DICE => Ok(AnkaElementType::Dice),
        ANKA_ELEMENT_NUMBER => Ok(AnkaElementType::Number),
        ANKA_ELEMENT_CHOICE => Ok(AnkaElementType::Choice),
        ANKA_ELEMENT_COLOR => Ok(AnkaElementType::Color),
        ANKA_ELEMENT_EMOJI => Ok(AnkaElementType::Emoji),
        other => Err(ElementTypeError::Unsupported(other.to_string())),
    }
}

/// Element type parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementTypeError {
    Empty,
    Unsupported(String),
}

impl Display for ElementTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "anka element type must not be empty"),
            Self::Unsupported(value) => write!(f, "anka element type is unsupported: {value}"),
        }
    }
}

impl Error for ElementTypeError {}

/// Tagged content unit attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnkaElement {
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: AnkaElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl AnkaElement {
    pub fn new(kind: AnkaElementType) -> Self {
        Self { kind, value: None }
    }

    pub fn with_value(kind: AnkaElementType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
        }
    }
}
