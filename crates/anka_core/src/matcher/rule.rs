//! Pluggable match predicates.

use crate::model::element::AnkaElementType;
use crate::model::message::Message;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Decides whether one message satisfies the host reference types.
///
/// Callers never invoke a rule with an empty reference set.
pub trait MatchRule: Send + Sync {
    /// Stable rule id used in logs and configuration.
    fn name(&self) -> &'static str;
    fn is_match(&self, reference: &BTreeSet<AnkaElementType>, candidate: &Message) -> bool;
}

/// Matches when the candidate shares at least one element type with the reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeOverlap;

impl MatchRule for TypeOverlap {
    fn name(&self) -> &'static str {
        MATCH_RULE_OVERLAP
    }

    fn is_match(&self, reference: &BTreeSet<AnkaElementType>, candidate: &Message) -> bool {
        candidate
            .anka_elements
            .iter()
            .any(|element| reference.contains(&element.kind))
    }
}

/// Matches when the candidate carries every reference element type.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCoverage;

impl MatchRule for TypeCoverage {
    fn name(&self) -> &'static str {
        MATCH_RULE_COVERAGE
    }

    fn is_match(&self, reference: &BTreeSet<AnkaElementType>, candidate: &Message) -> bool {
        let carried = candidate.element_types();
        reference.iter().all(|kind| carried.contains(kind))
    }
}

/// Config string for [`TypeOverlap`].
pub const MATCH_RULE_OVERLAP: &str = "overlap";
/// Config string for [`TypeCoverage`].
pub const MATCH_RULE_COVERAGE: &str = "coverage";

/// Built-in rule selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchRuleKind {
    #[default]
    Overlap,
    Coverage,
}

impl MatchRuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overlap => MATCH_RULE_OVERLAP,
            Self::Coverage => MATCH_RULE_COVERAGE,
        }
    }

    pub fn build(self) -> Box<dyn MatchRule> {
        match self {
            Self::Overlap => Box::new(TypeOverlap),
            Self::Coverage => Box::new(TypeCoverage),
        }
    }
}

/// Parses a rule selector; case-insensitive, whitespace-tolerant.
pub fn parse_match_rule(value: &str) -> Result<MatchRuleKind, MatchRuleError> {
    match value.trim().to_ascii_lowercase().as_str() {
        MATCH_RULE_OVERLAP => Ok(MatchRuleKind::Overlap),
        MATCH_RULE_COVERAGE => Ok(MatchRuleKind::Coverage),
        other => Err(MatchRuleError(other.to_string())),
    }
}

/// Unknown match rule name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRuleError(pub String);

impl Display for MatchRuleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported match rule `{}`; expected overlap|coverage",
            self.0
        )
    }
}

impl Error for MatchRuleError {}
