//! Reply matching against the host's latest tagged elements.
//!
//! # Responsibility
//! - Derive the host reference from the message sequence.
//! - Flag messages whose elements satisfy a pluggable rule.
//!
//! # Invariants
//! - The reference is recomputed from the sequence, never stored authoritatively.

pub mod anka_matcher;
pub mod rule;
