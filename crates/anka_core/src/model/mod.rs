//! Domain model for anka pages.
//!
//! # Responsibility
//! - Define canonical message and element structures shared by every layer.
//!
//! # Invariants
//! - Messages are append-only values; no layer mutates one after append.
//! - Element categories form a closed set.

pub mod element;
pub mod message;
