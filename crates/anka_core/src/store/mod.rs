//! In-memory message storage for page sessions.
//!
//! # Invariants
//! - Storage is session-scoped; nothing outlives the page session.

pub mod message_store;
