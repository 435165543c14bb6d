//! Live feed adapter.
//!
//! # Responsibility
//! - Define the injected feed client contract and its wire frames.
//! - Provide an in-process broker for local runs and tests.
//!
//! # Invariants
//! - No acknowledgement, retry or backpressure; receipt order is the only
//!   ordering guarantee.

pub mod client;
pub mod frame;
pub mod local;
