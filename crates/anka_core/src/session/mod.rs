//! Page session use-cases.
//!
//! # Responsibility
//! - Wire feed, store, matcher and view state for one open page.
//! - Keep UI/FFI layers decoupled from feed transport details.

pub mod anka_session;
