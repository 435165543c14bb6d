//! Raw content parsing.
//!
//! # Responsibility
//! - Turn composed/queried text into segments plus anka elements.

pub mod content;
