//! View-state projections consumed by UI layers.

pub mod page;
pub mod scroll;
