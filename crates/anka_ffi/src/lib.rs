//! Flutter bridge crate for anka pages.

pub mod api;
