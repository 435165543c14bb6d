//! Group-buying launch form.

pub mod draft;
