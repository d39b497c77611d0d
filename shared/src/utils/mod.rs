//! Utility modules shared across layers

pub mod sanitize;

pub use sanitize::SanitizeRule;
