//! Display helpers for cache metadata.

pub mod format;

pub use format::format_age;
