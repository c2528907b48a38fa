//! Utility functions for display formatting.

pub mod format;

pub use format::{format_relative_time, image_url, truncate_string};
