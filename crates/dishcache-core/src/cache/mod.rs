//! Local mirrors of user state for offline access.
//!
//! This module provides the `LocalCache` for the lists the client keeps on
//! the device even when the backend is unreachable:
//! - Favorites (unique by dish id)
//! - Search history (unique by keyword)
//! - View history (unique by dish id, with a per-dish view count)
//!
//! Every list is newest-first and capped at a configured length.

pub mod history;
pub mod manager;

pub use manager::{HistoryLimits, LocalCache, LocalStats};
