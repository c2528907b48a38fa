//! dishcache core - API gateway, models, local cache and auth for a recipe
//! client.
//!
//! Every backend call goes through [`api::Gateway`], which attaches the
//! stored session token and recovers from an expired session by logging in
//! once and replaying the call. The local store keeps the session plus
//! offline mirrors of favorites, search history and view history.

pub mod api;
pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod notify;
pub mod store;
pub mod utils;

pub use api::{ApiError, DishApi, Gateway, PendingRequest};
pub use app::App;
pub use auth::{AuthError, LoginProvider, Session};
pub use config::Config;
pub use notify::{LogNotifier, Notifier};
pub use store::{FileStore, KeyValueStore, MemoryStore};
