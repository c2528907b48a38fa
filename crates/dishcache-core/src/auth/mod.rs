//! Authentication: session state and the login exchange.
//!
//! This module provides:
//! - `Session`: the persisted token and cached profile
//! - `LoginProvider`: the injected platform login-code capability
//! - `AuthExchange`: one round trip to the login endpoint
//!
//! Tokens carry no client-side expiry; the server decides when a session
//! is over by answering 401.

pub mod login;
pub mod session;

pub use login::{AuthError, AuthExchange, LoginProvider, LOGIN_PATH};
pub use session::Session;
