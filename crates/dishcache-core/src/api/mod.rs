//! REST API layer for the recipe backend.
//!
//! This module provides the `Gateway`, through which every call is sent,
//! and the typed `DishApi` built on top of it.
//!
//! Requests carry the session token in a `token` header. Responses are
//! wrapped in an `{code, message, data}` envelope where code 200 is success
//! and code 401 means the session is gone.

pub mod client;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod request;

pub use client::DishApi;
pub use envelope::Envelope;
pub use error::{ApiError, CODE_OK, CODE_UNAUTHENTICATED};
pub use gateway::{Attempt, Gateway, TOKEN_HEADER};
pub use request::{Method, PendingRequest};
