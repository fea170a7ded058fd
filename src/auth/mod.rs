//! Authentication module
//!
//! Supports: static developer tokens and the Feedly OAuth refresh flow.
//!
//! Every feed request needs a short-lived access credential. The workflows
//! never build credentials themselves; they ask an injected
//! [`AccessTokenProvider`] right before each request.

mod provider;
mod types;

pub use provider::{AccessTokenProvider, RefreshTokenProvider, StaticToken};
pub use types::{token_url_for, AuthConfig, CachedToken, DEFAULT_TOKEN_URL};
