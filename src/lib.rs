// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # feedly-pager
//!
//! Paginated clients for a Feedly stream and a Firestore shop listing,
//! each wrapped in a small observable model.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use feedly_pager::auth::StaticToken;
//! use feedly_pager::feed::{FeedViewModel, FeedlyStreamClient};
//! use feedly_pager::http::{HttpClient, HttpClientConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> feedly_pager::Result<()> {
//!     let http = HttpClientConfig::builder()
//!         .base_url("https://cloud.feedly.com")
//!         .build();
//!     let http = Arc::new(HttpClient::with_config(http)?);
//!
//!     let stream = FeedlyStreamClient::new(http, "feed/https://blog.rust-lang.org/feed.xml", 20);
//!     let view_model = FeedViewModel::new(Arc::new(StaticToken::new("...")), Arc::new(stream));
//!
//!     view_model.get_feeds().await; // first page replaces the list
//!     view_model.get_feeds().await; // next page is appended
//!
//!     for item in view_model.snapshot().feed_items {
//!         println!("{}", item.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │        FeedViewModel         │   │          ShopModel           │
//! │ reset_continuation()         │   │ reset_last_document()        │
//! │ get_feeds()  → watch outputs │   │ get_shops() → Result<page>   │
//! └──────────┬─────────┬─────────┘   └──────────────┬───────────────┘
//!            │         │                            │
//! ┌──────────┴───┐ ┌───┴──────────┐        ┌────────┴─────────┐
//! │ AccessToken  │ │   FeedApi    │        │    ShopStore     │
//! │  Provider    │ │ (Feedly REST)│        │ (Firestore REST) │
//! └──────────────┘ └──────┬───────┘        └────────┬─────────┘
//!                         └────────── HttpClient ───┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Feed and shop value types
pub mod types;

/// Access credential providers
pub mod auth;

/// HTTP client with rate limiting
pub mod http;

/// Feed pagination workflow
pub mod feed;

/// Shop pagination workflow
pub mod shop;

/// List rows, screens and output bindings
pub mod present;

/// Application configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{ApiErrorKind, Error, Result};
pub use types::*;

pub use feed::FeedViewModel;
pub use shop::ShopModel;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
