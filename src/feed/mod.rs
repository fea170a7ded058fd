//! Feed fetch workflow
//!
//! Pages through a Feedly stream with continuation tokens.
//!
//! # Overview
//!
//! - [`FeedApi`] - the stream collaborator: one page per call
//! - [`FeedlyStreamClient`] - `FeedApi` over the Feedly REST API
//! - [`FeedViewModel`] - owns the continuation token and the accumulated
//!   item list, and publishes loading/error/items through watch channels

mod api;
mod view_model;

pub use api::{FeedApi, FeedlyStreamClient, DEFAULT_FEEDLY_BASE_URL};
pub use view_model::{FeedOutputs, FeedSnapshot, FeedViewModel};
