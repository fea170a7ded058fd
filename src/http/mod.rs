//! HTTP client module
//!
//! Thin wrapper over reqwest shared by the feed API client and the
//! Firestore document store.
//!
//! # Features
//!
//! - **Base URL joining**: relative paths resolve against a configured base
//! - **Rate Limiting**: optional token bucket limiter using governor
//! - **Error classification**: non-success statuses map to [`ApiErrorKind`](crate::error::ApiErrorKind)
//!
//! Failed requests are never retried.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
