//! Feedly stream API client

use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::Feed;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Feedly's API host
pub const DEFAULT_FEEDLY_BASE_URL: &str = "https://cloud.feedly.com";

const STREAM_CONTENTS_PATH: &str = "/v3/streams/contents";

/// Source of feed pages
#[async_trait]
pub trait FeedApi: Send + Sync {
    /// Fetch one page, resuming at `continuation` when given
    async fn fetch_page(&self, access_token: &str, continuation: Option<&str>) -> Result<Feed>;
}

/// `FeedApi` backed by `GET /v3/streams/contents`
#[derive(Debug, Clone)]
pub struct FeedlyStreamClient {
    http: Arc<HttpClient>,
    stream_id: String,
    count: u32,
}

impl FeedlyStreamClient {
    /// Create a client for one stream
    ///
    /// `http` must be configured with the API base URL.
    pub fn new(http: Arc<HttpClient>, stream_id: impl Into<String>, count: u32) -> Self {
        Self {
            http,
            stream_id: stream_id.into(),
            count,
        }
    }
}

#[async_trait]
impl FeedApi for FeedlyStreamClient {
    async fn fetch_page(&self, access_token: &str, continuation: Option<&str>) -> Result<Feed> {
        debug!(
            stream_id = %self.stream_id,
            continuation = continuation.unwrap_or("<start>"),
            "Fetching stream page"
        );

        let request = RequestConfig::new()
            .query("streamId", &self.stream_id)
            .query("count", self.count.to_string())
            .query_opt("continuation", continuation)
            .bearer(access_token);

        self.http.get_json(STREAM_CONTENTS_PATH, request).await
    }
}
