//! Feed view-model
//!
//! Holds the continuation token and the list shown to the user. Each
//! `get_feeds` call acquires a credential, fetches one page and either
//! replaces the list (no continuation yet) or appends to it.

use super::api::FeedApi;
use crate::auth::AccessTokenProvider;
use crate::error::Result;
use crate::types::{Feed, FeedItem};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{info, warn};

/// Receivers for everything the view-model publishes
///
/// Each receiver starts at the current value; `changed().await` waits for
/// the next update.
#[derive(Debug, Clone)]
pub struct FeedOutputs {
    /// True while a fetch is in flight
    pub loading: watch::Receiver<bool>,
    /// Set once a fetch fails
    pub error: watch::Receiver<bool>,
    /// Message of the latest failure
    pub error_text: watch::Receiver<String>,
    /// Accumulated items
    pub feed_items: watch::Receiver<Vec<FeedItem>>,
}

/// Point-in-time copy of the view-model state
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub loading: bool,
    pub error: bool,
    pub error_text: String,
    pub feed_items: Vec<FeedItem>,
    pub continuation: Option<String>,
}

/// Paginating view-model over a [`FeedApi`]
///
/// Overlapping `get_feeds` calls are not coalesced: each runs to completion
/// and applies its page when it finishes.
pub struct FeedViewModel {
    auth: Arc<dyn AccessTokenProvider>,
    stream: Arc<dyn FeedApi>,
    continuation: Mutex<Option<String>>,
    in_flight: AtomicUsize,
    loading: watch::Sender<bool>,
    error: watch::Sender<bool>,
    error_text: watch::Sender<String>,
    feed_items: watch::Sender<Vec<FeedItem>>,
}

impl FeedViewModel {
    /// Create a view-model with an empty list and no continuation
    pub fn new(auth: Arc<dyn AccessTokenProvider>, stream: Arc<dyn FeedApi>) -> Self {
        Self {
            auth,
            stream,
            continuation: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            loading: watch::channel(false).0,
            error: watch::channel(false).0,
            error_text: watch::channel(String::new()).0,
            feed_items: watch::channel(Vec::new()).0,
        }
    }

    /// Forget the continuation; the next fetch starts from the top
    ///
    /// The displayed items are left as they are.
    pub fn reset_continuation(&self) {
        *self.lock_continuation() = None;
    }

    /// Fetch the next page and apply it
    ///
    /// Failures never propagate: they set the error flag and text, leaving
    /// items and continuation untouched.
    pub async fn get_feeds(&self) {
        let fetch = InFlight::enter(&self.in_flight, &self.loading);
        self.loading.send_replace(true);

        let result = self.fetch_page().await;

        fetch.finish();
        self.handle_result(result);
    }

    async fn fetch_page(&self) -> Result<Feed> {
        let access_token = self.auth.access_token().await?;
        let continuation = self.continuation();
        self.stream
            .fetch_page(&access_token, continuation.as_deref())
            .await
    }

    fn handle_result(&self, result: Result<Feed>) {
        self.loading.send_replace(false);

        match result {
            Ok(feed) => {
                let mut continuation = self.lock_continuation();
                let received = feed.items.len();

                if continuation.is_some() {
                    self.feed_items
                        .send_modify(|items| items.extend(feed.items));
                } else {
                    self.feed_items.send_replace(feed.items);
                }
                *continuation = feed.continuation;

                info!(
                    received,
                    total = self.feed_items.borrow().len(),
                    has_more = continuation.is_some(),
                    "Applied feed page"
                );
            }
            Err(e) => {
                warn!("Feed fetch failed: {e}");
                self.error.send_replace(true);
                self.error_text.send_replace(e.to_string());
            }
        }
    }

    /// Number of `get_feeds` calls currently awaiting a page
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Current continuation token
    pub fn continuation(&self) -> Option<String> {
        self.lock_continuation().clone()
    }

    /// Subscribe to the published state
    pub fn outputs(&self) -> FeedOutputs {
        FeedOutputs {
            loading: self.loading.subscribe(),
            error: self.error.subscribe(),
            error_text: self.error_text.subscribe(),
            feed_items: self.feed_items.subscribe(),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            loading: *self.loading.borrow(),
            error: *self.error.borrow(),
            error_text: self.error_text.borrow().clone(),
            feed_items: self.feed_items.borrow().clone(),
            continuation: self.continuation(),
        }
    }

    fn lock_continuation(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.continuation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for FeedViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedViewModel")
            .field("continuation", &self.continuation())
            .field("loading", &*self.loading.borrow())
            .field("in_flight", &self.in_flight())
            .field("items", &self.feed_items.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Counts one `get_feeds` call for as long as it is pending
///
/// Dropped without `finish` means the caller abandoned the future; the last
/// abandoned fetch also lowers the loading flag.
struct InFlight<'a> {
    count: &'a AtomicUsize,
    loading: &'a watch::Sender<bool>,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn enter(count: &'a AtomicUsize, loading: &'a watch::Sender<bool>) -> Self {
        if count.fetch_add(1, Ordering::SeqCst) > 0 {
            warn!("get_feeds called while another fetch is still in flight");
        }
        Self {
            count,
            loading,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let remaining = self.count.fetch_sub(1, Ordering::SeqCst) - 1;
        if !self.finished {
            warn!("get_feeds dropped before its page arrived");
            if remaining == 0 {
                self.loading.send_replace(false);
            }
        }
    }
}
