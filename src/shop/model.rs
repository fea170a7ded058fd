//! Shop model

use super::store::{Document, ShopStore};
use crate::error::{Error, Result};
use crate::types::Shop;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{info, warn};

/// Pages through shops, remembering the last document seen
///
/// Unlike the feed view-model this returns only the page it fetched and
/// keeps no error state: store failures go straight back to the caller.
pub struct ShopModel {
    store: Arc<dyn ShopStore>,
    last_document: Mutex<Option<Document>>,
    loading: watch::Sender<bool>,
}

impl ShopModel {
    /// Create a model starting at the first page
    pub fn new(store: Arc<dyn ShopStore>) -> Self {
        Self {
            store,
            last_document: Mutex::new(None),
            loading: watch::channel(false).0,
        }
    }

    /// Forget the marker; the next fetch starts from the first page
    pub fn reset_last_document(&self) {
        *self.lock_marker() = None;
    }

    /// Fetch the next page of shops
    ///
    /// Documents that do not decode as a [`Shop`] are skipped, but the marker
    /// still moves to the last document of the page.
    pub async fn get_shops(&self) -> Result<Vec<Shop>> {
        self.loading.send_replace(true);

        let after = self.last_document();
        let result = self.store.query_page(after.as_ref()).await;

        self.loading.send_replace(false);
        let documents = result.map_err(Error::Store)?;

        let shops: Vec<Shop> = documents
            .iter()
            .filter_map(|document| match document.decode::<Shop>() {
                Ok(shop) => Some(shop),
                Err(e) => {
                    warn!(document = document.id(), "Skipping undecodable shop: {e}");
                    None
                }
            })
            .collect();

        info!(
            documents = documents.len(),
            shops = shops.len(),
            "Fetched shop page"
        );
        *self.lock_marker() = documents.into_iter().last();

        Ok(shops)
    }

    /// The current pagination marker
    pub fn last_document(&self) -> Option<Document> {
        self.lock_marker().clone()
    }

    /// Watch the loading flag
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    fn lock_marker(&self) -> MutexGuard<'_, Option<Document>> {
        self.last_document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ShopModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopModel")
            .field(
                "last_document",
                &self.lock_marker().as_ref().map(|d| d.id().to_string()),
            )
            .finish_non_exhaustive()
    }
}
