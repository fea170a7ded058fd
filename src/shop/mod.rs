//! Shop fetch workflow
//!
//! Pages through a document collection with a "last document" marker.
//!
//! # Overview
//!
//! - [`ShopStore`] - the document store collaborator: one page per call
//! - [`FirestoreStore`] - `ShopStore` over the Firestore REST API
//! - [`MemoryStore`] - ordered in-memory collection
//! - [`ShopModel`] - owns the marker and hands back one page at a time;
//!   accumulating pages is up to the caller

mod firestore;
mod model;
mod store;

pub use firestore::{FirestoreConfig, FirestoreStore, DEFAULT_FIRESTORE_BASE_URL};
pub use model::ShopModel;
pub use store::{Document, MemoryStore, ShopStore};
