//! Common types used throughout feedly-pager
//!
//! The value types both workflows hand out: feed items and pages from the
//! stream API, and shop records from the document store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Feed Types
// ============================================================================

/// A single entry of a Feedly stream
///
/// Only `title` is interpreted; everything else the API sends is kept
/// verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Server-assigned entry id
    pub id: String,

    /// Entry title (empty when the API omits it)
    #[serde(default)]
    pub title: String,

    /// Id of the entry at its origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,

    /// Publication time (milliseconds since epoch on the wire)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub published: Option<DateTime<Utc>>,

    /// Remaining fields, untouched
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl FeedItem {
    /// Create an item with just an id and a title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            origin_id: None,
            published: None,
            extra: JsonObject::new(),
        }
    }
}

/// One page of a stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    /// Stream id echoed by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Entries of this page, in server order
    #[serde(default)]
    pub items: Vec<FeedItem>,

    /// Token for the next page; absent at the end of the stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}

impl Feed {
    /// Create a page from items and an optional continuation
    pub fn new(items: Vec<FeedItem>, continuation: Option<String>) -> Self {
        Self {
            id: None,
            items,
            continuation,
        }
    }
}

// ============================================================================
// Shop Types
// ============================================================================

/// A shop record from the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    /// Display name
    pub name: String,
    /// Price in the smallest currency unit
    pub price: i64,
    /// Server-assigned document identifier
    pub document_id: String,
}

impl Shop {
    /// Create a shop record
    pub fn new(name: impl Into<String>, price: i64, document_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            document_id: document_id.into(),
        }
    }
}

/// Menu entries share the shop record shape
pub type Food = Shop;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_feed_deserialize_stream_contents() {
        let body = json!({
            "id": "feed/http://example.com/rss",
            "continuation": "16b1d3c9a1e:2c1e3:5d8a1b7f",
            "items": [
                {
                    "id": "entry-1",
                    "title": "First",
                    "originId": "http://example.com/1",
                    "published": 1_630_000_000_000_i64,
                    "unread": true
                },
                { "id": "entry-2" }
            ]
        });

        let feed: Feed = serde_json::from_value(body).unwrap();
        assert_eq!(feed.continuation.as_deref(), Some("16b1d3c9a1e:2c1e3:5d8a1b7f"));
        assert_eq!(feed.items.len(), 2);

        let first = &feed.items[0];
        assert_eq!(first.title, "First");
        assert_eq!(first.origin_id.as_deref(), Some("http://example.com/1"));
        assert_eq!(first.published.unwrap().timestamp_millis(), 1_630_000_000_000);
        assert_eq!(first.extra.get("unread"), Some(&json!(true)));

        assert_eq!(feed.items[1].title, "");
        assert!(feed.items[1].published.is_none());
    }

    #[test]
    fn test_feed_without_continuation() {
        let feed: Feed = serde_json::from_value(json!({ "items": [] })).unwrap();
        assert!(feed.continuation.is_none());
        assert!(feed.items.is_empty());
    }
}
