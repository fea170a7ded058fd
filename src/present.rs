//! Presentation collaborators
//!
//! A list row for feed items, a screen that can show a blocking indicator
//! and transient messages, and the glue that drives a screen from the feed
//! view-model's outputs.

use crate::feed::FeedOutputs;
use crate::types::{FeedItem, Shop};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// One row of the feed list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedCell {
    pub index_label: String,
    pub title_label: String,
}

impl FeedCell {
    /// Row for the given 1-based position
    pub fn new(index: usize) -> Self {
        Self {
            index_label: index.to_string(),
            title_label: String::new(),
        }
    }

    /// Show an item in this row
    pub fn configure(&mut self, item: &FeedItem) {
        self.title_label.clone_from(&item.title);
    }

    /// Render as a single terminal line
    pub fn render(&self) -> String {
        format!("{:>4}  {}", self.index_label, self.title_label)
    }
}

/// Render a feed list, one line per item
pub fn render_feed(items: &[FeedItem]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut cell = FeedCell::new(i + 1);
            cell.configure(item);
            cell.render()
        })
        .collect()
}

/// Render a shop list, one line per record
pub fn render_shops(shops: &[Shop]) -> Vec<String> {
    shops
        .iter()
        .map(|shop| format!("{:<24} {:>8}  {}", shop.name, shop.price, shop.document_id))
        .collect()
}

/// Something that can show progress and messages to the user
pub trait Screen: Send + Sync {
    /// Show or hide the blocking progress indicator
    fn show_indicator(&self, visible: bool);

    /// Show a transient message
    fn show_toast(&self, message: &str);
}

/// Screen that writes to stderr
#[derive(Debug, Default)]
pub struct TerminalScreen;

impl TerminalScreen {
    pub fn new() -> Self {
        Self
    }
}

impl Screen for TerminalScreen {
    fn show_indicator(&self, visible: bool) {
        let mut stderr = std::io::stderr().lock();
        if visible {
            let _ = write!(stderr, "Loading...\r");
        } else {
            let _ = write!(stderr, "          \r");
        }
        let _ = stderr.flush();
    }

    fn show_toast(&self, message: &str) {
        let _ = writeln!(std::io::stderr(), "! {message}");
    }
}

/// Keep `screen` in sync with the view-model until its outputs close
///
/// Loading changes toggle the indicator; every non-empty error text is shown
/// as a toast.
pub fn bind_feed(outputs: FeedOutputs, screen: Arc<dyn Screen>) -> JoinHandle<()> {
    let FeedOutputs {
        mut loading,
        mut error_text,
        ..
    } = outputs;

    tokio::spawn(async move {
        let mut loading_open = true;
        let mut error_open = true;

        // A closed receiver still yields its last unseen value first
        loop {
            tokio::select! {
                changed = loading.changed(), if loading_open => match changed {
                    Ok(()) => {
                        let visible = *loading.borrow_and_update();
                        screen.show_indicator(visible);
                    }
                    Err(_) => loading_open = false,
                },
                changed = error_text.changed(), if error_open => match changed {
                    Ok(()) => {
                        let text = error_text.borrow_and_update().clone();
                        if !text.is_empty() {
                            screen.show_toast(&text);
                        }
                    }
                    Err(_) => error_open = false,
                },
                else => break,
            }
        }
    })
}

/// Toggle the indicator from a loading flag until its sender goes away
pub fn bind_loading(mut loading: watch::Receiver<bool>, screen: Arc<dyn Screen>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while loading.changed().await.is_ok() {
            let visible = *loading.borrow_and_update();
            screen.show_indicator(visible);
        }
    })
}
