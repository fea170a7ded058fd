//! CLI module
//!
//! Command-line front-end driving both workflows.
//!
//! # Commands
//!
//! - `feeds` - page through the configured Feedly stream
//! - `shops` - page through the configured Firestore collection
//! - `check` - validate config and acquire a feed credential

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{feed_view_model, shop_model, Runner};
