//! CLI runner - executes commands

use crate::auth::DEFAULT_TOKEN_URL;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::feed::{FeedViewModel, FeedlyStreamClient};
use crate::http::HttpClient;
use crate::present::{bind_feed, bind_loading, render_feed, render_shops, Screen, TerminalScreen};
use crate::shop::{FirestoreStore, ShopModel};
use crate::types::{FeedItem, Shop};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = AppConfig::load(&self.cli.config)?;

        match &self.cli.command {
            Commands::Feeds { pages, reset_after } => {
                self.feeds(&config, *pages, *reset_after).await
            }
            Commands::Shops { pages } => self.shops(&config, *pages).await,
            Commands::Check => self.check(&config).await,
        }
    }

    async fn feeds(&self, config: &AppConfig, pages: usize, reset_after: Option<usize>) -> Result<()> {
        let view_model = feed_view_model(config)?;
        let screen: Arc<dyn Screen> = Arc::new(TerminalScreen::new());
        let binding = bind_feed(view_model.outputs(), screen);

        for page in 0..pages {
            if reset_after == Some(page) {
                info!(page, "Resetting continuation");
                view_model.reset_continuation();
            }

            view_model.get_feeds().await;

            let snapshot = view_model.snapshot();
            if snapshot.error {
                break;
            }
            if snapshot.continuation.is_none() && reset_after != Some(page + 1) {
                info!("Reached end of stream");
                break;
            }
        }

        let snapshot = view_model.snapshot();

        // Closing the outputs lets the binding flush its last toast
        drop(view_model);
        let _ = binding.await;

        self.print_feed(&snapshot.feed_items)?;

        if snapshot.error {
            return Err(Error::Other(format!(
                "Feed fetch failed: {}",
                snapshot.error_text
            )));
        }
        Ok(())
    }

    async fn shops(&self, config: &AppConfig, pages: usize) -> Result<()> {
        let model = shop_model(config)?;
        let screen: Arc<dyn Screen> = Arc::new(TerminalScreen::new());
        let binding = bind_loading(model.loading(), screen.clone());

        // The model hands back one page at a time; accumulate here
        let mut shops = Vec::new();
        let mut outcome = Ok(());
        for _ in 0..pages {
            match model.get_shops().await {
                Ok(page) => {
                    shops.extend(page);
                    if model.last_document().is_none() {
                        info!("Reached end of collection");
                        break;
                    }
                }
                Err(e) => {
                    screen.show_toast(&e.to_string());
                    outcome = Err(e);
                    break;
                }
            }
        }

        drop(model);
        let _ = binding.await;

        self.print_shops(&shops)?;
        outcome
    }

    async fn check(&self, config: &AppConfig) -> Result<()> {
        let mut checks = Vec::new();

        if let Some(feedly) = &config.feedly {
            feedly
                .auth_provider(reqwest::Client::new())?
                .access_token()
                .await?;
            checks.push(json!({ "component": "feedly", "stream_id": feedly.stream_id, "status": "SUCCEEDED" }));
        }

        if let Some(firestore) = &config.firestore {
            if let Some(auth) = &firestore.auth {
                auth.build(reqwest::Client::new(), DEFAULT_TOKEN_URL)
                    .access_token()
                    .await?;
            }
            checks.push(json!({
                "component": "firestore",
                "project_id": firestore.store.project_id,
                "collection": firestore.store.collection,
                "status": "SUCCEEDED"
            }));
        }

        for check in checks {
            match self.cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string(&check)?),
                OutputFormat::Pretty => println!(
                    "{}: {}",
                    check["component"].as_str().unwrap_or_default(),
                    check["status"].as_str().unwrap_or_default()
                ),
            }
        }
        Ok(())
    }

    fn print_feed(&self, items: &[FeedItem]) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                for item in items {
                    println!("{}", serde_json::to_string(item)?);
                }
            }
            OutputFormat::Pretty => {
                for row in render_feed(items) {
                    println!("{row}");
                }
            }
        }
        Ok(())
    }

    fn print_shops(&self, shops: &[Shop]) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                for shop in shops {
                    println!("{}", serde_json::to_string(shop)?);
                }
            }
            OutputFormat::Pretty => {
                for row in render_shops(shops) {
                    println!("{row}");
                }
            }
        }
        Ok(())
    }
}

/// Wire a feed view-model from config
pub fn feed_view_model(config: &AppConfig) -> Result<FeedViewModel> {
    let feedly = config.feedly()?;
    let http = Arc::new(HttpClient::with_config(
        config.http.client_config(&feedly.base_url),
    )?);

    let auth = feedly.auth_provider(http.inner().clone())?;
    let stream = FeedlyStreamClient::new(http, feedly.stream_id.clone(), feedly.count);

    Ok(FeedViewModel::new(auth, Arc::new(stream)))
}

/// Wire a shop model from config
pub fn shop_model(config: &AppConfig) -> Result<ShopModel> {
    let section = config.firestore()?;
    let http = Arc::new(HttpClient::with_config(
        config.http.client_config(&section.store.base_url),
    )?);

    let mut store = FirestoreStore::new(http.clone(), section.store.clone());
    if let Some(auth) = &section.auth {
        store = store.with_auth(auth.build(http.inner().clone(), DEFAULT_TOKEN_URL));
    }

    Ok(ShopModel::new(Arc::new(store)))
}
