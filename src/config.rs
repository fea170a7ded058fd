//! Application configuration
//!
//! Loaded from a YAML or JSON file (chosen by extension), then patched from
//! the environment and validated.
//!
//! ```yaml
//! feedly:
//!   stream_id: feed/https://blog.rust-lang.org/feed.xml
//!   count: 20
//!   auth:
//!     type: static
//!     access_token: A1b2...
//! firestore:
//!   project_id: my-shop-app
//!   collection: shops
//!   order_by: name
//!   page_size: 20
//! http:
//!   timeout_secs: 30
//!   rate_limit:
//!     requests_per_second: 5
//!     burst_size: 5
//! ```

use crate::auth::{token_url_for, AccessTokenProvider, AuthConfig};
use crate::error::{Error, Result, ResultExt};
use crate::feed::DEFAULT_FEEDLY_BASE_URL;
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::shop::FirestoreConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable that overrides the feed credential
pub const ACCESS_TOKEN_ENV: &str = "FEEDLY_ACCESS_TOKEN";

/// Largest page Feedly will return
const MAX_STREAM_COUNT: u32 = 1000;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Feed workflow settings
    #[serde(default)]
    pub feedly: Option<FeedlyConfig>,

    /// Shop workflow settings
    #[serde(default)]
    pub firestore: Option<FirestoreSection>,

    /// Shared HTTP settings
    #[serde(default)]
    pub http: HttpSettings,
}

/// Feedly stream settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedlyConfig {
    #[serde(default = "default_feedly_base_url")]
    pub base_url: String,

    /// Stream to page through (`feed/<url>`, `user/<id>/category/<name>`, ...)
    pub stream_id: String,

    /// Items per page
    #[serde(default = "default_count")]
    pub count: u32,

    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

impl FeedlyConfig {
    /// Credential provider for the stream
    ///
    /// The refresh flow talks to the same host as the stream unless the
    /// auth section names its own `token_url`.
    pub fn auth_provider(&self, http_client: reqwest::Client) -> Result<Arc<dyn AccessTokenProvider>> {
        let auth = self
            .auth
            .as_ref()
            .ok_or_else(|| Error::missing_field("feedly.auth"))?;
        Ok(auth.build(http_client, &token_url_for(&self.base_url)))
    }
}

fn default_feedly_base_url() -> String {
    DEFAULT_FEEDLY_BASE_URL.to_string()
}

fn default_count() -> u32 {
    20
}

/// Firestore settings plus an optional credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirestoreSection {
    #[serde(flatten)]
    pub store: FirestoreConfig,

    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            rate_limit: None,
        }
    }
}

impl HttpSettings {
    /// Client config for requests against `base_url`
    pub fn client_config(&self, base_url: &str) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(base_url)
            .timeout(Duration::from_secs(self.timeout_secs));

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(rate_limit) = &self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }

        builder.build()
    }
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Load, apply environment overrides, and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without touching the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    /// Parse YAML
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Parse JSON
    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Patch settings from environment lookups
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(ACCESS_TOKEN_ENV).filter(|t| !t.is_empty()) {
            if let Some(feedly) = self.feedly.as_mut() {
                feedly.auth = Some(AuthConfig::static_token(token));
            }
        }
    }

    /// Check required fields and value ranges
    pub fn validate(&self) -> Result<()> {
        if self.feedly.is_none() && self.firestore.is_none() {
            return Err(Error::config(
                "Nothing to fetch: configure `feedly`, `firestore`, or both",
            ));
        }

        if let Some(feedly) = &self.feedly {
            if feedly.stream_id.trim().is_empty() {
                return Err(Error::missing_field("feedly.stream_id"));
            }
            if feedly.count == 0 || feedly.count > MAX_STREAM_COUNT {
                return Err(Error::invalid_value(
                    "feedly.count",
                    format!("must be between 1 and {MAX_STREAM_COUNT}"),
                ));
            }
            if feedly.auth.is_none() {
                return Err(Error::missing_field(format!(
                    "feedly.auth (or set {ACCESS_TOKEN_ENV})"
                )));
            }
        }

        if let Some(firestore) = &self.firestore {
            if firestore.store.project_id.trim().is_empty() {
                return Err(Error::missing_field("firestore.project_id"));
            }
            if firestore.store.page_size == 0 {
                return Err(Error::invalid_value(
                    "firestore.page_size",
                    "must be greater than 0",
                ));
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// The feed section, or an error naming it
    pub fn feedly(&self) -> Result<&FeedlyConfig> {
        self.feedly
            .as_ref()
            .ok_or_else(|| Error::missing_field("feedly"))
    }

    /// The Firestore section, or an error naming it
    pub fn firestore(&self) -> Result<&FirestoreSection> {
        self.firestore
            .as_ref()
            .ok_or_else(|| Error::missing_field("firestore"))
    }
}
