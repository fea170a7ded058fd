//! Auth configuration types

use super::provider::{AccessTokenProvider, RefreshTokenProvider, StaticToken};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Feedly's token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://cloud.feedly.com/v3/auth/token";

const TOKEN_PATH: &str = "/v3/auth/token";

/// Token endpoint served by the Feedly API at `base_url`
pub fn token_url_for(base_url: &str) -> String {
    format!("{}{TOKEN_PATH}", base_url.trim_end_matches('/'))
}

/// Authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// A fixed access token (Feedly developer token, service token)
    Static {
        /// The token sent as the bearer credential
        access_token: String,
    },

    /// OAuth2 refresh token flow
    Refresh {
        /// Token endpoint URL; defaults to the API host's endpoint
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_url: Option<String>,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Long-lived refresh token
        refresh_token: String,
    },
}

impl AuthConfig {
    /// Create a static token config
    pub fn static_token(token: impl Into<String>) -> Self {
        Self::Static {
            access_token: token.into(),
        }
    }

    /// Build the credential provider for this config
    ///
    /// A refresh config without its own `token_url` uses `default_token_url`.
    pub fn build(
        &self,
        http_client: reqwest::Client,
        default_token_url: &str,
    ) -> Arc<dyn AccessTokenProvider> {
        match self {
            Self::Static { access_token } => Arc::new(StaticToken::new(access_token.clone())),
            Self::Refresh {
                token_url,
                client_id,
                client_secret,
                refresh_token,
            } => Arc::new(RefreshTokenProvider::with_client(
                token_url.as_deref().unwrap_or(default_token_url),
                client_id.clone(),
                client_secret.clone(),
                refresh_token.clone(),
                http_client,
            )),
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
