//! Error types for feedly-pager
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use reqwest::StatusCode;
use thiserror::Error;

/// Classification of a failed feed API call
///
/// The `Display` form is the human-readable message surfaced to the user
/// (it ends up in the feed view-model's error text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Connection refused, DNS failure, timeout, etc.
    Network,
    /// 401 / 403 from the API
    Unauthorized,
    /// 429 from the API
    RateLimited,
    /// Any other 4xx
    BadRequest,
    /// 5xx
    Server,
    /// Response body could not be decoded
    Decode,
    /// Anything we could not classify
    Unknown,
}

impl ApiErrorKind {
    /// Human-readable message for this kind
    pub fn message(self) -> &'static str {
        match self {
            Self::Network => "NetworkError",
            Self::Unauthorized => "UnauthorizedError",
            Self::RateLimited => "RateLimitError",
            Self::BadRequest => "BadRequestError",
            Self::Server => "ServerError",
            Self::Decode => "DecodeError",
            Self::Unknown => "UnknownError",
        }
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 | 403 => Self::Unauthorized,
            429 => Self::RateLimited,
            400..=499 => Self::BadRequest,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }

    /// Classify a transport-level failure
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode
        } else if let Some(status) = err.status() {
            Self::from_status(status)
        } else if err.is_timeout() || err.is_connect() || err.is_request() {
            Self::Network
        } else {
            Self::Unknown
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// The main error type for feedly-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Token refresh failed: {message}")]
    TokenRefresh { message: String },

    // ============================================================================
    // Feed API Errors
    // ============================================================================
    #[error("{0}")]
    Api(ApiErrorKind),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Document Store Errors
    // ============================================================================
    #[error(transparent)]
    Store(#[from] anyhow::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Api(ApiErrorKind::from_transport(&err))
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a feed API error
    pub fn api(kind: ApiErrorKind) -> Self {
        Self::Api(kind)
    }

    /// The API error kind, if this is a classified feed API failure
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Self::Api(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// Result type alias for feedly-pager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
