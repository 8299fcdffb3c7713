//! Error types for warmcache
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for warmcache
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable detail
        message: String,
    },

    /// A required config field is absent
    #[error("Missing required config field: {field}")]
    MissingConfigField {
        /// Dotted config path
        field: String,
    },

    /// YAML could not be parsed
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON could not be encoded or decoded
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Upstream Errors
    // ============================================================================
    /// Transport-level request failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx upstream response
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// A page in a collection walk could not be fetched
    #[error("Upstream unavailable at {url}: {reason}")]
    UpstreamUnavailable {
        /// URL that failed
        url: String,
        /// Failure detail
        reason: String,
    },

    /// A `Link` header entry that does not parse
    #[error("Malformed pagination entry: {entry}")]
    MalformedCursorEntry {
        /// The raw entry text
        entry: String,
    },

    /// URL could not be parsed or joined
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Cache Errors
    // ============================================================================
    /// Key is not in the resource catalog
    #[error("Resource '{key}' is not tracked")]
    ResourceNotTracked {
        /// Cache key
        key: String,
    },

    /// Key still absent after a miss-triggered refresh
    #[error("Resource '{key}' is still missing after refresh")]
    CacheMissAfterRefresh {
        /// Cache key
        key: String,
    },

    /// Stored blob is not a JSON array
    #[error("Cached entry for '{key}' could not be decoded: {message}")]
    CorruptEntry {
        /// Cache key
        key: String,
        /// Human-readable detail
        message: String,
    },

    /// Store unreachable or command failed
    #[error("Cache store unavailable: {message}")]
    StoreUnavailable {
        /// Human-readable detail
        message: String,
    },

    // ============================================================================
    // Server / I/O Errors
    // ============================================================================
    /// HTTP server could not start or failed while serving
    #[error("Server error: {message}")]
    Server {
        /// Human-readable detail
        message: String,
    },

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Error with added context
    #[error("{0}")]
    Other(String),
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Self::StoreUnavailable {
            message: err.to_string(),
        }
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

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an upstream unavailable error
    pub fn upstream(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a store unavailable error
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Create a not-tracked error
    pub fn not_tracked(key: impl Into<String>) -> Self {
        Self::ResourceNotTracked { key: key.into() }
    }

    /// Create a miss-after-refresh error
    pub fn miss_after_refresh(key: impl Into<String>) -> Self {
        Self::CacheMissAfterRefresh { key: key.into() }
    }

    /// Create a corrupt entry error
    pub fn corrupt(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorruptEntry {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a server error
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }
}

/// Result type alias for warmcache
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("upstream.base_url");
        assert_eq!(
            err.to_string(),
            "Missing required config field: upstream.base_url"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::miss_after_refresh("courses");
        assert_eq!(
            err.to_string(),
            "Resource 'courses' is still missing after refresh"
        );
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.with_context(|| "outer".to_string());
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
