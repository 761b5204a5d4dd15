//! Error types for the fetch pipeline.
//!
//! Every way a single fetch can stop short of writing a file is a variant
//! here. The orchestrator converts them into a [`FetchResult`] at the per-URL
//! boundary, so none of these ever abort a batch.
//!
//! [`FetchResult`]: super::FetchResult

use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a single fetch before a file is written.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The input is not an absolute `http`/`https` URL.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
    },

    /// The server could not be reached (DNS failure, connection refused, TLS).
    #[error("connection error: could not reach {url}: {source}")]
    Connect {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The request failed after a connection was made (body read, redirects).
    #[error("request error fetching {url}: {source}")]
    Request {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the configured timeout.
    #[error("connection timeout: {url} took too long to respond")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-2xx response.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The user declined to continue after a content-type warning.
    #[error("download cancelled by user")]
    Cancelled,

    /// The fetched content already exists in the target directory.
    #[error("duplicate detected, existing file: {existing}")]
    Duplicate {
        /// Name of the existing file with identical content.
        existing: String,
    },

    /// Creating the target directory or writing the file failed.
    #[error("file system error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Classifies a reqwest error into timeout, connect, or generic request failure.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else if source.is_connect() {
            Self::Connect { url, source }
        } else {
            Self::Request { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a duplicate error naming the existing file.
    pub fn duplicate(existing: impl Into<String>) -> Self {
        Self::Duplicate {
            existing: existing.into(),
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// URL or path for context, which the source errors do not carry.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_timeout_display() {
        let error = FetchError::timeout("https://example.com/cat.jpg");
        let msg = error.to_string();
        assert!(msg.contains("timeout"), "Expected 'timeout' in: {msg}");
        assert!(msg.contains("https://example.com/cat.jpg"));
    }

    #[test]
    fn test_fetch_error_http_status_display() {
        let error = FetchError::http_status("https://example.com/cat.jpg", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(msg.contains("https://example.com/cat.jpg"));
    }

    #[test]
    fn test_fetch_error_duplicate_names_existing_file() {
        let msg = FetchError::duplicate("cat.jpg").to_string();
        assert_eq!(msg, "duplicate detected, existing file: cat.jpg");
    }

    #[test]
    fn test_fetch_error_cancelled_display() {
        assert_eq!(
            FetchError::Cancelled.to_string(),
            "download cancelled by user"
        );
    }

    #[test]
    fn test_fetch_error_io_display_keeps_reason() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let msg = FetchError::io(PathBuf::from("/tmp/cat.jpg"), io_error).to_string();
        assert!(msg.contains("/tmp/cat.jpg"), "Expected path in: {msg}");
        assert!(msg.contains("access denied"), "Expected reason in: {msg}");
    }

    #[test]
    fn test_fetch_error_invalid_url_display() {
        let msg = FetchError::invalid_url("not-a-url").to_string();
        assert!(msg.contains("invalid URL"));
        assert!(msg.contains("not-a-url"));
    }
}
