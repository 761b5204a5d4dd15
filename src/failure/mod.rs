//! Failure classification and user-facing labels for fetch outcomes.

use crate::download::FetchError;

/// Why a fetch did not produce a new file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureKind {
    /// Connection refused, DNS failure, timeout, or a broken transfer.
    Network,
    /// The server answered with a non-2xx status.
    HttpStatus,
    /// The input was not an `http`/`https` URL.
    InvalidUrl,
    /// The user declined after a content-type warning.
    Cancelled,
    /// Identical content already exists in the target directory.
    Duplicate,
    /// Creating the directory or writing the file failed.
    Filesystem,
    /// A fault that none of the other kinds describe.
    Unexpected,
}

impl FailureKind {
    /// Classifies a fetch error.
    #[must_use]
    pub fn of(error: &FetchError) -> Self {
        match error {
            FetchError::Connect { .. } | FetchError::Request { .. } | FetchError::Timeout { .. } => {
                Self::Network
            }
            FetchError::HttpStatus { .. } => Self::HttpStatus,
            FetchError::InvalidUrl { .. } => Self::InvalidUrl,
            FetchError::Cancelled => Self::Cancelled,
            FetchError::Duplicate { .. } => Self::Duplicate,
            FetchError::Io { .. } => Self::Filesystem,
        }
    }

    /// True when the URL was deliberately not saved rather than failing to fetch.
    #[must_use]
    pub fn is_skip(self) -> bool {
        matches!(self, Self::Duplicate | Self::Cancelled)
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        if self.is_skip() { "⊘" } else { "✗" }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::HttpStatus => "HTTP error",
            Self::InvalidUrl => "invalid URL",
            Self::Cancelled => "cancelled",
            Self::Duplicate => "duplicate skipped",
            Self::Filesystem => "file system error",
            Self::Unexpected => "unexpected error",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_classifies_each_error_variant() {
        assert_eq!(
            FailureKind::of(&FetchError::timeout("https://example.com/a.png")),
            FailureKind::Network
        );
        assert_eq!(
            FailureKind::of(&FetchError::http_status("https://example.com/a.png", 500)),
            FailureKind::HttpStatus
        );
        assert_eq!(
            FailureKind::of(&FetchError::invalid_url("nope")),
            FailureKind::InvalidUrl
        );
        assert_eq!(FailureKind::of(&FetchError::Cancelled), FailureKind::Cancelled);
        assert_eq!(
            FailureKind::of(&FetchError::duplicate("a.png")),
            FailureKind::Duplicate
        );
        let io = std::io::Error::other("disk full");
        assert_eq!(
            FailureKind::of(&FetchError::io(PathBuf::from("a.png"), io)),
            FailureKind::Filesystem
        );
    }

    #[test]
    fn test_skips_are_distinct_from_failures() {
        assert!(FailureKind::Duplicate.is_skip());
        assert!(FailureKind::Cancelled.is_skip());
        assert!(!FailureKind::Network.is_skip());
        assert_ne!(FailureKind::Duplicate.icon(), FailureKind::Network.icon());
    }
}
