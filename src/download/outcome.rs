//! Request and result types exchanged with the fetch orchestrator.

use std::path::PathBuf;

use super::error::FetchError;
use super::hash::ContentDigest;
use super::validation::ValidationWarning;
use crate::failure::FailureKind;

const BYTES_PER_KB: f64 = 1024.0;

/// One user-supplied URL to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    url: String,
}

impl FetchRequest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl From<&str> for FetchRequest {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

/// A file the pipeline wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Final file name inside the target directory.
    pub filename: String,
    /// Full path of the written file.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes: u64,
    /// Digest of the written content.
    pub digest: ContentDigest,
}

/// Outcome of one fetch, success or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// Whether a new file was written.
    pub success: bool,
    /// Human-readable status line.
    pub message: String,
    /// Name of the written file.
    pub filename: Option<String>,
    /// Size of the written file in bytes.
    pub byte_size: Option<u64>,
    /// Full path of the written file.
    pub path: Option<PathBuf>,
    /// Why no file was written.
    pub failure: Option<FailureKind>,
    /// Header warnings raised along the way.
    pub warnings: Vec<ValidationWarning>,
}

impl FetchResult {
    /// Result for a successfully written image.
    #[must_use]
    pub fn saved(image: SavedImage, warnings: Vec<ValidationWarning>) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let kb = image.bytes as f64 / BYTES_PER_KB;
        Self {
            success: true,
            message: format!("Successfully fetched: {} ({kb:.2} KB)", image.filename),
            filename: Some(image.filename),
            byte_size: Some(image.bytes),
            path: Some(image.path),
            failure: None,
            warnings,
        }
    }

    /// Result for a fetch stopped by `error`.
    #[must_use]
    pub fn failed(error: &FetchError, warnings: Vec<ValidationWarning>) -> Self {
        Self::not_saved(FailureKind::of(error), error.to_string(), warnings)
    }

    /// Result for a fault outside the error taxonomy.
    #[must_use]
    pub fn unexpected(detail: &str, warnings: Vec<ValidationWarning>) -> Self {
        Self::not_saved(
            FailureKind::Unexpected,
            format!("unexpected error: {detail}"),
            warnings,
        )
    }

    fn not_saved(kind: FailureKind, message: String, warnings: Vec<ValidationWarning>) -> Self {
        Self {
            success: false,
            message,
            filename: None,
            byte_size: None,
            path: None,
            failure: Some(kind),
            warnings,
        }
    }
}
