//! Per-session fetch configuration.

use std::path::PathBuf;
use std::time::Duration;

use super::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_SIZE_WARNING_BYTES, DEFAULT_TIMEOUT};

/// Settings the orchestrator needs for every fetch.
///
/// Passed in explicitly so tests can point fetches at a temporary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Directory new images are written to; created on first write.
    pub output_dir: PathBuf,
    /// Reject content whose digest matches a file already in `output_dir`.
    pub check_duplicates: bool,
    /// Declared Content-Length above which a size warning is raised.
    pub size_warning_bytes: u64,
    /// Request timeout covering connect and body transfer.
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            check_duplicates: true,
            size_warning_bytes: DEFAULT_SIZE_WARNING_BYTES,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl FetchConfig {
    /// Default settings writing into `output_dir`.
    #[must_use]
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}
