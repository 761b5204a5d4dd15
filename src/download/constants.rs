//! Constants for the download module (timeouts, thresholds, buffer sizes).

use std::time::Duration;

/// Default request timeout, covering connect and body transfer (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Declared Content-Length above which a size warning is raised (50 MiB).
pub const DEFAULT_SIZE_WARNING_BYTES: u64 = 50 * 1024 * 1024;

/// Default target directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "Fetched_Images";

/// Read buffer used when hashing existing files.
pub const HASH_CHUNK_SIZE: usize = 8 * 1024;

/// Upper bound for body pre-allocation taken from Content-Length.
pub(crate) const MAX_BODY_PREALLOC: usize = 8 * 1024 * 1024;
