//! Fetch pipeline: HTTP request, header validation, duplicate detection,
//! filename resolution, and the write to disk.
//!
//! # Features
//!
//! - Streamed body retrieval bounded by a single request timeout (10s default)
//! - Content-Type / Content-Length checks before the body is read
//! - MD5-based duplicate detection against the target directory
//! - Filenames from the URL, or synthesized from the digest
//! - Conflict-safe writes (numeric suffix, never overwrites)
//!
//! # Example
//!
//! ```no_run
//! use imgfetch_core::download::{FetchConfig, FetchRequest, Fetcher, FixedAnswer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Fetcher::from_config(FetchConfig::with_output_dir("./pics"))?;
//! let result = fetcher
//!     .fetch(&FetchRequest::new("https://example.com/cat.jpg"), &mut FixedAnswer(false))
//!     .await;
//! println!("{}", result.message);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
pub mod constants;
pub mod dedup;
mod error;
mod fetcher;
pub mod filename;
pub mod hash;
mod outcome;
pub mod validation;

pub use client::{HttpClient, read_body};
pub use config::FetchConfig;
pub use error::FetchError;
pub use fetcher::{Fetcher, FixedAnswer, Prompt};
pub use hash::ContentDigest;
pub use outcome::{FetchRequest, FetchResult, SavedImage};
pub use validation::{HeaderCheck, ValidationWarning};
