//! Image Fetcher Core Library
//!
//! Fetches images over HTTP into a local directory. Each URL goes through a
//! small pipeline: request, header validation, duplicate detection by content
//! digest, filename resolution, and a conflict-safe write.
//!
//! # Architecture
//!
//! - [`download`] - HTTP client, validation, hashing, dedup, naming, orchestration
//! - [`failure`] - Classification of unsuccessful fetches for reporting
//! - [`shell`] - Interactive single/batch prompt loop

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod failure;
pub mod shell;
mod user_agent;

// Re-export commonly used types
pub use download::{
    ContentDigest, FetchConfig, FetchError, FetchRequest, FetchResult, Fetcher, FixedAnswer,
    HttpClient, Prompt, ValidationWarning,
};
pub use failure::FailureKind;
pub use shell::{SessionSummary, Shell};
