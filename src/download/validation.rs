//! Response header validation before the body is consumed.
//!
//! Validation never rejects on its own. It reports warnings and flags when
//! the caller must ask the user before continuing.

use std::fmt;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A non-fatal problem found in response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Content-Type is present but is not an `image/*` type.
    NotAnImage {
        /// The declared content type, verbatim.
        content_type: String,
    },
    /// No Content-Type header was sent.
    MissingContentType,
    /// Declared Content-Length exceeds the configured threshold.
    LargeFile {
        /// Declared size in bytes.
        bytes: u64,
    },
}

impl ValidationWarning {
    /// Whether the user must confirm before the fetch may continue.
    #[must_use]
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, Self::NotAnImage { .. })
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnImage { content_type } => {
                write!(f, "Content-Type is '{content_type}', not an image type")
            }
            Self::MissingContentType => {
                f.write_str("no Content-Type declared, content type unknown")
            }
            Self::LargeFile { bytes } => {
                #[allow(clippy::cast_precision_loss)]
                let mb = *bytes as f64 / BYTES_PER_MB;
                write!(f, "Large file size ({mb:.2} MB)")
            }
        }
    }
}

/// Outcome of validating one response's headers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderCheck {
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Declared body length, if any and parseable.
    pub content_length: Option<u64>,
    /// Warnings in the order they were found.
    pub warnings: Vec<ValidationWarning>,
}

impl HeaderCheck {
    /// The warning that needs user confirmation, if any.
    #[must_use]
    pub fn confirmation_needed(&self) -> Option<&ValidationWarning> {
        self.warnings
            .iter()
            .find(|w| w.requires_confirmation())
    }
}

/// Validates declared content type and length against the size threshold.
#[must_use]
pub fn check_metadata(
    content_type: Option<&str>,
    content_length: Option<u64>,
    size_warning_bytes: u64,
) -> HeaderCheck {
    let content_type = content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .map(str::to_string);
    let mut warnings = Vec::new();

    match &content_type {
        Some(ct) if !is_image_media_type(ct) => warnings.push(ValidationWarning::NotAnImage {
            content_type: ct.clone(),
        }),
        Some(_) => {}
        None => warnings.push(ValidationWarning::MissingContentType),
    }

    if let Some(bytes) = content_length
        && bytes > size_warning_bytes
    {
        warnings.push(ValidationWarning::LargeFile { bytes });
    }

    HeaderCheck {
        content_type,
        content_length,
        warnings,
    }
}

/// Validates a response's header map.
#[must_use]
pub fn check_headers(headers: &HeaderMap, size_warning_bytes: u64) -> HeaderCheck {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let content_length = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    check_metadata(content_type, content_length, size_warning_bytes)
}

/// Returns the lowercased `type/subtype` part of a Content-Type value.
pub(crate) fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

fn is_image_media_type(content_type: &str) -> bool {
    essence(content_type).starts_with("image/")
}
