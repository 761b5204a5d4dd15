//! Fetch orchestrator: one URL from request to file on disk.
//!
//! # Pipeline
//!
//! 1. Parse the URL and send a GET (bounded by the configured timeout)
//! 2. Validate response headers before touching the body; a non-image
//!    Content-Type asks the [`Prompt`] for confirmation
//! 3. Read the body, hash it once, and reject it if identical content is
//!    already in the target directory
//! 4. Derive a filename and resolve conflicts with a numeric suffix
//! 5. Create the directory if needed and write the file (never overwriting)
//!
//! Every error and panic is caught at the end of [`Fetcher::fetch`] and turned
//! into a [`FetchResult`], so a bad URL never stops a batch.

use std::panic::AssertUnwindSafe;
use std::path::Path;

use futures_util::FutureExt;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::client::{HttpClient, read_body};
use super::config::FetchConfig;
use super::dedup::find_duplicate;
use super::error::FetchError;
use super::filename::{derive_filename, resolve_unique_path};
use super::hash::ContentDigest;
use super::outcome::{FetchRequest, FetchResult, SavedImage};
use super::validation::{ValidationWarning, check_headers};

/// User interaction needed while fetching.
pub trait Prompt {
    /// Shows a header warning to the user.
    fn warn(&mut self, warning: &ValidationWarning);

    /// Asks whether to continue despite `warning`. `false` cancels the fetch.
    fn confirm(&mut self, warning: &ValidationWarning) -> bool;
}

/// A [`Prompt`] that never shows anything and always gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn warn(&mut self, _warning: &ValidationWarning) {}

    fn confirm(&mut self, _warning: &ValidationWarning) -> bool {
        self.0
    }
}

/// Drives single fetches with a shared HTTP client and configuration.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: HttpClient,
    config: FetchConfig,
}

impl Fetcher {
    #[must_use]
    pub fn new(client: HttpClient, config: FetchConfig) -> Self {
        Self { client, config }
    }

    /// Builds a fetcher with a client honoring `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns the reqwest build error if the HTTP client cannot be created.
    pub fn from_config(config: FetchConfig) -> Result<Self, reqwest::Error> {
        let client = HttpClient::with_timeout(config.timeout)?;
        Ok(Self::new(client, config))
    }

    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches one URL and reports what happened.
    ///
    /// Never fails: errors and panics become unsuccessful results.
    #[instrument(skip(self, request, prompt), fields(url = %request.url()))]
    pub async fn fetch(&self, request: &FetchRequest, prompt: &mut dyn Prompt) -> FetchResult {
        let mut warnings = Vec::new();
        let outcome = AssertUnwindSafe(self.run(request.url(), prompt, &mut warnings))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(image)) => {
                info!(filename = %image.filename, bytes = image.bytes, "image saved");
                FetchResult::saved(image, warnings)
            }
            Ok(Err(error)) => {
                warn!(error = %error, "fetch did not complete");
                FetchResult::failed(&error, warnings)
            }
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "fetch aborted".to_string());
                warn!(detail = %detail, "fetch panicked");
                FetchResult::unexpected(&detail, warnings)
            }
        }
    }

    async fn run(
        &self,
        url: &str,
        prompt: &mut dyn Prompt,
        warnings: &mut Vec<ValidationWarning>,
    ) -> Result<SavedImage, FetchError> {
        let parsed = parse_http_url(url)?;

        debug!("requesting");
        let response = self.client.get(url).await?;

        let check = check_headers(response.headers(), self.config.size_warning_bytes);
        for warning in &check.warnings {
            warn!(warning = %warning, "response header warning");
            prompt.warn(warning);
        }
        warnings.extend(check.warnings.iter().cloned());

        if let Some(warning) = check.confirmation_needed() {
            debug!("awaiting confirmation");
            if !prompt.confirm(warning) {
                info!("cancelled by user");
                return Err(FetchError::Cancelled);
            }
        }

        let body = read_body(response, url).await?;
        let digest = ContentDigest::of_bytes(&body);

        if self.config.check_duplicates
            && let Some(existing) = scan_for_duplicate(&self.config.output_dir, digest).await
        {
            return Err(FetchError::duplicate(existing));
        }

        let filename = derive_filename(&parsed, check.content_type.as_deref(), &digest);
        let path = resolve_unique_path(&self.config.output_dir, &filename);
        write_new_file(&self.config.output_dir, &path, &body).await?;

        let filename = path
            .file_name()
            .map_or(filename, |name| name.to_string_lossy().into_owned());
        Ok(SavedImage {
            filename,
            path,
            bytes: body.len() as u64,
            digest,
        })
    }
}

fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
    if matches!(parsed.scheme(), "http" | "https") {
        Ok(parsed)
    } else {
        Err(FetchError::invalid_url(url))
    }
}

/// Runs the blocking directory scan on tokio's blocking pool.
///
/// A panic inside the scan is resumed here so the per-URL boundary in
/// [`Fetcher::fetch`] reports it.
async fn scan_for_duplicate(dir: &Path, digest: ContentDigest) -> Option<String> {
    let dir = dir.to_path_buf();
    match tokio::task::spawn_blocking(move || find_duplicate(&dir, &digest)).await {
        Ok(found) => found,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            warn!(error = %e, "duplicate scan did not finish, treating as no duplicate");
            None
        }
    }
}

/// Creates `dir` if needed and writes `bytes` to the not-yet-existing `path`.
///
/// A partially written file is removed before the error is returned.
async fn write_new_file(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), FetchError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| FetchError::io(dir, e))?;

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| FetchError::io(path, e))?;

    let mut writer = BufWriter::new(file);
    let written: std::io::Result<()> = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    }
    .await;

    if let Err(e) = written {
        debug!(path = %path.display(), "cleaning up partial file after error");
        let _ = tokio::fs::remove_file(path).await;
        return Err(FetchError::io(path, e));
    }
    Ok(())
}
