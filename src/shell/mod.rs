//! Interactive prompt loop around the fetch pipeline.
//!
//! The shell is generic over its input and output so tests can drive it with
//! in-memory buffers instead of a terminal.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::download::{FetchRequest, FetchResult, Fetcher, Prompt, ValidationWarning};
use crate::failure::FailureKind;

const RULE_WIDTH: usize = 60;

/// Tally of one interactive session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    attempted: usize,
    succeeded: usize,
    not_saved: BTreeMap<FailureKind, usize>,
}

impl SessionSummary {
    /// Adds one fetch outcome.
    pub fn record(&mut self, result: &FetchResult) {
        self.attempted += 1;
        if result.success {
            self.succeeded += 1;
        } else {
            let kind = result.failure.unwrap_or(FailureKind::Unexpected);
            *self.not_saved.entry(kind).or_insert(0) += 1;
        }
    }

    #[must_use]
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// URLs deliberately not saved (duplicates, cancellations).
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.not_saved
            .iter()
            .filter(|(kind, _)| kind.is_skip())
            .map(|(_, count)| count)
            .sum()
    }

    /// URLs that failed to fetch or save.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded - self.skipped()
    }

    /// Count of outcomes of one kind.
    #[must_use]
    pub fn count(&self, kind: FailureKind) -> usize {
        self.not_saved.get(&kind).copied().unwrap_or(0)
    }
}

/// Line-oriented interactive front end.
#[derive(Debug)]
pub struct Shell<R, W> {
    fetcher: Fetcher,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    #[must_use]
    pub fn new(fetcher: Fetcher, input: R, output: W) -> Self {
        Self {
            fetcher,
            input,
            output,
        }
    }

    /// Consumes the shell and returns its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs one session: asks for single or batch mode, fetches, summarizes.
    ///
    /// # Errors
    ///
    /// Only terminal I/O errors are returned; fetch failures are reported
    /// as output and counted in the summary.
    pub async fn run(&mut self) -> io::Result<SessionSummary> {
        self.banner()?;
        write!(
            self.output,
            "Would you like to download multiple images? (y/n): "
        )?;
        self.output.flush()?;
        let multiple = read_trimmed_line(&mut self.input)?.is_some_and(|answer| is_yes(&answer));

        if multiple {
            self.run_batch().await
        } else {
            self.run_single().await
        }
    }

    fn banner(&mut self) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "Image Fetcher")?;
        writeln!(
            self.output,
            "Fetch images into {}",
            self.fetcher.config().output_dir.display()
        )?;
        writeln!(self.output, "{rule}")
    }

    async fn run_single(&mut self) -> io::Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        write!(self.output, "\nPlease enter the image URL: ")?;
        self.output.flush()?;

        let Some(url) = read_trimmed_line(&mut self.input)?.filter(|url| !url.is_empty()) else {
            writeln!(self.output, "No URL provided. Exiting.")?;
            return Ok(summary);
        };

        writeln!(self.output)?;
        let result = self.fetch_one(&url).await?;
        summary.record(&result);
        Ok(summary)
    }

    async fn run_batch(&mut self) -> io::Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        writeln!(
            self.output,
            "\nEnter image URLs (one per line, empty line to finish):"
        )?;

        let mut urls = Vec::new();
        loop {
            write!(self.output, "URL {}: ", urls.len() + 1)?;
            self.output.flush()?;
            match read_trimmed_line(&mut self.input)? {
                Some(url) if !url.is_empty() => urls.push(url),
                _ => break,
            }
        }

        if urls.is_empty() {
            writeln!(self.output, "No URLs provided. Exiting.")?;
            return Ok(summary);
        }

        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.output, "\n{rule}")?;
        writeln!(self.output, "Fetching {} images...", urls.len())?;
        writeln!(self.output, "{rule}")?;

        let total = urls.len();
        for (index, url) in urls.iter().enumerate() {
            writeln!(self.output, "\n[{}/{total}]", index + 1)?;
            let result = self.fetch_one(url).await?;
            summary.record(&result);
        }

        writeln!(self.output, "\n{rule}")?;
        writeln!(
            self.output,
            "Summary: {}/{} images downloaded successfully",
            summary.succeeded(),
            summary.attempted()
        )?;
        for (kind, count) in &summary.not_saved {
            writeln!(self.output, "  {} {}: {count}", kind.icon(), kind.label())?;
        }
        writeln!(self.output, "{rule}")?;
        Ok(summary)
    }

    async fn fetch_one(&mut self, url: &str) -> io::Result<FetchResult> {
        writeln!(self.output, "→ Fetching image from: {url}")?;
        debug!(url = %url, "fetching");

        let Self {
            fetcher,
            input,
            output,
        } = self;
        let mut prompt = TerminalPrompt {
            input: &mut *input,
            output: &mut *output,
        };
        let result = fetcher.fetch(&FetchRequest::new(url), &mut prompt).await;

        match result.failure {
            None => {
                writeln!(output, "✓ {}", result.message)?;
                if let Some(path) = &result.path {
                    writeln!(output, "✓ Image saved to {}", path.display())?;
                }
            }
            Some(kind) => writeln!(output, "{} {}", kind.icon(), result.message)?,
        }
        Ok(result)
    }
}

/// [`Prompt`] backed by the shell's own input and output.
struct TerminalPrompt<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<'_, R, W> {
    fn warn(&mut self, warning: &ValidationWarning) {
        if let Err(e) = writeln!(self.output, "⚠ Warning: {warning}") {
            debug!(error = %e, "could not show warning on terminal");
        }
    }

    fn confirm(&mut self, _warning: &ValidationWarning) -> bool {
        if let Err(e) = write!(self.output, "Continue anyway? (y/n): ")
            .and_then(|()| self.output.flush())
        {
            debug!(error = %e, "could not prompt on terminal, declining");
            return false;
        }
        matches!(read_trimmed_line(&mut *self.input), Ok(Some(answer)) if is_yes(&answer))
    }
}

/// Reads one line without its trailing whitespace; `None` at end of input.
fn read_trimmed_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn is_yes(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
