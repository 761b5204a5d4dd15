//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use imgfetch_core::FetchConfig;
use imgfetch_core::download::constants::DEFAULT_OUTPUT_DIR;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Fetch images from URLs into a local directory.
///
/// Prompts for one URL or a batch of URLs, skips content that is already
/// stored, and never overwrites existing files.
#[derive(Parser, Debug)]
#[command(name = "imgfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory to save images into (created if missing)
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Save content even when an identical file already exists
    #[arg(long)]
    pub no_dedup: bool,

    /// Warn when the declared size exceeds this many megabytes (1-10240)
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..=10240))]
    pub max_size_mb: u64,

    /// Request timeout in seconds (1-300)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout: u64,
}

impl Args {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Fetch settings derived from the flags.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            output_dir: self.output_dir.clone(),
            check_duplicates: !self.no_dedup,
            size_warning_bytes: self.max_size_mb * BYTES_PER_MB,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_match_library_defaults() {
        let args = Args::try_parse_from(["imgfetch"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert_eq!(args.fetch_config(), FetchConfig::default());
        assert_eq!(args.default_log_level(), "warn");
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["imgfetch", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.default_log_level(), "debug");

        let args = Args::try_parse_from(["imgfetch", "-vvvv"]).unwrap();
        assert_eq!(args.default_log_level(), "trace");
    }

    #[test]
    fn test_cli_quiet_wins_over_verbose() {
        let args = Args::try_parse_from(["imgfetch", "-q", "-v"]).unwrap();
        assert_eq!(args.default_log_level(), "error");
    }

    #[test]
    fn test_cli_output_dir_and_no_dedup() {
        let args = Args::try_parse_from(["imgfetch", "-o", "/tmp/pics", "--no-dedup"]).unwrap();
        let config = args.fetch_config();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/pics"));
        assert!(!config.check_duplicates);
    }

    #[test]
    fn test_cli_size_and_timeout() {
        let args =
            Args::try_parse_from(["imgfetch", "--max-size-mb", "5", "--timeout", "30"]).unwrap();
        let config = args.fetch_config();
        assert_eq!(config.size_warning_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_cli_timeout_zero_rejected() {
        let err = Args::try_parse_from(["imgfetch", "--timeout", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_max_size_over_limit_rejected() {
        let err = Args::try_parse_from(["imgfetch", "--max-size-mb", "10241"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["imgfetch", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_rejects_positional_arguments() {
        let result = Args::try_parse_from(["imgfetch", "https://example.com/cat.jpg"]);
        assert!(result.is_err());
    }
}
