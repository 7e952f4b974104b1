// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::{Parser, ValueEnum};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::config::ConfigParameter;

pub const BANNER: &str = r#"
   _____ __           __
  / ___// /___ ______/ /_  ___  _____
  \__ \/ / __ `/ ___/ __ \/ _ \/ ___/
 ___/ / / /_/ (__  ) / / /  __/ /
/____/_/\__,_/____/_/ /_/\___/_/
"#;

const AFTER_HELP: &str = "\
Every target is requested with GET and POST, unmodified and with nine path
variants: trailing slash, null byte, trailing dot, double slash, backslash,
encoded slash, encoded backslash, double and triple encoded slash. A variant is
reported when its response size differs from the unmodified URL and its status
is below 400 or at least 500.

EXAMPLES:
  slasher -u https://example.com/path/to/test
  slasher -u urls.txt
  slasher --follow -u https://example.com/path/to/test
  cat urls.txt | slasher -u -";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    after_help = AFTER_HELP,
)]
pub struct Cli {
    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL_OR_FILE",
        help = "URL to test, file with one URL per line, or - for stdin"
    )]
    pub url: Option<String>,

    #[arg(value_name = "INPUT", conflicts_with = "url")]
    pub input: Option<String>,

    #[arg(
        long = "follow",
        help = "Follow redirects, keeping the original method on every hop"
    )]
    pub follow: bool,

    #[arg(long = "max-redirects", default_value_t = 10)]
    pub max_redirects: usize,

    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "HTTP request timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(
        short = 'w',
        long = "workers",
        default_value_t = 10,
        help = "Number of targets probed concurrently"
    )]
    pub workers: usize,

    #[arg(short = 'r', long = "rate-limit", help = "Maximum requests per second")]
    pub rate_limit: Option<u32>,

    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long = "no-color", help = "Disable colored output")]
    pub no_color: bool,

    #[arg(short = 'q', long = "quiet", help = "Hide the banner and progress bar")]
    pub quiet: bool,

    #[arg(
        short = 's',
        long = "suppress-stats",
        help = "Suppress scan summary and statistics"
    )]
    pub suppress_stats: bool,

    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn target(&self) -> Option<&str> {
        self.url.as_deref().or(self.input.as_deref())
    }

    pub fn to_config(&self) -> ConfigParameter {
        let mut config = ConfigParameter::new();
        config.set_follow_redirects(self.follow);
        config.set_max_redirects(self.max_redirects);
        config.set_timeout(Duration::from_secs(self.timeout));
        config.set_workers(self.workers);
        config.set_rate_limit(self.rate_limit.and_then(NonZeroU32::new));
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["slasher", "-u", "http://example.com/admin"]).unwrap();
        assert_eq!(cli.target(), Some("http://example.com/admin"));
        assert_eq!(cli.format, OutputFormat::Text);

        let config = cli.to_config();
        assert!(!config.follow_redirects());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.workers(), 10);
        assert!(config.rate_limit().is_none());
    }

    #[test]
    fn test_positional_input() {
        let cli = Cli::try_parse_from(["slasher", "--follow", "urls.txt"]).unwrap();
        assert_eq!(cli.target(), Some("urls.txt"));
        assert!(cli.to_config().follow_redirects());
    }

    #[test]
    fn test_url_and_positional_conflict() {
        assert!(Cli::try_parse_from(["slasher", "-u", "a", "b"]).is_err());
    }

    #[test]
    fn test_no_input() {
        let cli = Cli::try_parse_from(["slasher"]).unwrap();
        assert!(cli.target().is_none());
    }

    #[test]
    fn test_scan_options() {
        let cli = Cli::try_parse_from([
            "slasher",
            "-u",
            "urls.txt",
            "-t",
            "5",
            "-w",
            "3",
            "-r",
            "0",
            "--max-redirects",
            "2",
            "--format",
            "json",
        ])
        .unwrap();
        let config = cli.to_config();

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.workers(), 3);
        assert_eq!(config.max_redirects(), 2);
        assert!(config.rate_limit().is_none());
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    fn test_timeout_must_be_positive(#[case] value: &str) {
        let result = Cli::try_parse_from(["slasher", "-u", "http://example.com/", "-t", value]);
        assert!(result.is_err());
    }
}
