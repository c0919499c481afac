//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Defaults for optional values come from
//! the configuration layer.

use clap::Parser;
use std::path::PathBuf;

/// cfdiv - rating and tag statistics for recent Codeforces contests
///
/// Downloads the contest list and the problemset, keeps the most recent
/// finished contests of one division, and reports ratings and tags per
/// problem slot (A-F, with C1/C2 grouped as C).
///
/// Examples:
///   cfdiv
///   cfdiv --count 50 --category "Div. 3"
///   cfdiv --format json --no-charts
///   cfdiv --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Number of most recent matching contests to analyze [default: 200]
    #[arg(short = 'n', long, value_name = "COUNT", env = "CFDIV_COUNT")]
    pub count: Option<usize>,

    /// Substring a contest name must contain [default: "Div. 2"]
    #[arg(long, value_name = "TEXT")]
    pub category: Option<String>,

    /// Codeforces API root URL
    #[arg(long, value_name = "URL", env = "CFDIV_API_URL")]
    pub api_url: Option<String>,

    /// Directory to write chart images into [default: .]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of tags listed per problem in the console summary [default: 10]
    #[arg(long, value_name = "NUM")]
    pub top_tags: Option<usize>,

    /// Number of tags drawn per problem in the tag chart [default: 5]
    #[arg(long, value_name = "NUM")]
    pub chart_tags: Option<usize>,

    /// Summary format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .cfdiv.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .cfdiv.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text tables (default)
    #[default]
    Text,
    /// JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.count == Some(0) {
            return Err("Contest count must be at least 1".to_string());
        }

        if let Some(ref category) = self.category {
            if category.is_empty() {
                return Err("Category must not be empty".to_string());
            }
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.top_tags == Some(0) || self.chart_tags == Some(0) {
            return Err("Tag counts must be at least 1".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            count: None,
            category: None,
            api_url: None,
            output_dir: None,
            timeout: None,
            top_tags: None,
            chart_tags: None,
            format: OutputFormat::Text,
            no_charts: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "cfdiv",
            "-n",
            "50",
            "--category",
            "Div. 3",
            "--format",
            "json",
            "--no-charts",
        ])
        .unwrap();

        assert_eq!(args.count, Some(50));
        assert_eq!(args.category.as_deref(), Some("Div. 3"));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.no_charts);
    }

    #[test]
    fn test_validation_defaults_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_count() {
        let mut args = make_args();
        args.count = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.api_url = Some("codeforces.com/api".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_category() {
        let mut args = make_args();
        args.category = Some(String::new());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.count = Some(0);
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
