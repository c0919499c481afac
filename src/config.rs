//! Configuration file handling.
//!
//! This module handles loading `.cfdiv.toml` and merging it with
//! command-line arguments.

use crate::api::client::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".cfdiv.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Contest selection settings.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Which contests are analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Substring a contest name must contain.
    #[serde(default = "default_category")]
    pub category: String,

    /// Number of most recent matching contests to keep.
    #[serde(default = "default_count")]
    pub count: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            category: default_category(),
            count: default_count(),
        }
    }
}

fn default_category() -> String {
    "Div. 2".to_string()
}

fn default_count() -> usize {
    200
}

/// Codeforces API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    120 // problemset.problems is several megabytes
}

/// Summary and chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory chart images are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Tags listed per problem in the console summary.
    #[serde(default = "default_top_tags")]
    pub top_tags: usize,

    /// Tags drawn per problem in the tag chart.
    #[serde(default = "default_chart_tags")]
    pub chart_tags: usize,

    /// Render chart images.
    #[serde(default = "default_true")]
    pub charts: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            top_tags: default_top_tags(),
            chart_tags: default_chart_tags(),
            charts: true,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_top_tags() -> usize {
    10
}

fn default_chart_tags() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.cfdiv.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given on the command line (or through their env vars)
    /// override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(count) = args.count {
            self.selection.count = count;
        }
        if let Some(ref category) = args.category {
            self.selection.category = category.clone();
        }

        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }

        if let Some(ref dir) = args.output_dir {
            self.report.output_dir = dir.clone();
        }
        if let Some(n) = args.top_tags {
            self.report.top_tags = n;
        }
        if let Some(n) = args.chart_tags {
            self.report.chart_tags = n;
        }

        // Flags always override
        if args.no_charts {
            self.report.charts = false;
        }
    }

    /// Check values that may have come from the file.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.selection.count > 0, "selection.count must be at least 1");
        anyhow::ensure!(
            !self.selection.category.is_empty(),
            "selection.category must not be empty"
        );
        anyhow::ensure!(
            self.api.timeout_seconds > 0,
            "api.timeout_seconds must be at least 1"
        );
        anyhow::ensure!(
            self.report.top_tags > 0 && self.report.chart_tags > 0,
            "report.top_tags and report.chart_tags must be at least 1"
        );
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
