//! HTTP client for the contest and problem feeds.

use crate::models::{ApiEnvelope, ContestRecord, ProblemRecord, ProblemSet};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Default Codeforces API root.
pub const DEFAULT_BASE_URL: &str = "https://codeforces.com/api";

/// Failure to obtain a feed. Always fatal to the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("cannot connect to {url}")]
    Connect { url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Http {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{method} reported status {status}: {comment}")]
    Api {
        method: String,
        status: String,
        comment: String,
    },

    #[error("{method} returned no result")]
    MissingResult { method: String },

    #[error("failed to decode {method} response: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Client for the two feeds the analysis consumes.
pub struct FeedClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout_seconds: u64,
    show_progress: bool,
}

impl FeedClient {
    /// Create a client rooted at `base_url` (e.g. `https://codeforces.com/api`).
    pub fn new(base_url: &str, timeout_seconds: u64, show_progress: bool) -> Result<Self, FetchError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("cfdiv/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            http_client,
            base_url,
            timeout_seconds,
            show_progress,
        })
    }

    /// Fetch every contest from `contest.list`.
    pub async fn fetch_contests(&self) -> Result<Vec<ContestRecord>, FetchError> {
        let contests: Vec<ContestRecord> = self.call("contest.list").await?;
        info!("Fetched {} contests", contests.len());
        Ok(contests)
    }

    /// Fetch every problem from `problemset.problems`.
    pub async fn fetch_problems(&self) -> Result<Vec<ProblemRecord>, FetchError> {
        let problem_set: ProblemSet = self.call("problemset.problems").await?;
        info!("Fetched {} problems", problem_set.problems.len());
        Ok(problem_set.problems)
    }

    /// Call an API method and unwrap its envelope.
    async fn call<T: DeserializeOwned>(&self, method: &str) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, method);
        debug!("GET {}", url);

        let spinner = self.spinner(method);
        let result = self.get_body(&url).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        let (status, body) = result?;

        // The API reports failures as a FAILED envelope, usually with HTTP 400.
        let envelope: ApiEnvelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(FetchError::Http { url, status }),
            Err(source) => {
                return Err(FetchError::Decode {
                    method: method.to_string(),
                    source,
                })
            }
        };

        if envelope.status != "OK" {
            return Err(FetchError::Api {
                method: method.to_string(),
                status: envelope.status,
                comment: envelope.comment.unwrap_or_default(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Http { url, status });
        }

        envelope.result.ok_or_else(|| FetchError::MissingResult {
            method: method.to_string(),
        })
    }

    async fn get_body(&self, url: &str) -> Result<(reqwest::StatusCode, String), FetchError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(url, e))?;
        debug!("{} -> {} ({} bytes)", url, status, body.len());

        Ok((status, body))
    }

    fn classify(&self, url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                seconds: self.timeout_seconds,
            }
        } else if e.is_connect() {
            FetchError::Connect {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: e,
            }
        }
    }

    fn spinner(&self, method: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Downloading {}", method));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}
