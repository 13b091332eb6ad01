//! Upstream ICS fetching.
//!
//! [`CalendarFetcher::fetch`] retrieves one feed and classifies the result as a
//! [`FetchOutcome`]. [`CalendarFetcher::fetch_all`] drives every configured
//! feed at once on the current task and keeps registry order in its output, so
//! one slow or failing feed never affects another feed's entry.

use reqwest::StatusCode;
use shared::CalendarInfo;
use std::time::Duration;
use thiserror::Error;

use crate::registry::{CalendarSource, SourceRegistry};

/// Result of fetching a single feed. Payloads are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success { payload: String },
    Failure { reason: String },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A fetch outcome tagged with the public metadata of its source.
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub info: CalendarInfo,
    pub outcome: FetchOutcome,
}

/// Why a fetch failed. Rendered into the `reason` of a failed outcome.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Upstream answered with a non-2xx status
    #[error("HTTP {}", .0.as_u16())]
    Status(StatusCode),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// DNS, connect, TLS or body read failure
    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, Clone)]
pub struct CalendarFetcher {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl CalendarFetcher {
    /// Build a fetcher. With `timeout` unset a hung upstream keeps its own
    /// request open indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            timeout,
        })
    }

    pub async fn fetch(&self, source: &CalendarSource) -> FetchOutcome {
        match self.try_fetch(source).await {
            Ok(payload) => {
                tracing::debug!(
                    calendar = %source.id,
                    bytes = payload.len(),
                    "Fetched {}",
                    source.name
                );
                FetchOutcome::Success { payload }
            }
            Err(err) => {
                tracing::warn!(calendar = %source.id, "Failed to fetch {}: {}", source.name, err);
                FetchOutcome::Failure {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Fetch every source in the registry concurrently.
    ///
    /// All requests are issued before any is awaited, so total latency tracks
    /// the slowest feed rather than the sum. The returned vector has one entry
    /// per source, in registry order.
    pub async fn fetch_all(&self, registry: &SourceRegistry) -> Vec<SourceOutcome> {
        let tasks = registry.all().iter().map(|source| async move {
            SourceOutcome {
                info: source.info(),
                outcome: self.fetch(source).await,
            }
        });

        let outcomes = futures::future::join_all(tasks).await;

        let failed = outcomes.iter().filter(|o| !o.outcome.is_success()).count();
        tracing::info!("Fetched {} calendar(s), {} failed", outcomes.len(), failed);

        outcomes
    }

    async fn try_fetch(&self, source: &CalendarSource) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        response.text().await.map_err(|err| self.classify(err))
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        match self.timeout {
            Some(timeout) if err.is_timeout() => FetchError::Timeout(timeout),
            _ => FetchError::Transport(describe(err)),
        }
    }
}

/// Flatten a reqwest error and its causes into one line, without the feed url.
fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut cause = std::error::Error::source(&err);
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}
