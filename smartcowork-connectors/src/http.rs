//! HTTP batch source for polled sensor snapshots
//!
//! Wraps the gateway's `GET /sensors/space/{id}` endpoint with a small
//! `ureq` client: connection reuse through one agent, JSON decoding into
//! the core's lenient [`RawReading`] shape, and exponential-backoff
//! retries for the failures worth retrying (transport errors, 5xx, 429).
//! Anything else surfaces as a typed [`HttpError`] for the feed to report
//! as a failed load — it never reaches the aggregator.

use std::time::Duration;

use async_trait::async_trait;
use smartcowork_core::RawReading;
use thiserror::Error;

use crate::{BatchSource, SourceError};

/// HTTP-specific errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or request error.
    #[error("request failed: {0}")]
    Request(String),

    /// Server returned a non-success status.
    #[error("server error {status}: {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body, when readable.
        message: String,
    },

    /// Response body was not the expected JSON array of readings.
    #[error("decode error: {0}")]
    Decode(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// HTTP configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the sensor gateway.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry attempts after the first failure.
    pub max_retries: u32,
    /// User agent string.
    pub user_agent: String,
}

impl HttpConfig {
    /// Create a new configuration with a base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            user_agent: format!("smartcowork/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the number of retries after the first failure.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Override the user agent string.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

/// Client for the per-space readings endpoint.
pub struct SpaceReadingsClient {
    config: HttpConfig,
    agent: ureq::Agent,
    space_id: i64,
}

impl SpaceReadingsClient {
    /// Create a new client for one space.
    pub fn new(config: HttpConfig, space_id: i64) -> Result<Self, HttpError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(HttpError::Config(
                "base URL must start with http:// or https://".into(),
            ));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            space_id,
        })
    }

    /// The space this client polls.
    pub fn space_id(&self) -> i64 {
        self.space_id
    }

    /// Fetch one snapshot of readings, retrying transient failures.
    pub async fn fetch(&self) -> Result<Vec<RawReading>, HttpError> {
        let url = format!(
            "{}/sensors/space/{}",
            self.config.base_url.trim_end_matches('/'),
            self.space_id,
        );

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Exponential backoff
                let delay = Duration::from_millis(100 * (1 << attempt));
                tokio::time::sleep(delay).await;
            }

            let response = self
                .agent
                .get(&url)
                .set("Accept", "application/json")
                .call();

            match response {
                Ok(resp) => {
                    let text = resp
                        .into_string()
                        .map_err(|e| HttpError::Request(e.to_string()))?;

                    return serde_json::from_str::<Vec<RawReading>>(&text)
                        .map_err(|e| HttpError::Decode(e.to_string()));
                }
                Err(ureq::Error::Status(code, resp)) => {
                    let error = HttpError::ServerError {
                        status: code,
                        message: resp.into_string().unwrap_or_default(),
                    };
                    // 5xx and rate limits are worth retrying; other 4xx
                    // means the request itself is wrong.
                    if code >= 500 || code == 429 {
                        last_error = Some(error);
                        continue;
                    }
                    return Err(error);
                }
                Err(ureq::Error::Transport(e)) => {
                    last_error = Some(HttpError::Request(e.to_string()));
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| HttpError::Request("unknown error".into())))
    }
}

#[async_trait]
impl BatchSource for SpaceReadingsClient {
    async fn next_batch(&mut self) -> Result<Vec<RawReading>, SourceError> {
        Ok(self.fetch().await?)
    }
}
