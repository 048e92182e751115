//! Multi-endpoint GET with per-endpoint retry and backoff.
//!
//! Endpoints are tried strictly in order. Each endpoint gets
//! `max_retries + 1` attempts; a failed attempt that is not the last one for
//! its endpoint sleeps for the configured backoff first. Moving on to the next
//! endpoint does not sleep. The caller gets either the fully decoded body of a
//! 2xx response or a terminal [`FetchError`].

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::charset::{decode_text, Charset};
use crate::http_client::{HttpClient, HttpError, HttpRequest};
use crate::retry::{RetryConfig, Sleeper, TokioSleeper};

/// Timeout and retry settings applied to every fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    pub timeout_ms: u64,
    pub retry: RetryConfig,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            retry: RetryConfig::default(),
        }
    }
}

/// Terminal outcome of a fetch that produced no text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("no endpoints were supplied")]
    NoEndpoints,

    #[error("all endpoints failed after {attempts} attempts; last endpoint {endpoint}: {source}")]
    Exhausted {
        endpoint: String,
        attempts: u32,
        #[source]
        source: HttpError,
    },
}

/// Sequential, retrying fetcher over an ordered endpoint list.
#[derive(Clone)]
pub struct ResilientFetcher {
    client: Arc<dyn HttpClient>,
    sleeper: Arc<dyn Sleeper>,
    policy: FetchPolicy,
}

impl ResilientFetcher {
    pub fn new(client: Arc<dyn HttpClient>, policy: FetchPolicy) -> Self {
        Self {
            client,
            sleeper: Arc::new(TokioSleeper),
            policy,
        }
    }

    /// Replace the sleeper, typically with a recording fake in tests.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// GET the first endpoint that answers with a 2xx status and decode its body.
    pub async fn fetch(
        &self,
        endpoints: &[String],
        headers: &BTreeMap<String, String>,
        charset: Charset,
    ) -> Result<String, FetchError> {
        let attempts_per_endpoint = self.policy.retry.attempts_per_endpoint();
        let mut total_attempts = 0_u32;
        let mut last_failure: Option<(String, HttpError)> = None;

        for endpoint in endpoints {
            for attempt in 0..attempts_per_endpoint {
                total_attempts = total_attempts.saturating_add(1);

                let request = HttpRequest::get(endpoint.as_str())
                    .with_headers(headers)
                    .with_timeout_ms(self.policy.timeout_ms);

                let error = match self.client.execute(request).await {
                    Ok(response) if response.is_success() => {
                        debug!(endpoint = %endpoint, attempt, bytes = response.body.len(), "fetch succeeded");
                        return Ok(decode_text(&response.body, charset));
                    }
                    Ok(response) => HttpError::status(response.status),
                    Err(error) => error,
                };

                debug!(endpoint = %endpoint, attempt, error = %error, "fetch attempt failed");

                if attempt + 1 < attempts_per_endpoint {
                    let delay = self.policy.retry.delay_for_attempt(attempt);
                    self.sleeper.sleep(delay).await;
                }

                last_failure = Some((endpoint.clone(), error));
            }

            warn!(endpoint = %endpoint, attempts = attempts_per_endpoint, "endpoint exhausted");
        }

        match last_failure {
            Some((endpoint, source)) => Err(FetchError::Exhausted {
                endpoint,
                attempts: total_attempts,
                source,
            }),
            None => Err(FetchError::NoEndpoints),
        }
    }
}
