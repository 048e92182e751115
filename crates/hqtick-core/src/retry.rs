//! Retry policy with capped exponential backoff and jitter.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Backoff strategy between attempts against the same endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed {
        /// Delay between retries.
        delay: Duration,
    },
    /// `min(2^attempt, cap_units) * unit`, plus up to `jitter_ratio` of that term.
    Exponential {
        /// Length of one backoff unit.
        unit: Duration,
        /// Ceiling of the exponential term, in units.
        cap_units: u32,
        /// Upper bound of the uniform jitter, as a fraction of the capped term.
        jitter_ratio: f64,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            unit: Duration::from_millis(500),
            cap_units: 8,
            jitter_ratio: 0.3,
        }
    }
}

impl Backoff {
    /// Delay before retrying after the failed `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        self.delay_with_sample(attempt, fastrand::f64())
    }

    /// Same as [`Backoff::delay`] with the jitter draw supplied by the caller.
    ///
    /// `sample` is clamped to `[0, 1)`.
    pub fn delay_with_sample(self, attempt: u32, sample: f64) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                unit,
                cap_units,
                jitter_ratio,
            } => {
                let exponential = 2_u64.checked_pow(attempt).unwrap_or(u64::MAX);
                let capped_units = exponential.min(u64::from(cap_units)) as f64;
                let capped = unit.as_secs_f64() * capped_units;

                let sample = if sample.is_finite() {
                    sample.clamp(0.0, 1.0 - f64::EPSILON)
                } else {
                    0.0
                };
                let jitter = capped * jitter_ratio.max(0.0) * sample;

                Duration::from_secs_f64(capped + jitter)
            }
        }
    }
}

/// Configuration for the per-endpoint retry loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt. Total attempts per endpoint = `max_retries + 1`.
    pub max_retries: u32,
    /// The backoff strategy to use between retries.
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Backoff::default(),
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with exponential backoff.
    pub fn exponential(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Create a new retry configuration with fixed backoff.
    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed { delay },
        }
    }

    /// Single attempt per endpoint.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub const fn attempts_per_endpoint(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Calculate the delay for a given retry attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

/// Suspension used between attempts and between polling cycles.
pub trait Sleeper: Send + Sync {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Real-time sleeper backed by the Tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(tokio::time::sleep(duration))
    }
}
