// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use crate::config::consts::{
    DEFAULT_CONCURRENCY, DEFAULT_MAX_RETRIES, DEFAULT_QUEUE_CAPACITY, DEFAULT_RETRY_BACKOFF,
};

/// Per-stage configuration.
///
/// Fields are public so the struct can be built directly; the `with_*` helpers
/// ignore values that would make a stage unusable.
///
/// # Example
/// ```
/// use the_sluice::config::StageOptions;
///
/// let opts = StageOptions::default()
///     .with_concurrency(4)
///     .with_concurrency(0) // ignored
///     .with_max_retries(1);
///
/// assert_eq!(opts.concurrency, 4);
/// assert_eq!(opts.queue_capacity, 1);
/// assert_eq!(opts.max_retries, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOptions {
    /// Number of workers reading the stage's input queue (at least 1)
    pub concurrency: usize,
    /// Capacity of the stage's input queue. Zero is treated as one.
    pub queue_capacity: usize,
    /// How many times a `Retry` signal re-invokes the transform
    pub max_retries: u32,
    /// Pause before each retry
    pub retry_backoff: Duration,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

impl StageOptions {
    /// Set the worker count. Values below 1 are ignored.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        if concurrency >= 1 {
            self.concurrency = concurrency;
        }
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Worker count actually spawned.
    pub(crate) fn worker_count(&self) -> usize {
        self.concurrency.max(1)
    }

    /// Channel capacity actually allocated. tokio channels cannot be zero-sized.
    pub(crate) fn channel_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

/// Per-submission configuration.
///
/// * `timeout` - give up with `PipelineError::Timeout` if the entry queue stays full this long
/// * `start_at` - skip every stage before the named one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    pub timeout: Option<Duration>,
    pub start_at: Option<String>,
}

impl SubmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn starting_at(mut self, stage: impl Into<String>) -> Self {
        self.start_at = Some(stage.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_option_defaults() {
        let opts = StageOptions::default();
        assert_eq!(opts.concurrency, 1);
        assert_eq!(opts.queue_capacity, 1);
        assert_eq!(opts.max_retries, 3);
        assert_eq!(opts.retry_backoff, Duration::from_millis(1));
    }

    #[test]
    fn test_zero_concurrency_is_ignored() {
        let opts = StageOptions::default().with_concurrency(3).with_concurrency(0);
        assert_eq!(opts.concurrency, 3);
    }

    #[test]
    fn test_zero_sized_values_are_clamped_when_wiring() {
        let opts = StageOptions {
            concurrency: 0,
            queue_capacity: 0,
            ..StageOptions::default()
        };
        assert_eq!(opts.worker_count(), 1);
        assert_eq!(opts.channel_capacity(), 1);
    }

    #[test]
    fn test_submit_options_builder() {
        let opts = SubmitOptions::new()
            .with_timeout(Duration::from_millis(250))
            .starting_at("trim");
        assert_eq!(opts.timeout, Some(Duration::from_millis(250)));
        assert_eq!(opts.start_at.as_deref(), Some("trim"));
    }
}
