// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for stage worker pools.
//!
//! This module contains message types for logging events related to:
//! * Worker start and stop
//! * Stage closure cascading downstream
//! * Retry, abort and failure resolution
//! * Transform panics

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A worker began reading its stage's input queue.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WorkerStarted<'a> {
    pub pipeline: &'a str,
    pub stage: &'a str,
    pub worker: usize,
}

impl Display for WorkerStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' worker {} started in pipeline '{}'",
            self.stage, self.worker, self.pipeline
        )
    }
}

impl StructuredLog for WorkerStarted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            stage = self.stage,
            worker = self.worker,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "stage_worker",
            span_name = name,
            pipeline = self.pipeline,
            stage = self.stage,
            worker = self.worker,
        )
    }
}

/// A worker saw its input queue closed and drained.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WorkerStopped<'a> {
    pub stage: &'a str,
    pub worker: usize,
    pub processed: u64,
}

impl Display for WorkerStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' worker {} stopped after {} packets",
            self.stage, self.worker, self.processed
        )
    }
}

impl StructuredLog for WorkerStopped<'_> {
    fn log(&self) {
        tracing::info!(
            stage = self.stage,
            worker = self.worker,
            processed = self.processed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "worker_stopped",
            span_name = name,
            stage = self.stage,
            worker = self.worker,
        )
    }
}

/// All workers of a stage exited; its output queue is now closed.
///
/// # Log Level
/// `debug!` - Internal progress
pub struct StageClosed<'a> {
    pub stage: &'a str,
    pub workers: usize,
}

impl Display for StageClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' closed its output after {} workers exited",
            self.stage, self.workers
        )
    }
}

impl StructuredLog for StageClosed<'_> {
    fn log(&self) {
        tracing::debug!(stage = self.stage, workers = self.workers, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("stage_closed", span_name = name, stage = self.stage)
    }
}

/// A worker task ended abnormally instead of returning.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct WorkerCrashed<'a> {
    pub stage: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for WorkerCrashed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage '{}' worker crashed: {}", self.stage, self.error)
    }
}

impl StructuredLog for WorkerCrashed<'_> {
    fn log(&self) {
        tracing::error!(stage = self.stage, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "worker_crashed",
            span_name = name,
            stage = self.stage,
            error = %self.error,
        )
    }
}

/// The transform asked for a retry and budget remains.
///
/// # Log Level
/// `debug!` - Expected transient condition
///
/// # Example
/// ```
/// use the_sluice::observability::messages::stage::RetryScheduled;
///
/// let error = std::io::Error::new(std::io::ErrorKind::WouldBlock, "busy");
/// let msg = RetryScheduled {
///     stage: "fetch",
///     attempt: 1,
///     max_retries: 3,
///     error: &error,
/// };
///
/// assert_eq!(msg.to_string(), "Stage 'fetch' retrying (1/3): busy");
/// ```
pub struct RetryScheduled<'a> {
    pub stage: &'a str,
    pub attempt: u32,
    pub max_retries: u32,
    pub error: &'a dyn std::error::Error,
}

impl Display for RetryScheduled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' retrying ({}/{}): {}",
            self.stage, self.attempt, self.max_retries, self.error
        )
    }
}

impl StructuredLog for RetryScheduled<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            attempt = self.attempt,
            max_retries = self.max_retries,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "retry",
            span_name = name,
            stage = self.stage,
            attempt = self.attempt,
        )
    }
}

/// The transform aborted the packet.
///
/// # Log Level
/// `debug!` - Expected outcome
pub struct PacketAborted<'a> {
    pub stage: &'a str,
}

impl Display for PacketAborted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage '{}' aborted a packet", self.stage)
    }
}

impl StructuredLog for PacketAborted<'_> {
    fn log(&self) {
        tracing::debug!(stage = self.stage, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("packet_aborted", span_name = name, stage = self.stage)
    }
}

/// A packet failed in a stage and is being reported to on-fail.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct StageFailed<'a> {
    pub pipeline: &'a str,
    pub stage: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for StageFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' stage '{}' failed: {}",
            self.pipeline, self.stage, self.error
        )
    }
}

impl StructuredLog for StageFailed<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline = self.pipeline,
            stage = self.stage,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "stage_failed",
            span_name = name,
            pipeline = self.pipeline,
            stage = self.stage,
            error = %self.error,
        )
    }
}

/// The next stage's queue closed while this stage still had output.
///
/// # Log Level
/// `error!` - The collector or a downstream stage is gone; the packet is lost
pub struct DownstreamClosed<'a> {
    pub stage: &'a str,
    pub worker: usize,
}

impl Display for DownstreamClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' worker {} found its output queue closed",
            self.stage, self.worker
        )
    }
}

impl StructuredLog for DownstreamClosed<'_> {
    fn log(&self) {
        tracing::error!(stage = self.stage, worker = self.worker, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "downstream_closed",
            span_name = name,
            stage = self.stage,
            worker = self.worker,
        )
    }
}
