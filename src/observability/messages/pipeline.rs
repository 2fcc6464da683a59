// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Pipeline start and shutdown
//! * Submission rejection
//! * Terminal collection (finished and unmatched packets)
//! * Callback failures

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Pipeline wired and workers spawned.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_sluice::observability::messages::pipeline::PipelineStarted;
///
/// let msg = PipelineStarted {
///     pipeline: "ingest",
///     stage_count: 3,
///     worker_count: 5,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineStarted<'a> {
    pub pipeline: &'a str,
    pub stage_count: usize,
    pub worker_count: usize,
}

impl Display for PipelineStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' started: {} stages, {} workers",
            self.pipeline, self.stage_count, self.worker_count
        )
    }
}

impl StructuredLog for PipelineStarted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            stage_count = self.stage_count,
            worker_count = self.worker_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline",
            span_name = name,
            pipeline = self.pipeline,
            stage_count = self.stage_count,
        )
    }
}

/// A stage was registered under a name already in use.
///
/// # Log Level
/// `warn!` - Jump routing to this name will stop at the first match
pub struct StageNameReused<'a> {
    pub pipeline: &'a str,
    pub stage: &'a str,
}

impl Display for StageNameReused<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' already has a stage named '{}'; jumps to it resolve to the first one",
            self.pipeline, self.stage
        )
    }
}

impl StructuredLog for StageNameReused<'_> {
    fn log(&self) {
        tracing::warn!(pipeline = self.pipeline, stage = self.stage, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "stage_name_reused",
            span_name = name,
            pipeline = self.pipeline,
            stage = self.stage,
        )
    }
}

/// Shutdown requested; the entry queue is closed and the pipeline drains.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ShutdownStarted<'a> {
    pub pipeline: &'a str,
}

impl Display for ShutdownStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline '{}' draining", self.pipeline)
    }
}

impl StructuredLog for ShutdownStarted<'_> {
    fn log(&self) {
        tracing::info!(pipeline = self.pipeline, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("shutdown", span_name = name, pipeline = self.pipeline)
    }
}

/// Every stage has closed and the collector has drained the terminal queue.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_sluice::observability::messages::pipeline::ShutdownCompleted;
/// use std::time::Duration;
///
/// let msg = ShutdownCompleted {
///     pipeline: "ingest",
///     duration: Duration::from_millis(12),
/// };
///
/// assert_eq!(msg.to_string(), "Pipeline 'ingest' closed after draining for 12ms");
/// ```
pub struct ShutdownCompleted<'a> {
    pub pipeline: &'a str,
    pub duration: std::time::Duration,
}

impl Display for ShutdownCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' closed after draining for {:?}",
            self.pipeline, self.duration
        )
    }
}

impl StructuredLog for ShutdownCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "shutdown_completed",
            span_name = name,
            pipeline = self.pipeline,
            duration = ?self.duration,
        )
    }
}

/// A submission was refused.
///
/// # Log Level
/// `debug!` - The caller receives the error; this is a trace for diagnostics
pub struct SubmissionRejected<'a> {
    pub pipeline: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for SubmissionRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' rejected submission: {}",
            self.pipeline, self.error
        )
    }
}

impl StructuredLog for SubmissionRejected<'_> {
    fn log(&self) {
        tracing::debug!(pipeline = self.pipeline, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "submission_rejected",
            span_name = name,
            pipeline = self.pipeline,
            error = %self.error,
        )
    }
}

/// A packet left the last stage with a jump target no stage matched.
///
/// The packet is dropped without invoking any callback.
///
/// # Log Level
/// `warn!` - Usually a misspelled stage name or a jump to an earlier stage
pub struct UnmatchedJumpTarget<'a> {
    pub pipeline: &'a str,
    pub target: &'a str,
}

impl Display for UnmatchedJumpTarget<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' dropped a packet: jump target '{}' matched no downstream stage",
            self.pipeline, self.target
        )
    }
}

impl StructuredLog for UnmatchedJumpTarget<'_> {
    fn log(&self) {
        tracing::warn!(pipeline = self.pipeline, target = self.target, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "unmatched_jump_target",
            span_name = name,
            pipeline = self.pipeline,
            target = self.target,
        )
    }
}

/// An on-finish or on-fail callback panicked. The panic was contained.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_sluice::observability::messages::pipeline::CallbackPanicked;
///
/// let msg = CallbackPanicked {
///     pipeline: "ingest",
///     callback: "on_finish",
///     message: "sink unavailable",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct CallbackPanicked<'a> {
    pub pipeline: &'a str,
    pub callback: &'a str,
    pub message: &'a str,
}

impl Display for CallbackPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' recovered from panic in {} callback: {}",
            self.pipeline, self.callback, self.message
        )
    }
}

impl StructuredLog for CallbackPanicked<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline = self.pipeline,
            callback = self.callback,
            panic = self.message,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "callback_panicked",
            span_name = name,
            pipeline = self.pipeline,
            callback = self.callback,
        )
    }
}

/// The collector saw the terminal queue close.
///
/// # Log Level
/// `debug!` - Internal progress
pub struct CollectorStopped<'a> {
    pub pipeline: &'a str,
    pub delivered: u64,
}

impl Display for CollectorStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' collector stopped after {} packets",
            self.pipeline, self.delivered
        )
    }
}

impl StructuredLog for CollectorStopped<'_> {
    fn log(&self) {
        tracing::debug!(pipeline = self.pipeline, delivered = self.delivered, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("collector", span_name = name, pipeline = self.pipeline)
    }
}
