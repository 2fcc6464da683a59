// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration validation warnings and errors.
//!
//! This module contains message types for logging events related to:
//! * Stage list validation
//! * Duplicate stage name detection
//! * Default start stage resolution

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Duplicate stage name detected in configuration.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_sluice::observability::messages::validation::DuplicateStageNameDetected;
///
/// let msg = DuplicateStageNameDetected {
///     stage: "trim",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct DuplicateStageNameDetected<'a> {
    pub stage: &'a str,
}

impl Display for DuplicateStageNameDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate stage name: '{}'", self.stage)
    }
}

impl StructuredLog for DuplicateStageNameDetected<'_> {
    fn log(&self) {
        tracing::error!(
            stage = self.stage,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            stage = self.stage,
        )
    }
}

/// The configured default start stage names no stage.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_sluice::observability::messages::validation::UnresolvedStartStage;
///
/// let msg = UnresolvedStartStage {
///     start_at: "tirm",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct UnresolvedStartStage<'a> {
    pub start_at: &'a str,
}

impl Display for UnresolvedStartStage<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Default start stage '{}' does not match any configured stage",
            self.start_at
        )
    }
}

impl StructuredLog for UnresolvedStartStage<'_> {
    fn log(&self) {
        tracing::error!(
            start_at = self.start_at,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            start_at = self.start_at,
        )
    }
}

/// Configuration validation started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ValidationStarted<'a> {
    pub pipeline: &'a str,
    pub stage_count: usize,
}

impl Display for ValidationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting configuration validation for pipeline '{}' with {} stages",
            self.pipeline, self.stage_count
        )
    }
}

impl StructuredLog for ValidationStarted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            stage_count = self.stage_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            pipeline = self.pipeline,
            stage_count = self.stage_count,
        )
    }
}

/// Configuration validation completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ValidationCompleted<'a> {
    pub pipeline: &'a str,
    pub stage_count: usize,
}

impl Display for ValidationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration validation completed successfully for pipeline '{}' ({} stages)",
            self.pipeline, self.stage_count
        )
    }
}

impl StructuredLog for ValidationCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            stage_count = self.stage_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            pipeline = self.pipeline,
            stage_count = self.stage_count,
        )
    }
}

/// Configuration validation failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_sluice::observability::messages::validation::ValidationFailed;
///
/// let msg = ValidationFailed {
///     error_count: 3,
/// };
///
/// assert_eq!(msg.to_string(), "Configuration validation failed with 3 errors");
/// ```
pub struct ValidationFailed {
    pub error_count: usize,
}

impl Display for ValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration validation failed with {} errors",
            self.error_count
        )
    }
}

impl StructuredLog for ValidationFailed {
    fn log(&self) {
        tracing::error!(
            error_count = self.error_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            error_count = self.error_count,
        )
    }
}
