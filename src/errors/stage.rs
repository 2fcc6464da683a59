// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failure delivered to the on-fail callback.
#[derive(Debug, Error)]
pub enum StageError {
    /// The transform returned `ControlSignal::Fail`
    #[error(transparent)]
    Failed(anyhow::Error),

    /// The transform kept returning `ControlSignal::Retry` past the stage's budget.
    /// `source` is the error carried by the last retry signal.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    /// The transform panicked
    #[error("transform panicked: {message}")]
    Panicked { message: String },
}

impl StageError {
    /// The business error behind this failure, if the transform produced one.
    pub fn cause(&self) -> Option<&anyhow::Error> {
        match self {
            StageError::Failed(err) => Some(err),
            StageError::RetriesExhausted { source, .. } => Some(source),
            StageError::Panicked { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_failed_is_transparent() {
        let err = StageError::Failed(anyhow!("disk full"));
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(err.cause().map(|e| e.to_string()).as_deref(), Some("disk full"));
    }

    #[test]
    fn test_retries_exhausted_keeps_last_error() {
        let err = StageError::RetriesExhausted {
            attempts: 4,
            source: anyhow!("upstream busy"),
        };
        assert_eq!(
            err.to_string(),
            "retries exhausted after 4 attempts: upstream busy"
        );
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_panicked_has_no_cause() {
        let err = StageError::Panicked {
            message: "index out of bounds".to_string(),
        };
        assert_eq!(err.to_string(), "transform panicked: index out of bounds");
        assert!(err.cause().is_none());
    }
}
