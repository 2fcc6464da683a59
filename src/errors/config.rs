// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::errors::PipelineError;

/// Errors that can occur during pipeline configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The configuration declares no stages
    NoStages,
    /// A stage has an empty or whitespace-only name
    EmptyStageName {
        /// Position of the stage in the configuration
        index: usize,
    },
    /// Two stages share a name, which makes jump routing ambiguous
    DuplicateStageName {
        /// The duplicated stage name
        stage: String,
    },
    /// The default start stage does not name any configured stage
    UnresolvedStartStage {
        /// The stage name that couldn't be resolved
        start_at: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoStages => write!(f, "Pipeline configuration declares no stages"),
            ValidationError::EmptyStageName { index } => {
                write!(f, "Stage at position {} has an empty name", index)
            }
            ValidationError::DuplicateStageName { stage } => {
                write!(f, "Duplicate stage name: '{}'", stage)
            }
            ValidationError::UnresolvedStartStage { start_at } => {
                write!(
                    f,
                    "Default start stage '{}' does not match any configured stage",
                    start_at
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a configuration file or building a pipeline from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported config format for '{}' (expected .yaml, .yml or .toml)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error("stage '{stage}' references unknown transform '{transform}'")]
    UnknownTransform { stage: String, transform: String },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_lists_every_error() {
        let err = ConfigError::Invalid(vec![
            ValidationError::DuplicateStageName {
                stage: "trim".to_string(),
            },
            ValidationError::UnresolvedStartStage {
                start_at: "nope".to_string(),
            },
        ]);
        let message = err.to_string();
        assert!(message.contains("Duplicate stage name: 'trim'"));
        assert!(message.contains("'nope' does not match any configured stage"));
    }
}
