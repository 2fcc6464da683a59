// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation for pipeline configs.
//!
//! Validation checks the stage list before any worker is spawned:
//!
//! 1. **Presence**: at least one stage is declared
//! 2. **Naming**: every stage has a non-blank name, and no name is used twice
//! 3. **Start stage**: a configured default `start_at` names one of the stages
//!
//! Unique names matter because jump targets and start stages address stages by
//! name. The engine itself tolerates duplicates, so this is where they are caught.
//! All problems are accumulated and returned together.
//!
//! # Example
//! ```rust
//! use the_sluice::config::{validate_pipeline_config, PipelineConfig, StageConfig, SubmitConfig};
//! use the_sluice::errors::ValidationError;
//!
//! let stage = |name: &str| StageConfig {
//!     name: name.to_string(),
//!     transform: "trim_text".to_string(),
//!     concurrency: None,
//!     queue_capacity: None,
//!     max_retries: None,
//!     retry_backoff_ms: None,
//! };
//! let config = PipelineConfig {
//!     name: "example".to_string(),
//!     submit: SubmitConfig {
//!         timeout_ms: None,
//!         start_at: Some("missing".to_string()),
//!     },
//!     stages: vec![stage("trim"), stage("trim")],
//! };
//!
//! let errors = validate_pipeline_config(&config).unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert!(errors.contains(&ValidationError::DuplicateStageName { stage: "trim".to_string() }));
//! ```

use std::collections::HashSet;

use crate::config::PipelineConfig;
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    DuplicateStageNameDetected, UnresolvedStartStage, ValidationCompleted, ValidationFailed,
    ValidationStarted,
};
use crate::observability::messages::StructuredLog;

/// Validate a pipeline configuration, returning every problem found.
pub fn validate_pipeline_config(cfg: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    ValidationStarted {
        pipeline: &cfg.name,
        stage_count: cfg.stages.len(),
    }
    .log();

    let mut errors = Vec::new();

    if cfg.stages.is_empty() {
        errors.push(ValidationError::NoStages);
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for (index, stage) in cfg.stages.iter().enumerate() {
        if stage.name.trim().is_empty() {
            errors.push(ValidationError::EmptyStageName { index });
            continue;
        }
        if !seen.insert(stage.name.as_str()) && reported.insert(stage.name.as_str()) {
            DuplicateStageNameDetected { stage: &stage.name }.log();
            errors.push(ValidationError::DuplicateStageName {
                stage: stage.name.clone(),
            });
        }
    }

    if let Some(start_at) = &cfg.submit.start_at {
        if !seen.contains(start_at.as_str()) {
            UnresolvedStartStage { start_at }.log();
            errors.push(ValidationError::UnresolvedStartStage {
                start_at: start_at.clone(),
            });
        }
    }

    if errors.is_empty() {
        ValidationCompleted {
            pipeline: &cfg.name,
            stage_count: cfg.stages.len(),
        }
        .log();
        Ok(())
    } else {
        ValidationFailed {
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StageConfig, SubmitConfig};

    fn stage(name: &str) -> StageConfig {
        StageConfig {
            name: name.to_string(),
            transform: "trim_text".to_string(),
            concurrency: None,
            queue_capacity: None,
            max_retries: None,
            retry_backoff_ms: None,
        }
    }

    fn config(stages: Vec<StageConfig>, start_at: Option<&str>) -> PipelineConfig {
        PipelineConfig {
            name: "test".to_string(),
            submit: SubmitConfig {
                timeout_ms: None,
                start_at: start_at.map(str::to_string),
            },
            stages,
        }
    }

    #[test]
    fn test_valid_config() {
        let cfg = config(vec![stage("a"), stage("b")], Some("b"));
        assert!(validate_pipeline_config(&cfg).is_ok());
    }

    #[test]
    fn test_empty_stage_list() {
        let cfg = config(vec![], None);
        assert_eq!(
            validate_pipeline_config(&cfg),
            Err(vec![ValidationError::NoStages])
        );
    }

    #[test]
    fn test_duplicate_reported_once_per_name() {
        let cfg = config(vec![stage("a"), stage("a"), stage("a"), stage("b")], None);
        assert_eq!(
            validate_pipeline_config(&cfg),
            Err(vec![ValidationError::DuplicateStageName {
                stage: "a".to_string()
            }])
        );
    }

    #[test]
    fn test_errors_accumulate() {
        let cfg = config(vec![stage("  "), stage("b"), stage("b")], Some("c"));
        let errors = validate_pipeline_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyStageName { index: 0 },
                ValidationError::DuplicateStageName {
                    stage: "b".to_string()
                },
                ValidationError::UnresolvedStartStage {
                    start_at: "c".to_string()
                },
            ]
        );
    }
}
