// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in `String` transforms used by config-driven pipelines and the CLI.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::ControlSignal;
use crate::traits::Transform;

const TITLE_CASE_SMALL_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Target case for [`ChangeTextCase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    Upper,
    Lower,
    /// First letter of every word capitalized
    Proper,
    /// Like `Proper`, but small words after the first stay lowercase
    Title,
}

/// Converts text to a different case.
pub struct ChangeTextCase {
    case_type: CaseType,
}

impl ChangeTextCase {
    pub fn new(case_type: CaseType) -> Self {
        Self { case_type }
    }

    pub fn upper() -> Self {
        Self::new(CaseType::Upper)
    }

    pub fn lower() -> Self {
        Self::new(CaseType::Lower)
    }

    pub fn proper() -> Self {
        Self::new(CaseType::Proper)
    }

    pub fn title() -> Self {
        Self::new(CaseType::Title)
    }

    fn convert(&self, input: &str) -> String {
        match self.case_type {
            CaseType::Upper => input.to_uppercase(),
            CaseType::Lower => input.to_lowercase(),
            CaseType::Proper => input
                .split_whitespace()
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
            CaseType::Title => input
                .split_whitespace()
                .enumerate()
                .map(|(i, word)| {
                    let lower = word.to_lowercase();
                    if i > 0 && TITLE_CASE_SMALL_WORDS.contains(&lower.as_str()) {
                        lower
                    } else {
                        capitalize(word)
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

#[async_trait]
impl Transform<String> for ChangeTextCase {
    async fn apply(&self, value: String) -> (String, ControlSignal) {
        (self.convert(&value), ControlSignal::Continue)
    }
}

/// Strips leading and trailing whitespace.
pub struct TrimText;

#[async_trait]
impl Transform<String> for TrimText {
    async fn apply(&self, value: String) -> (String, ControlSignal) {
        (value.trim().to_string(), ControlSignal::Continue)
    }
}

/// Reverses the input by `char`.
pub struct ReverseText;

#[async_trait]
impl Transform<String> for ReverseText {
    async fn apply(&self, value: String) -> (String, ControlSignal) {
        (value.chars().rev().collect(), ControlSignal::Continue)
    }
}

/// Wraps text in an optional prefix and suffix.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PrefixSuffixAdder {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl PrefixSuffixAdder {
    pub fn with_prefix_and_suffix(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            suffix: Some(suffix.into()),
        }
    }
}

#[async_trait]
impl Transform<String> for PrefixSuffixAdder {
    async fn apply(&self, value: String) -> (String, ControlSignal) {
        let prefix = self.prefix.as_deref().unwrap_or_default();
        let suffix = self.suffix.as_deref().unwrap_or_default();
        (format!("{}{}{}", prefix, value, suffix), ControlSignal::Continue)
    }
}

/// Failure raised by [`RejectBlank`].
#[derive(Debug, Error)]
#[error("input is empty or whitespace only")]
pub struct BlankInput;

/// Fails packets whose text is empty or whitespace only.
pub struct RejectBlank;

#[async_trait]
impl Transform<String> for RejectBlank {
    async fn apply(&self, value: String) -> (String, ControlSignal) {
        if value.trim().is_empty() {
            (value, ControlSignal::fail(BlankInput))
        } else {
            (value, ControlSignal::Continue)
        }
    }
}

/// Drops packets whose text is empty or whitespace only, without reporting them.
pub struct SkipBlank;

#[async_trait]
impl Transform<String> for SkipBlank {
    async fn apply(&self, value: String) -> (String, ControlSignal) {
        if value.trim().is_empty() {
            (value, ControlSignal::Abort)
        } else {
            (value, ControlSignal::Continue)
        }
    }
}
