// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Routing decision returned by a transform alongside its output value.

/// What a stage should do with a value after its transform ran.
///
/// | Signal        | Packet routing                                                        |
/// |---------------|-----------------------------------------------------------------------|
/// | `Continue`    | forwarded to the next stage                                           |
/// | `JumpTo(name)`| forwarded, later stages pass it through until `name` is reached      |
/// | `Abort`       | dropped, no callback                                                  |
/// | `Retry(err)`  | transform re-invoked on the original value until the budget runs out |
/// | `Fail(err)`   | reported to on-fail and dropped                                       |
#[derive(Debug, Default)]
pub enum ControlSignal {
    #[default]
    Continue,
    JumpTo(String),
    Abort,
    Retry(anyhow::Error),
    Fail(anyhow::Error),
}

impl ControlSignal {
    pub fn jump_to(stage: impl Into<String>) -> Self {
        ControlSignal::JumpTo(stage.into())
    }

    pub fn retry(err: impl Into<anyhow::Error>) -> Self {
        ControlSignal::Retry(err.into())
    }

    pub fn fail(err: impl Into<anyhow::Error>) -> Self {
        ControlSignal::Fail(err.into())
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ControlSignal::Continue => "continue",
            ControlSignal::JumpTo(_) => "jump_to",
            ControlSignal::Abort => "abort",
            ControlSignal::Retry(_) => "retry",
            ControlSignal::Fail(_) => "fail",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("quota exceeded")]
    struct QuotaExceeded;

    #[test]
    fn test_default_is_continue() {
        assert!(matches!(ControlSignal::default(), ControlSignal::Continue));
    }

    #[test]
    fn test_constructors_wrap_domain_errors() {
        match ControlSignal::fail(QuotaExceeded) {
            ControlSignal::Fail(err) => assert!(err.downcast_ref::<QuotaExceeded>().is_some()),
            other => panic!("expected Fail, got {:?}", other),
        }
        match ControlSignal::jump_to("third") {
            ControlSignal::JumpTo(stage) => assert_eq!(stage, "third"),
            other => panic!("expected JumpTo, got {:?}", other),
        }
        assert_eq!(ControlSignal::retry(QuotaExceeded).kind(), "retry");
    }
}
