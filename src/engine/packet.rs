// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Envelope carrying one in-flight value through the pipeline.
///
/// A packet is owned by exactly one worker at a time. `retry_count` tracks the
/// retries spent in the stage currently holding it and is reset whenever the
/// packet is forwarded. `jump_target` makes stages pass the packet through
/// untouched until the named stage is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet<T> {
    pub value: T,
    pub retry_count: u32,
    pub jump_target: Option<String>,
}

impl<T> Packet<T> {
    pub fn new(value: T, jump_target: Option<String>) -> Self {
        Self {
            value,
            retry_count: 0,
            jump_target,
        }
    }

    /// True when this packet should skip the stage named `stage`.
    pub fn passes_through(&self, stage: &str) -> bool {
        matches!(&self.jump_target, Some(target) if target != stage)
    }

    /// Replace the value and re-arm routing before handing the packet downstream.
    pub(crate) fn advance(mut self, value: T, jump_target: Option<String>) -> Self {
        self.value = value;
        self.jump_target = jump_target;
        self.retry_count = 0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_packet_starts_clean() {
        let packet = Packet::new("hello", None);
        assert_eq!(packet.retry_count, 0);
        assert!(packet.jump_target.is_none());
        assert!(!packet.passes_through("any"));
    }

    #[test]
    fn test_jump_target_passes_other_stages() {
        let packet = Packet::new(1, Some("third".to_string()));
        assert!(packet.passes_through("first"));
        assert!(packet.passes_through("second"));
        assert!(!packet.passes_through("third"));
    }

    #[test]
    fn test_advance_resets_retry_count() {
        let mut packet = Packet::new(1, Some("second".to_string()));
        packet.retry_count = 2;
        let packet = packet.advance(2, None);
        assert_eq!(packet.value, 2);
        assert_eq!(packet.retry_count, 0);
        assert!(packet.jump_target.is_none());
    }
}
