// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Packet outcome counters, updated lock-free by workers and the collector.
#[derive(Debug, Default)]
pub(crate) struct PipelineStats {
    submitted: AtomicU64,
    finished: AtomicU64,
    failed: AtomicU64,
    aborted: AtomicU64,
    retried: AtomicU64,
    unmatched: AtomicU64,
}

impl PipelineStats {
    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_finished(&self) {
        self.finished.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_aborted(&self) {
        self.aborted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_retried(&self) {
        self.retried.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unmatched(&self) {
        self.unmatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            finished: self.finished.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            aborted: self.aborted.load(Ordering::Relaxed),
            retried: self.retried.load(Ordering::Relaxed),
            unmatched: self.unmatched.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a pipeline's counters.
///
/// After `shutdown` completes, `submitted == finished + failed + aborted + unmatched`.
/// `retried` counts re-invocations, not packets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub submitted: u64,
    pub finished: u64,
    pub failed: u64,
    pub aborted: u64,
    pub retried: u64,
    pub unmatched: u64,
}

impl StatsSnapshot {
    /// Packets that reached a terminal outcome.
    pub fn settled(&self) -> u64 {
        self.finished + self.failed + self.aborted + self.unmatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = PipelineStats::default();
        stats.record_submitted();
        stats.record_submitted();
        stats.record_finished();
        stats.record_retried();
        stats.record_retried();
        stats.record_failed();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.submitted, 2);
        assert_eq!(snapshot.retried, 2);
        assert_eq!(snapshot.settled(), 2);
    }

    #[test]
    fn test_snapshot_serializes_as_flat_object() {
        let snapshot = StatsSnapshot {
            submitted: 3,
            finished: 1,
            aborted: 1,
            unmatched: 1,
            ..StatsSnapshot::default()
        };
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["submitted"], 3);
        assert_eq!(json["unmatched"], 1);
        assert_eq!(json["failed"], 0);
    }
}
