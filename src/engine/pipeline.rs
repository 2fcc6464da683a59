// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline handle: stage registration, lifecycle and submission.
//!
//! ## Lifecycle
//!
//! ```text
//! Built ──run──▶ Running ──shutdown──▶ Draining ──(drained)──▶ Closed
//! ```
//!
//! Stages are registered while `Built`. `run` wires them tail to head:
//! the terminal queue is created first and handed to the last stage, whose
//! input sender is handed to the stage before it, and so on. The first stage's
//! input sender becomes the entry queue used by `submit`. A collector task
//! drains the terminal queue and delivers finished values.
//!
//! `shutdown` drops the entry sender and waits for the collector. Because every
//! stage only closes its output after all of its workers exit, the collector
//! only stops once every buffered and in-flight packet has been resolved.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::task::JoinHandle;

use crate::config::consts::TERMINAL_QUEUE_CAPACITY;
use crate::config::{StageOptions, SubmitOptions};
use crate::engine::callbacks::Callbacks;
use crate::engine::stage::Stage;
use crate::engine::stats::{PipelineStats, StatsSnapshot};
use crate::engine::Packet;
use crate::errors::{PipelineError, StageError};
use crate::observability::messages::pipeline::{
    CollectorStopped, PipelineStarted, ShutdownCompleted, ShutdownStarted, StageNameReused,
    SubmissionRejected, UnmatchedJumpTarget,
};
use crate::observability::messages::stage::WorkerCrashed;
use crate::observability::messages::StructuredLog;
use crate::traits::Transform;

/// Lifecycle state of a [`Pipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Accepting stage registrations
    Built,
    /// Workers running, accepting submissions
    Running,
    /// Entry closed, in-flight packets still being resolved
    Draining,
    /// Fully drained
    Closed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineState::Built => "built",
            PipelineState::Running => "running",
            PipelineState::Draining => "draining",
            PipelineState::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// State shared between the handle, every stage worker and the collector.
pub(crate) struct Shared<T> {
    pub(crate) pipeline: Arc<str>,
    pub(crate) callbacks: Callbacks<T>,
    pub(crate) stats: PipelineStats,
}

struct Lifecycle<T> {
    state: PipelineState,
    stages: Vec<Stage<T>>,
    entry: Option<mpsc::Sender<Packet<T>>>,
    collector: Option<JoinHandle<()>>,
}

/// An in-process, multi-stage concurrent pipeline.
///
/// Values of type `T` flow through an ordered list of named stages. Each stage
/// runs its own pool of workers and hands results to the next stage over a
/// bounded queue, so a slow stage applies backpressure all the way back to
/// [`submit`](Pipeline::submit).
///
/// # Example
/// ```
/// use the_sluice::{from_fn, ControlSignal, Pipeline, StageOptions};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), the_sluice::PipelineError> {
/// let pipeline = Pipeline::<String>::new("cleanup");
/// pipeline.add_stage(
///     "upper",
///     from_fn(|s: String| (s.to_uppercase(), ControlSignal::Continue)),
///     StageOptions::default(),
/// )?;
/// pipeline.add_stage(
///     "trim",
///     from_fn(|s: String| (s.trim().to_string(), ControlSignal::Continue)),
///     StageOptions::default(),
/// )?;
/// pipeline.set_on_finish(|s| assert_eq!(s, "ANB"));
///
/// pipeline.run()?;
/// pipeline.send("   anb   ".to_string()).await?;
/// pipeline.shutdown().await?;
/// assert_eq!(pipeline.stats().finished, 1);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<T> {
    shared: Arc<Shared<T>>,
    lifecycle: Mutex<Lifecycle<T>>,
}

impl<T> Pipeline<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        let pipeline: Arc<str> = Arc::from(name.into());
        Self {
            shared: Arc::new(Shared {
                callbacks: Callbacks::new(Arc::clone(&pipeline)),
                stats: PipelineStats::default(),
                pipeline,
            }),
            lifecycle: Mutex::new(Lifecycle {
                state: PipelineState::Built,
                stages: Vec::new(),
                entry: None,
                collector: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.pipeline
    }

    pub fn state(&self) -> PipelineState {
        self.lifecycle.lock().state
    }

    /// Names of the registered stages, in pipeline order.
    pub fn stage_names(&self) -> Vec<String> {
        self.lifecycle
            .lock()
            .stages
            .iter()
            .map(|stage| stage.name().to_string())
            .collect()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }

    /// Append a stage. Only allowed before [`run`](Pipeline::run).
    pub fn add_stage<F>(
        &self,
        name: impl Into<String>,
        transform: F,
        options: StageOptions,
    ) -> Result<(), PipelineError>
    where
        F: Transform<T> + 'static,
    {
        self.add_shared_stage(name, Arc::new(transform), options)
    }

    /// Append a stage whose transform is shared with other stages or pipelines.
    pub fn add_shared_stage(
        &self,
        name: impl Into<String>,
        transform: Arc<dyn Transform<T>>,
        options: StageOptions,
    ) -> Result<(), PipelineError> {
        let name = name.into();
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != PipelineState::Built {
            return Err(PipelineError::InvalidState {
                operation: "add a stage",
                state: lifecycle.state,
            });
        }

        if lifecycle.stages.iter().any(|stage| stage.name() == name) {
            StageNameReused {
                pipeline: self.name(),
                stage: &name,
            }
            .log();
        }
        lifecycle.stages.push(Stage::new(name, transform, options));
        Ok(())
    }

    /// Install the handler for values that complete the last stage.
    ///
    /// May be called at any time; packets resolved afterwards use the new handler.
    pub fn set_on_finish<F>(&self, handler: F)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.shared.callbacks.set_on_finish(Arc::new(handler));
    }

    /// Install the handler for failed packets.
    ///
    /// The handler receives the failing stage's name, the value and the failure.
    pub fn set_on_fail<F>(&self, handler: F)
    where
        F: Fn(&str, T, StageError) + Send + Sync + 'static,
    {
        self.shared.callbacks.set_on_fail(Arc::new(handler));
    }

    /// Spawn every stage's workers and the collector on the current tokio runtime.
    pub fn run(&self) -> Result<(), PipelineError> {
        let mut lifecycle = self.lifecycle.lock();
        match lifecycle.state {
            PipelineState::Built => {}
            PipelineState::Running => return Err(PipelineError::AlreadyRunning),
            PipelineState::Draining | PipelineState::Closed => return Err(PipelineError::Closed),
        }
        if lifecycle.stages.is_empty() {
            return Err(PipelineError::NoStages);
        }
        let runtime = Handle::try_current().map_err(|_| PipelineError::NoRuntime)?;

        let (terminal, terminal_rx) = mpsc::channel(TERMINAL_QUEUE_CAPACITY);
        let collector = runtime.spawn(collect(Arc::clone(&self.shared), terminal_rx));

        let entry = lifecycle
            .stages
            .iter()
            .rev()
            .fold(terminal, |downstream, stage| {
                stage.launch(&runtime, &self.shared, downstream)
            });

        let worker_count = lifecycle.stages.iter().map(Stage::worker_count).sum();
        PipelineStarted {
            pipeline: self.name(),
            stage_count: lifecycle.stages.len(),
            worker_count,
        }
        .log();

        lifecycle.entry = Some(entry);
        lifecycle.collector = Some(collector);
        lifecycle.state = PipelineState::Running;
        Ok(())
    }

    /// Submit a value with default options.
    pub async fn send(&self, value: T) -> Result<(), PipelineError> {
        self.submit(value, SubmitOptions::default()).await
    }

    /// Submit a value, waiting for room in the entry queue.
    ///
    /// With `options.timeout` set, gives up with [`PipelineError::Timeout`] once
    /// the queue has stayed full that long. With `options.start_at` set, every
    /// stage before the named one passes the value through untouched.
    pub async fn submit(&self, value: T, options: SubmitOptions) -> Result<(), PipelineError> {
        let entry = {
            let lifecycle = self.lifecycle.lock();
            match (lifecycle.state, &lifecycle.entry) {
                (PipelineState::Running, Some(entry)) => Ok(entry.clone()),
                (PipelineState::Built, _) => Err(PipelineError::InvalidState {
                    operation: "submit",
                    state: PipelineState::Built,
                }),
                _ => Err(PipelineError::Closed),
            }
        };
        let entry = entry.map_err(|err| self.rejected(err))?;

        let packet = Packet::new(value, options.start_at);
        let sent = match options.timeout {
            Some(timeout) => entry
                .send_timeout(packet, timeout)
                .await
                .map_err(|err| match err {
                    SendTimeoutError::Timeout(_) => PipelineError::Timeout { timeout },
                    SendTimeoutError::Closed(_) => PipelineError::Closed,
                }),
            None => entry
                .send(packet)
                .await
                .map_err(|_| PipelineError::Closed),
        };
        sent.map_err(|err| self.rejected(err))?;

        self.shared.stats.record_submitted();
        Ok(())
    }

    /// Stop accepting submissions and wait until every in-flight packet is resolved.
    pub async fn shutdown(&self) -> Result<(), PipelineError> {
        let collector = {
            let mut lifecycle = self.lifecycle.lock();
            match lifecycle.state {
                PipelineState::Running => {}
                PipelineState::Built => {
                    return Err(PipelineError::InvalidState {
                        operation: "shut down",
                        state: PipelineState::Built,
                    })
                }
                PipelineState::Draining | PipelineState::Closed => {
                    return Err(PipelineError::Closed)
                }
            }
            lifecycle.state = PipelineState::Draining;
            lifecycle.entry = None;
            lifecycle.collector.take()
        };

        ShutdownStarted {
            pipeline: self.name(),
        }
        .log();
        let started = Instant::now();

        if let Some(collector) = collector {
            if let Err(err) = collector.await {
                WorkerCrashed {
                    stage: "collector",
                    error: &err,
                }
                .log();
            }
        }

        self.lifecycle.lock().state = PipelineState::Closed;
        ShutdownCompleted {
            pipeline: self.name(),
            duration: started.elapsed(),
        }
        .log();
        Ok(())
    }

    fn rejected(&self, err: PipelineError) -> PipelineError {
        SubmissionRejected {
            pipeline: self.name(),
            error: &err,
        }
        .log();
        err
    }
}

/// Drain the terminal queue until the last stage closes it.
async fn collect<T>(shared: Arc<Shared<T>>, mut terminal: mpsc::Receiver<Packet<T>>) {
    let mut delivered = 0_u64;
    while let Some(packet) = terminal.recv().await {
        match packet.jump_target {
            None => {
                shared.stats.record_finished();
                shared.callbacks.finish(packet.value);
                delivered += 1;
            }
            Some(target) => {
                UnmatchedJumpTarget {
                    pipeline: &shared.pipeline,
                    target: &target,
                }
                .log();
                shared.stats.record_unmatched();
            }
        }
    }

    CollectorStopped {
        pipeline: &shared.pipeline,
        delivered,
    }
    .log();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ControlSignal;
    use crate::traits::from_fn;

    fn identity() -> impl Transform<u32> {
        from_fn(|n: u32| (n, ControlSignal::Continue))
    }

    #[test]
    fn test_new_pipeline_is_built() {
        let pipeline = Pipeline::<u32>::new("fresh");
        assert_eq!(pipeline.name(), "fresh");
        assert_eq!(pipeline.state(), PipelineState::Built);
        assert!(pipeline.stage_names().is_empty());
        assert_eq!(pipeline.stats(), StatsSnapshot::default());
    }

    #[test]
    fn test_stage_names_keep_order_and_duplicates() {
        let pipeline = Pipeline::<u32>::new("names");
        pipeline
            .add_stage("a", identity(), StageOptions::default())
            .unwrap();
        pipeline
            .add_stage("b", identity(), StageOptions::default())
            .unwrap();
        pipeline
            .add_stage("a", identity(), StageOptions::default())
            .unwrap();
        assert_eq!(pipeline.stage_names(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_run_outside_runtime_fails() {
        let pipeline = Pipeline::<u32>::new("no_runtime");
        pipeline
            .add_stage("a", identity(), StageOptions::default())
            .unwrap();
        assert_eq!(pipeline.run(), Err(PipelineError::NoRuntime));
        assert_eq!(pipeline.state(), PipelineState::Built);
    }

    #[tokio::test]
    async fn test_run_without_stages_stays_built() {
        let pipeline = Pipeline::<u32>::new("empty");
        assert_eq!(pipeline.run(), Err(PipelineError::NoStages));
        assert_eq!(pipeline.state(), PipelineState::Built);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PipelineState::Draining.to_string(), "draining");
        let err = PipelineError::InvalidState {
            operation: "submit",
            state: PipelineState::Built,
        };
        assert_eq!(err.to_string(), "cannot submit while pipeline is built");
    }
}
