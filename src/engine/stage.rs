// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stage worker pools and control-signal resolution.
//!
//! Each stage owns one bounded input queue read by `concurrency` workers.
//! Workers share the receiver behind a `tokio::sync::Mutex`, so exactly one of
//! them is waiting on `recv` at any time and every packet is taken exactly once.
//! A supervisor task joins the workers and then releases the stage's output
//! sender. Once every clone of that sender is gone the next stage sees its
//! input close, which is how shutdown cascades from the entry queue to the
//! collector.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, Mutex};
use tracing::Instrument;

use crate::config::StageOptions;
use crate::engine::callbacks::panic_message;
use crate::engine::pipeline::Shared;
use crate::engine::{ControlSignal, Packet};
use crate::errors::StageError;
use crate::observability::messages::stage::{
    DownstreamClosed, PacketAborted, RetryScheduled, StageClosed, StageFailed, WorkerCrashed,
    WorkerStarted, WorkerStopped,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Transform;

type Input<T> = Arc<Mutex<mpsc::Receiver<Packet<T>>>>;

/// A named step registered on a pipeline.
pub(crate) struct Stage<T> {
    name: Arc<str>,
    transform: Arc<dyn Transform<T>>,
    options: StageOptions,
}

impl<T> Stage<T>
where
    T: Clone + Send + 'static,
{
    pub(crate) fn new(
        name: impl Into<String>,
        transform: Arc<dyn Transform<T>>,
        options: StageOptions,
    ) -> Self {
        Self {
            name: Arc::from(name.into()),
            transform,
            options,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn worker_count(&self) -> usize {
        self.options.worker_count()
    }

    /// Spawn this stage's workers feeding `downstream` and return the sender for its input queue.
    pub(crate) fn launch(
        &self,
        runtime: &Handle,
        shared: &Arc<Shared<T>>,
        downstream: mpsc::Sender<Packet<T>>,
    ) -> mpsc::Sender<Packet<T>> {
        let (sender, receiver) = mpsc::channel(self.options.channel_capacity());
        let input: Input<T> = Arc::new(Mutex::new(receiver));
        let worker = Arc::new(StageWorker {
            stage: Arc::clone(&self.name),
            transform: Arc::clone(&self.transform),
            options: self.options.clone(),
            shared: Arc::clone(shared),
        });

        let worker_count = self.worker_count();
        let mut handles = Vec::with_capacity(worker_count);
        for id in 0..worker_count {
            let span = WorkerStarted {
                pipeline: &shared.pipeline,
                stage: &self.name,
                worker: id,
            }
            .span("worker");
            let task = Arc::clone(&worker).run(id, Arc::clone(&input), downstream.clone());
            handles.push(runtime.spawn(task.instrument(span)));
        }

        let stage = Arc::clone(&self.name);
        runtime.spawn(async move {
            for handle in handles {
                if let Err(err) = handle.await {
                    WorkerCrashed {
                        stage: &stage,
                        error: &err,
                    }
                    .log();
                }
            }
            drop(downstream);
            StageClosed {
                stage: &stage,
                workers: worker_count,
            }
            .log();
        });

        sender
    }
}

/// Everything a worker needs, shared by all workers of one stage.
struct StageWorker<T> {
    stage: Arc<str>,
    transform: Arc<dyn Transform<T>>,
    options: StageOptions,
    shared: Arc<Shared<T>>,
}

impl<T> StageWorker<T>
where
    T: Clone + Send + 'static,
{
    async fn run(self: Arc<Self>, id: usize, input: Input<T>, output: mpsc::Sender<Packet<T>>) {
        WorkerStarted {
            pipeline: &self.shared.pipeline,
            stage: &self.stage,
            worker: id,
        }
        .log();

        let mut processed = 0_u64;
        loop {
            let next = {
                let mut receiver = input.lock().await;
                receiver.recv().await
            };
            let Some(packet) = next else {
                break;
            };
            processed += 1;

            if let Some(packet) = self.process(packet).await {
                if output.send(packet).await.is_err() {
                    DownstreamClosed {
                        stage: &self.stage,
                        worker: id,
                    }
                    .log();
                    break;
                }
            }
        }

        WorkerStopped {
            stage: &self.stage,
            worker: id,
            processed,
        }
        .log();
    }

    /// Run one packet through this stage. `Some` means forward it downstream.
    async fn process(&self, mut packet: Packet<T>) -> Option<Packet<T>> {
        if packet.passes_through(&self.stage) {
            return Some(packet);
        }

        loop {
            let (value, signal) = match self.invoke(packet.value.clone()).await {
                Ok(output) => output,
                Err(message) => {
                    self.fail(packet.value, StageError::Panicked { message });
                    return None;
                }
            };

            match signal {
                ControlSignal::Continue => return Some(packet.advance(value, None)),
                ControlSignal::JumpTo(target) => return Some(packet.advance(value, Some(target))),
                ControlSignal::Abort => {
                    PacketAborted { stage: &self.stage }.log();
                    self.shared.stats.record_aborted();
                    return None;
                }
                ControlSignal::Fail(err) => {
                    self.fail(value, StageError::Failed(err));
                    return None;
                }
                ControlSignal::Retry(err) => {
                    if packet.retry_count >= self.options.max_retries {
                        let attempts = packet.retry_count + 1;
                        self.fail(
                            value,
                            StageError::RetriesExhausted {
                                attempts,
                                source: err,
                            },
                        );
                        return None;
                    }

                    packet.retry_count += 1;
                    self.shared.stats.record_retried();
                    RetryScheduled {
                        stage: &self.stage,
                        attempt: packet.retry_count,
                        max_retries: self.options.max_retries,
                        error: &*err,
                    }
                    .log();
                    if !self.options.retry_backoff.is_zero() {
                        tokio::time::sleep(self.options.retry_backoff).await;
                    }
                }
            }
        }
    }

    /// Call the transform on its own task so a panic surfaces as a `JoinError`
    /// instead of unwinding through the worker.
    async fn invoke(&self, value: T) -> Result<(T, ControlSignal), String> {
        let transform = Arc::clone(&self.transform);
        match tokio::spawn(async move { transform.apply(value).await }).await {
            Ok(output) => Ok(output),
            Err(err) if err.is_panic() => Err(panic_message(err.into_panic())),
            Err(err) => Err(err.to_string()),
        }
    }

    fn fail(&self, value: T, error: StageError) {
        StageFailed {
            pipeline: &self.shared.pipeline,
            stage: &self.stage,
            error: &error,
        }
        .log();
        self.shared.stats.record_failed();
        self.shared.callbacks.fail(&self.stage, value, error);
    }
}
