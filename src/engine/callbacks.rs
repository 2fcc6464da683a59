// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::StageError;
use crate::observability::messages::pipeline::CallbackPanicked;
use crate::observability::messages::StructuredLog;

/// Receives every value that completed the last stage.
pub type FinishHandler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Receives the failing stage's name, the value and the failure.
pub type FailHandler<T> = Arc<dyn Fn(&str, T, StageError) + Send + Sync>;

/// Callback slots shared between the pipeline handle, its workers and the collector.
///
/// The slot is read once per packet, so replacing a handler affects every
/// packet resolved afterwards. Handlers are invoked outside the lock.
pub(crate) struct Callbacks<T> {
    pipeline: Arc<str>,
    on_finish: RwLock<Option<FinishHandler<T>>>,
    on_fail: RwLock<Option<FailHandler<T>>>,
}

impl<T> Callbacks<T> {
    pub(crate) fn new(pipeline: Arc<str>) -> Self {
        Self {
            pipeline,
            on_finish: RwLock::new(None),
            on_fail: RwLock::new(None),
        }
    }

    pub(crate) fn set_on_finish(&self, handler: FinishHandler<T>) {
        *self.on_finish.write() = Some(handler);
    }

    pub(crate) fn set_on_fail(&self, handler: FailHandler<T>) {
        *self.on_fail.write() = Some(handler);
    }

    /// Deliver a finished value. A panicking handler is logged and swallowed.
    pub(crate) fn finish(&self, value: T) {
        let handler = self.on_finish.read().clone();
        if let Some(handler) = handler {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler(value))) {
                self.report_panic("on_finish", payload);
            }
        }
    }

    /// Deliver a failure. A panicking handler is logged and swallowed.
    pub(crate) fn fail(&self, stage: &str, value: T, error: StageError) {
        let handler = self.on_fail.read().clone();
        if let Some(handler) = handler {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler(stage, value, error))) {
                self.report_panic("on_fail", payload);
            }
        }
    }

    fn report_panic(&self, callback: &str, payload: Box<dyn Any + Send>) {
        let message = panic_message(payload);
        CallbackPanicked {
            pipeline: &self.pipeline,
            callback,
            message: &message,
        }
        .log();
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_string(),
            Err(_) => "non-string panic payload".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_missing_handlers_are_no_ops() {
        let callbacks: Callbacks<u32> = Callbacks::new(Arc::from("test"));
        callbacks.finish(1);
        callbacks.fail("stage", 1, StageError::Panicked { message: "x".into() });
    }

    #[test]
    fn test_replacing_handler_affects_later_calls() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let callbacks: Callbacks<u32> = Callbacks::new(Arc::from("test"));

        let counter = Arc::clone(&first);
        callbacks.set_on_finish(Arc::new(move |_: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        callbacks.finish(1);

        let counter = Arc::clone(&second);
        callbacks.set_on_finish(Arc::new(move |_: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        callbacks.finish(2);

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_handler_is_contained() {
        let callbacks: Callbacks<u32> = Callbacks::new(Arc::from("test"));
        callbacks.set_on_fail(Arc::new(|_: &str, _: u32, _: StageError| panic!("handler blew up")));
        callbacks.fail("stage", 7, StageError::Panicked { message: "x".into() });
    }

    #[test]
    fn test_panic_message_extracts_text() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(42_u8)), "non-string panic payload");
    }
}
