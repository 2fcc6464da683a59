// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::future::Future;

use async_trait::async_trait;

use crate::engine::ControlSignal;

/// The unit of work a stage executes.
///
/// A transform receives the packet's value by ownership and hands back the
/// (possibly new) value together with the routing decision. Async closures
/// returning `(T, ControlSignal)` implement this trait directly; synchronous
/// closures go through [`from_fn`].
///
/// # Example
/// ```
/// use the_sluice::{ControlSignal, Transform};
///
/// struct Shout;
///
/// #[async_trait::async_trait]
/// impl Transform<String> for Shout {
///     async fn apply(&self, value: String) -> (String, ControlSignal) {
///         (value.to_uppercase(), ControlSignal::Continue)
///     }
/// }
/// ```
#[async_trait]
pub trait Transform<T: Send + 'static>: Send + Sync {
    async fn apply(&self, value: T) -> (T, ControlSignal);
}

#[async_trait]
impl<T, F, Fut> Transform<T> for F
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = (T, ControlSignal)> + Send + 'static,
{
    async fn apply(&self, value: T) -> (T, ControlSignal) {
        (self)(value).await
    }
}

/// Adapter turning a synchronous closure into a [`Transform`].
pub struct FnTransform<F>(F);

/// Wrap a synchronous closure as a transform.
///
/// ```
/// use the_sluice::{from_fn, ControlSignal};
///
/// let trim = from_fn(|s: String| (s.trim().to_string(), ControlSignal::Continue));
/// # let _ = trim;
/// ```
pub fn from_fn<T, F>(f: F) -> FnTransform<F>
where
    F: Fn(T) -> (T, ControlSignal) + Send + Sync,
{
    FnTransform(f)
}

#[async_trait]
impl<T, F> Transform<T> for FnTransform<F>
where
    T: Send + 'static,
    F: Fn(T) -> (T, ControlSignal) + Send + Sync,
{
    async fn apply(&self, value: T) -> (T, ControlSignal) {
        (self.0)(value)
    }
}
