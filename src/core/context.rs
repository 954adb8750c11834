//! # Injected execution collaborators.
//!
//! [`Context`] bundles what a backend needs from its environment:
//! - a Tokio runtime [`Handle`] to run sessions off the caller's thread,
//! - the [`Schedule`] callback context listeners are called on,
//! - the event [`Bus`].
//!
//! Backends receive a `Context` at construction; nothing is looked up globally, so
//! tests can hand in a paused-clock runtime or their own [`Schedule`].

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::core::schedule::{MainQueue, Schedule};
use crate::events::Bus;

/// Runtime handle, callback context and event bus shared by backends.
#[derive(Clone)]
pub struct Context {
    handle: Handle,
    queue: Arc<dyn Schedule>,
    bus: Bus,
}

impl Context {
    /// Assembles a context from explicit parts.
    pub fn new(handle: Handle, queue: Arc<dyn Schedule>, bus: Bus) -> Self {
        Self { handle, queue, bus }
    }

    /// Uses the current Tokio runtime and spawns a [`MainQueue`] on it.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn current(bus: Bus) -> Self {
        let handle = Handle::current();
        let queue = MainQueue::spawn(&handle, bus.clone());
        Self::new(handle, queue, bus)
    }

    #[inline]
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    #[inline]
    pub fn queue(&self) -> &Arc<dyn Schedule> {
        &self.queue
    }

    #[inline]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub(crate) fn spawn<F>(&self, fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(fut)
    }
}
