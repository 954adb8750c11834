use std::sync::Arc;

use tokio::runtime::Handle;

use crate::{
    config::Config,
    core::{
        context::Context,
        engine::Engine,
        registry::Registry,
        schedule::{MainQueue, Schedule},
    },
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing an [`Engine`] with optional collaborators.
pub struct EngineBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    queue: Option<Arc<dyn Schedule>>,
    handle: Option<Handle>,
}

impl EngineBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            queue: None,
            handle: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive engine events (sessions, scans, lockouts, ...)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Replaces the default [`MainQueue`] callback context.
    pub fn with_schedule(mut self, queue: Arc<dyn Schedule>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Runs sessions on `handle` instead of the current runtime.
    pub fn with_handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Builds the engine and starts forwarding bus events to subscribers.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime (subscriber workers are spawned on
    /// the current one).
    pub fn build(self) -> Arc<Engine> {
        let handle = self.handle.unwrap_or_else(Handle::current);
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
        let queue: Arc<dyn Schedule> = match self.queue {
            Some(q) => q,
            None => MainQueue::spawn(&handle, bus.clone()),
        };

        let registry = Registry::new(bus.clone(), handle.clone());
        let ctx = Context::new(handle, queue, bus);

        let engine = Arc::new(Engine::new_internal(self.cfg, ctx, subs, registry));
        engine.subscriber_listener();
        engine
    }
}
