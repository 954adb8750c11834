//! # Engine: wires configuration, callback context, event fan-out and backends.
//!
//! The [`Engine`] owns the event bus, a [`SubscriberSet`], the [`Registry`] and the
//! [`Context`] every backend it builds shares. It does not authenticate by itself:
//! callers pick a backend and call [`Biometric::authenticate`] on it.
//!
//! ## High-level architecture
//! ```text
//! Engine::builder(cfg) ──► build()
//!   - Bus::new(cfg.bus_capacity)
//!   - MainQueue (or injected Schedule) = callback context
//!   - Registry
//!   - subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!
//! Backends:
//!   engine.placeholder()              ─► PlaceholderBackend(ctx)
//!   engine.sensor_backend(m, sensor)  ─► SensorBackend(ctx)
//!   engine.register(backend)          ─► Registry
//!
//! Event flow:
//!   Session ── publish(Event) ──► Bus ──► Engine listener ──► SubscriberSet::emit(&Event)
//!                                                        ┌─────────┬─────────┐
//!                                                        ▼         ▼         ▼
//!                                                  [queue S1] [queue S2] [queue SN]
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use biovisor::{
//!     AuthListener, Biometric, Config, Engine, Failure, MethodId, RetryBudget,
//! };
//!
//! struct Quiet;
//! impl AuthListener for Quiet {
//!     fn on_success(&self, _method: MethodId) {}
//!     fn on_failure(&self, _failure: &Failure) {}
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let cfg = Config {
//!         placeholder_delay: std::time::Duration::from_millis(10),
//!         ..Config::default()
//!     };
//!     let engine = Engine::builder(cfg).build();
//!     let backend = engine.placeholder();
//!
//!     let token = CancellationToken::new();
//!     let handle = backend.authenticate(&token, Arc::new(Quiet), RetryBudget::none().boxed());
//!     let report = handle.wait().await;
//!     assert!(!report.outcome.is_success());
//! }
//! ```

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;

use crate::{
    backends::{Biometric, BiometricRef, PlaceholderBackend, Sensor, SensorBackend},
    config::Config,
    core::{builder::EngineBuilder, context::Context, registry::Registry},
    error::EngineError,
    events::Bus,
    method::BiometricMethod,
    policies::PolicyBox,
    subscribers::SubscriberSet,
};

/// Owner of the shared collaborators backends are built with.
pub struct Engine {
    cfg: Config,
    ctx: Context,
    subs: Arc<SubscriberSet>,
    registry: Arc<Registry>,
}

impl Engine {
    /// Creates a builder for constructing an engine.
    pub fn builder(cfg: Config) -> EngineBuilder {
        EngineBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        ctx: Context,
        subs: Arc<SubscriberSet>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            cfg,
            ctx,
            subs,
            registry,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Context handed to every backend built by this engine.
    #[inline]
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    #[inline]
    pub fn bus(&self) -> &Bus {
        self.ctx.bus()
    }

    #[inline]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Fresh per-session restart policy from [`Config::restart_policy`].
    pub fn restart_policy(&self) -> PolicyBox {
        self.cfg.restart_policy()
    }

    /// Builds the placeholder backend.
    pub fn placeholder(&self) -> Arc<PlaceholderBackend> {
        Arc::new(PlaceholderBackend::from_config(self.ctx.clone(), &self.cfg))
    }

    /// Builds a backend for `sensor` answering as `method`.
    pub fn sensor_backend<S: Sensor>(
        &self,
        method: BiometricMethod,
        sensor: S,
    ) -> Arc<SensorBackend<S>> {
        Arc::new(SensorBackend::new(method, sensor, self.ctx.clone(), &self.cfg))
    }

    /// Registers a backend with the engine's registry.
    pub async fn register<B: Biometric>(&self, backend: Arc<B>) -> Result<(), EngineError> {
        let backend: BiometricRef = backend;
        self.registry.register(backend).await
    }

    /// Number of subscribers events fan out to.
    pub fn subscriber_count(&self) -> usize {
        self.subs.len()
    }

    /// Forwards bus events to the subscriber set until the bus closes.
    pub(crate) fn subscriber_listener(&self) {
        let mut rx = self.ctx.bus().subscribe();
        let set = Arc::clone(&self.subs);
        self.ctx.spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}
