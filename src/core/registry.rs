//! # Backend registry.
//!
//! Holds every initialized backend, keyed by [`MethodId`]. Backends are added either
//! directly ([`Registry::register`]) or through an asynchronous initializer
//! ([`Registry::spawn_init`]) that reports its completion to an [`InitListener`].
//!
//! ## Architecture
//! ```text
//! register(backend) ──► duplicate id? ─ yes ─► Err(DuplicateMethod)
//!                            └─ no ─► push ─► publish BackendRegistered
//!
//! spawn_init(method, init) ──► [task] init.await
//!                                 ├─ Ok(backend) ─► register ─► init_finished(method, Some)
//!                                 └─ Err(e)      ─► publish BackendInitFailed ─► init_finished(method, None)
//! ```
//!
//! ## Rules
//! - Method ids are unique within a registry.
//! - Backends are kept in registration order.
//! - The registry never picks a backend for the caller.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::backends::{BiometricRef, Capabilities};
use crate::error::EngineError;
use crate::events::{Bus, Event, EventKind};
use crate::method::{BiometricMethod, MethodId};

/// Completion callback of an asynchronous backend initializer.
pub trait InitListener: Send + Sync + 'static {
    /// Called once per initializer; `backend` is `None` when init failed.
    fn init_finished(&self, method: &BiometricMethod, backend: Option<&BiometricRef>);
}

/// Registry of initialized backends.
pub struct Registry {
    backends: RwLock<Vec<BiometricRef>>,
    bus: Bus,
    handle: Handle,
}

impl Registry {
    pub fn new(bus: Bus, handle: Handle) -> Arc<Self> {
        Arc::new(Self {
            backends: RwLock::new(Vec::new()),
            bus,
            handle,
        })
    }

    /// Adds a backend; its method id must be unused.
    pub async fn register(&self, backend: BiometricRef) -> Result<(), EngineError> {
        let method = backend.method().clone();
        {
            let mut backends = self.backends.write().await;
            if backends.iter().any(|b| b.method().id() == method.id()) {
                return Err(EngineError::DuplicateMethod { id: method.id() });
            }
            backends.push(backend);
        }
        self.bus.publish(
            Event::new(EventKind::BackendRegistered)
                .with_method(method.id())
                .with_detail(method.name()),
        );
        Ok(())
    }

    /// Runs `init` in the background and registers its backend on success.
    ///
    /// `listener` (if any) hears about completion after registration. The join handle
    /// resolves to the init/registration result.
    pub fn spawn_init<F>(
        self: &Arc<Self>,
        method: BiometricMethod,
        init: F,
        listener: Option<Arc<dyn InitListener>>,
    ) -> JoinHandle<Result<(), EngineError>>
    where
        F: Future<Output = Result<BiometricRef, EngineError>> + Send + 'static,
    {
        let me = Arc::clone(self);
        self.handle.spawn(async move {
            let res = match init.await {
                Ok(backend) => me.register(Arc::clone(&backend)).await.map(|()| backend),
                Err(e) => Err(e),
            };
            match res {
                Ok(backend) => {
                    if let Some(l) = &listener {
                        l.init_finished(&method, Some(&backend));
                    }
                    Ok(())
                }
                Err(e) => {
                    me.bus.publish(
                        Event::new(EventKind::BackendInitFailed)
                            .with_method(method.id())
                            .with_detail(e.to_string()),
                    );
                    if let Some(l) = &listener {
                        l.init_finished(&method, None);
                    }
                    Err(e)
                }
            }
        })
    }

    /// Returns the backend answering for `id`.
    pub async fn get(&self, id: MethodId) -> Result<BiometricRef, EngineError> {
        self.backends
            .read()
            .await
            .iter()
            .find(|b| b.method().id() == id)
            .cloned()
            .ok_or(EngineError::UnknownMethod { id })
    }

    /// Methods of all registered backends, in registration order.
    pub async fn methods(&self) -> Vec<BiometricMethod> {
        self.backends
            .read()
            .await
            .iter()
            .map(|b| b.method().clone())
            .collect()
    }

    /// Probe snapshot of every backend.
    pub async fn capabilities(&self) -> Vec<(BiometricMethod, Capabilities)> {
        self.backends
            .read()
            .await
            .iter()
            .map(|b| (b.method().clone(), b.capabilities()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.backends.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.backends.read().await.is_empty()
    }
}
