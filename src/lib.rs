//! # biovisor
//!
//! **Biovisor** is a uniform authentication contract for heterogeneous biometric
//! backends (fingerprint, face, iris and a non-hardware placeholder).
//!
//! A caller asks "authenticate the user" through one trait, [`Biometric`], without
//! knowing which sensor or vendor SDK answers. Sessions are cancellable, retried per a
//! per-session [`RestartPolicy`], and report to an [`AuthListener`] with exactly one
//! terminal callback.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ SensorBackend│   │ SensorBackend│   │ Placeholder  │
//!     │ (fingerprint)│   │    (face)    │   │   Backend    │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Engine                                                           │
//! │  - Context (runtime handle + Schedule callback context + Bus)     │
//! │  - Registry (backends by method id)                               │
//! │  - SubscriberSet (fans out to user subscribers)                   │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │   Attempt    │   │   Attempt    │   │   Attempt    │   │
//!     │ (scan loop)  │   │ (scan loop)  │   │ (scan loop)  │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │ post callbacks   │                  │                 │
//!      ▼                  ▼                  ▼                 │
//! ┌───────────────────────────────────────────────────────┐    │
//! │ Schedule (MainQueue: one FIFO worker) ──► listeners   │    │
//! └───────────────────────────────────────────────────────┘    │
//!      │ publish events                                        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                            SubscriberSet ──► LogWriter / custom
//! ```
//!
//! ### Lifecycle
//! ```text
//! authenticate(token, listener, policy) ──► AttemptHandle (returns immediately)
//!
//! precheck ─► NoHardware / NoBiometricsRegistered / LockedOut ─► terminal, no scan
//! loop {
//!   ├─► token fired?  ─► on_failure(Cancelled), exit
//!   ├─► scan_once(child token, timeout)
//!   │       ├─ match        ─► on_success, exit
//!   │       ├─ cancelled    ─► on_failure(Cancelled), exit
//!   │       └─ failed(reason)
//!   │              ├─ policy.should_restart(reason) ─► on_failure(will_retry), sleep, continue
//!   │              └─ declined ─► on_failure(terminal), exit
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                               |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------------|
//! | **Backends**      | One trait for every mechanism, placeholder included.         | [`Biometric`], [`SensorBackend`], [`PlaceholderBackend`] |
//! | **Vendor seam**   | Plug a sensor SDK in as probes plus one async scan.          | [`Sensor`], [`SensorFn`], [`codes`]              |
//! | **Listener**      | Exactly-once terminal callback, ordered help/retry events.   | [`AuthListener`], [`Failure`], [`Help`]          |
//! | **Policies**      | Per-session retry decision and re-arm delay.                 | [`RestartPolicy`], [`RetryBudget`], [`BackoffPolicy`] |
//! | **Subscriber API**| Hook into session events (logging, metrics, custom).         | [`Subscribe`]                                    |
//! | **Configuration** | Centralize engine settings.                                  | [`Config`]                                       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use biovisor::{
//!     AuthListener, Biometric, BiometricMethod, Config, Engine, Failure, MethodId,
//!     Outcome, RetryBudget, Scan, ScanError, SensorFn,
//! };
//!
//! struct Print;
//! impl AuthListener for Print {
//!     fn on_success(&self, method: MethodId) {
//!         println!("authenticated by {method}");
//!     }
//!     fn on_failure(&self, failure: &Failure) {
//!         println!("scan {} failed: {}", failure.scan, failure.reason);
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let engine = Engine::builder(Config::default()).build();
//!
//!     // Mismatch on the first scan, match on the second.
//!     let sensor = SensorFn::new(|scan: Scan| async move {
//!         tokio::time::sleep(Duration::from_millis(5)).await;
//!         if scan.number() < 2 { Err(ScanError::NoMatch) } else { Ok(()) }
//!     });
//!     let backend = engine.sensor_backend(BiometricMethod::FINGERPRINT_API, sensor);
//!
//!     let token = CancellationToken::new();
//!     let report = backend
//!         .authenticate(&token, Arc::new(Print), RetryBudget::new(1).boxed())
//!         .wait()
//!         .await;
//!     assert_eq!(report.outcome, Outcome::Succeeded);
//!     assert_eq!(report.scans, 2);
//! }
//! ```

mod backends;
mod config;
mod core;
mod error;
mod events;
mod listener;
mod method;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use crate::backends::codes;
pub use crate::backends::{
    Biometric, BiometricRef, Capabilities, PlaceholderBackend, Scan, ScanError, Sensor,
    SensorBackend, SensorFn,
};
pub use crate::config::Config;
pub use crate::core::{
    AttemptHandle, AttemptReport, Context, Engine, EngineBuilder, InitListener, Job, LockState,
    Lockout, MainQueue, Outcome, Registry, Schedule,
};
pub use crate::error::{EngineError, FailureReason};
pub use crate::events::{Bus, Event, EventKind};
pub use crate::listener::{AuthListener, Failure, Help, HelpReason, ListenerRef};
pub use crate::method::{BiometricMethod, BiometricType, MethodId};
pub use crate::policies::{BackoffPolicy, JitterPolicy, PolicyBox, RestartPolicy, RetryBudget};
pub use crate::subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use crate::subscribers::LogWriter;
