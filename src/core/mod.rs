//! Runtime core: sessions, delivery and wiring.
//!
//! Public API from this module: [`Engine`], [`Registry`], [`Context`], the
//! [`Schedule`] callback context and the session [`AttemptHandle`].
//!
//! Internal modules:
//! - [`attempt`]: runs one session with restart policy, retry delay and lockout;
//! - [`runner`]: executes one scan with timeout/cancellation and event publishing;
//! - [`delivery`]: exactly-once gate in front of the listener;
//! - [`lockout`]: per-backend lockout state;
//! - [`registry`]: initialized backends by method id.

use std::any::Any;

pub(crate) mod attempt;
mod builder;
mod context;
mod delivery;
mod engine;
mod handle;
mod lockout;
mod registry;
mod runner;
mod schedule;

pub use builder::EngineBuilder;
pub use context::Context;
pub use engine::Engine;
pub use handle::{AttemptHandle, AttemptReport, Outcome};
pub use lockout::{LockState, Lockout};
pub use registry::{InitListener, Registry};
pub use schedule::{Job, MainQueue, Schedule};

/// Extracts the message of a caught panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
