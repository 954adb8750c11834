//! Retry and restart policies.
//!
//! This module groups the knobs that control **whether** a failed scan is retried
//! and **how long** to wait before the sensor is re-armed.
//!
//! ## Contents
//! - [`RestartPolicy`] per-session retry decision (trait), [`RetryBudget`] default impl
//! - [`BackoffPolicy`] delay before the next scan (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization of that delay
//!
//! ## Quick wiring
//! ```text
//! authenticate(token, listener, policy: PolicyBox)
//!      └─► core::attempt::Attempt uses:
//!           - policy.should_restart(reason) to decide re-arm/finish
//!           - cfg.retry_delay.next(retry) to pause before the next scan
//! ```
//!
//! ## Defaults
//! - `Config::retries = 0` → `RetryBudget::none()` per session.
//! - `BackoffPolicy::default()` → constant 250ms, max=5s, jitter=None.

mod backoff;
mod jitter;
mod restart;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use restart::{PolicyBox, RestartPolicy, RetryBudget};
