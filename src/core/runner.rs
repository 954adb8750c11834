//! # Run a single scan of a session.
//!
//! Arms the sensor once with a child token, bounded by the optional per-scan timeout
//! and raced against the session token. Publishes scan-level events to the [`Bus`].
//!
//! ## Event flow
//!
//! ```text
//! Match:
//!   sensor.scan() → Ok(()) → Matched
//!
//! Failure:
//!   sensor.scan() → Err(e) → [lock effect] → publish ScanFailed → Failed(reason)
//!
//! Panic:
//!   sensor.scan() panics → cancel child → publish SessionPanicked → publish ScanFailed
//!                        → Failed(Unknown)
//!
//! Timeout:
//!   timeout exceeded → cancel child → publish TimeoutHit
//!                                   → publish ScanFailed (timeout)
//!                                   → Failed(Timeout)
//!
//! Cancellation:
//!   session token fires → cancel child → Cancelled (no ScanFailed)
//! ```
//!
//! ## Rules
//! - Derives a **child token** per scan; cancelling it never touches the session token
//! - Session cancellation wins over a scan result that is ready in the same poll
//! - A `Cancelled` reason reported by the sensor is a cancellation, not a failure
//! - A panicking sensor fails the scan with `Unknown`; it never takes the session down
//! - Lockout codes engage the backend [`Lockout`] before the failure is reported

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::{select, time};

use crate::{
    backends::{codes::LockEffect, Scan, ScanError, Sensor},
    core::{attempt::Session, lockout::Lockout, panic_message},
    error::FailureReason,
    events::{Bus, Event, EventKind},
    method::MethodId,
};

/// Result of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanVerdict {
    Matched,
    Failed(FailureReason),
    Cancelled,
}

/// Executes scan number `scan` of `session`.
///
/// ### Timeout behavior
/// If `timeout` is `Some(dur)`:
/// - the scan future is wrapped in `tokio::time::timeout`;
/// - on expiry the child token is cancelled, `TimeoutHit` is published and the scan
///   fails with `Timeout`.
///
/// ### Lockout
/// `Vendor { code: LOCKOUT }` and `Reason(LockedOut)` engage a temporary lockout of
/// `lockout_duration`; `Vendor { code: LOCKOUT_PERMANENT }` engages a permanent one.
pub(crate) async fn scan_once<S: Sensor + ?Sized>(
    sensor: &S,
    session: &Session,
    scan: u32,
    timeout: Option<Duration>,
    lockout: &Lockout,
    lockout_duration: Duration,
) -> ScanVerdict {
    let child = session.token().child_token();
    let armed = Scan::new(child.clone(), scan, session.help_sink(scan));
    let run = async {
        let caught = AssertUnwindSafe(async move { sensor.scan(armed).await })
            .catch_unwind()
            .await;
        match caught {
            Ok(r) => r,
            Err(panic) => {
                child.cancel();
                session.panicked(scan, panic_message(panic.as_ref()));
                Err(ScanError::Reason(FailureReason::Unknown))
            }
        }
    };

    let bounded = async {
        match timeout {
            Some(dur) => match time::timeout(dur, run).await {
                Ok(r) => r,
                Err(_elapsed) => {
                    child.cancel();
                    publish_timeout(session.bus(), session.method(), session.id(), scan, dur);
                    Err(ScanError::Reason(FailureReason::Timeout))
                }
            },
            None => run.await,
        }
    };

    let res = select! {
        biased;
        _ = session.token().cancelled() => {
            child.cancel();
            return ScanVerdict::Cancelled;
        }
        r = bounded => r,
    };

    let err = match res {
        Ok(()) => return ScanVerdict::Matched,
        Err(e) => e,
    };

    match err.lock_effect() {
        LockEffect::Temporary => lockout.engage(lockout_duration),
        LockEffect::Permanent => lockout.engage_permanent(),
        LockEffect::None => {}
    }

    let reason = err.reason();
    if reason == FailureReason::Cancelled {
        return ScanVerdict::Cancelled;
    }
    publish_failed(session.bus(), session.method(), session.id(), scan, reason, &err);
    ScanVerdict::Failed(reason)
}

/// Publishes `ScanFailed` with the raw error as detail.
fn publish_failed(
    bus: &Bus,
    method: MethodId,
    session: u64,
    scan: u32,
    reason: FailureReason,
    err: &ScanError,
) {
    bus.publish(
        Event::new(EventKind::ScanFailed)
            .with_method(method)
            .with_session(session)
            .with_scan(scan)
            .with_reason(reason)
            .with_detail(err.to_string()),
    );
}

/// Publishes `TimeoutHit` (always followed by `ScanFailed`).
fn publish_timeout(bus: &Bus, method: MethodId, session: u64, scan: u32, dur: Duration) {
    bus.publish(
        Event::new(EventKind::TimeoutHit)
            .with_method(method)
            .with_session(session)
            .with_scan(scan)
            .with_timeout(dur),
    );
}
