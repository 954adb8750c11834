//! # Attempt: one authentication session.
//!
//! Drives one `authenticate` call from the first scan to the terminal callback:
//! - capability and lockout precheck,
//! - scans via [`scan_once`],
//! - restarts per the session's [`RestartPolicy`](crate::RestartPolicy),
//! - delays per [`BackoffPolicy`] between a granted retry and the next scan,
//! - cooperative cancellation via the session [`CancellationToken`].
//!
//! ## Event flow
//! ```text
//! AttemptStarting → ScanStarting → [scan] → AttemptSucceeded
//!                                         → ScanFailed → RetryScheduled → [sleep] → ScanStarting ...
//!                                         → ScanFailed → AttemptFailed / AttemptExhausted
//!                 (token fired anywhere)  → AttemptCancelled
//! ```
//!
//! ## Architecture
//! ```text
//! Biometric::authenticate ──► Session::open ──► spawn(Attempt::run)
//!
//! precheck (hardware, enrollment, lockout) ─► finish without scanning
//! loop {
//!   ├─► token fired?            → finish(Cancelled)
//!   ├─► scan += 1, publish ScanStarting
//!   ├─► scan_once()
//!   │     ├─ Matched            → finish(Succeeded)
//!   │     ├─ Cancelled          → finish(Cancelled)
//!   │     └─ Failed(reason)
//!   │          ├─ policy says retry → on_failure(will_retry) ─► sleep(delay) ─► continue
//!   │          └─ policy declines   → finish(Failed / Exhausted)
//! }
//! ```
//!
//! ## Rules
//! - Scans run **sequentially** within one session (never parallel)
//! - The policy is consulted only for failures, never for success or cancellation
//! - Exactly one terminal callback per session (see [`Delivery`]), even when sensor
//!   or policy code panics

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    backends::{HelpSink, Sensor},
    config::Config,
    core::{
        context::Context,
        delivery::Delivery,
        handle::{AttemptReport, Outcome},
        lockout::{LockState, Lockout},
        panic_message,
        runner::{scan_once, ScanVerdict},
    },
    error::FailureReason,
    events::{Bus, Event, EventKind},
    listener::{Help, ListenerRef},
    method::MethodId,
    policies::{BackoffPolicy, PolicyBox},
};

static SESSION_SEQ: AtomicU64 = AtomicU64::new(1);

/// Per-session state shared by every backend kind: id, token, delivery gate.
pub(crate) struct Session {
    id: u64,
    method: MethodId,
    token: CancellationToken,
    delivery: Delivery,
    bus: Bus,
}

impl Session {
    /// Opens a session whose token is a child of `caller`, publishing `AttemptStarting`.
    pub(crate) fn open(
        ctx: &Context,
        method: MethodId,
        caller: &CancellationToken,
        listener: ListenerRef,
    ) -> Self {
        let id = SESSION_SEQ.fetch_add(1, Ordering::Relaxed);
        let token = caller.child_token();
        let delivery = Delivery::new(listener, method, token.clone(), Arc::clone(ctx.queue()));
        let bus = ctx.bus().clone();

        bus.publish(
            Event::new(EventKind::AttemptStarting)
                .with_method(method)
                .with_session(id),
        );
        Self {
            id,
            method,
            token,
            delivery,
            bus,
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub(crate) fn method(&self) -> MethodId {
        self.method
    }

    #[inline]
    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    #[inline]
    pub(crate) fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Publishes `ScanStarting` for scan number `scan`.
    pub(crate) fn scan_starting(&self, scan: u32) {
        self.bus.publish(
            Event::new(EventKind::ScanStarting)
                .with_method(self.method)
                .with_session(self.id)
                .with_scan(scan),
        );
    }

    /// Help callback handed to the sensor for scan number `scan`.
    pub(crate) fn help_sink(&self, scan: u32) -> HelpSink {
        let delivery = self.delivery.clone();
        let bus = self.bus.clone();
        let (method, id) = (self.method, self.id);
        Arc::new(move |help: Help| {
            bus.publish(
                Event::new(EventKind::HelpReported)
                    .with_method(method)
                    .with_session(id)
                    .with_scan(scan)
                    .with_detail(format!("{:?}", help.reason)),
            );
            delivery.help(help);
        })
    }

    /// Reports a failed scan that will be retried after `delay`.
    pub(crate) fn retrying(&self, reason: FailureReason, scan: u32, delay: Duration) {
        self.delivery.retrying(reason, scan);
        self.bus.publish(
            Event::new(EventKind::RetryScheduled)
                .with_method(self.method)
                .with_session(self.id)
                .with_scan(scan)
                .with_reason(reason)
                .with_delay(delay),
        );
    }

    /// Publishes `SessionPanicked` for a panic caught during scan number `scan`.
    pub(crate) fn panicked(&self, scan: u32, info: String) {
        self.bus.publish(
            Event::new(EventKind::SessionPanicked)
                .with_method(self.method)
                .with_session(self.id)
                .with_scan(scan)
                .with_detail(info),
        );
    }

    /// Delivers the terminal callback and waits until it ran on the callback context.
    ///
    /// The returned report carries the outcome the listener actually received, which
    /// is `Cancelled` whenever the token fired before delivery.
    pub(crate) async fn finish(&self, intended: Outcome, scans: u32) -> AttemptReport {
        let outcome = match self.delivery.finish(intended, scans).await {
            Ok(Some(delivered)) => delivered,
            Ok(None) => intended,
            // Callback context is gone; nothing was delivered.
            Err(_) if self.token.is_cancelled() => Outcome::Cancelled,
            Err(_) => intended,
        };

        let kind = match outcome {
            Outcome::Succeeded => EventKind::AttemptSucceeded,
            Outcome::Failed(_) => EventKind::AttemptFailed,
            Outcome::Exhausted(_) => EventKind::AttemptExhausted,
            Outcome::Cancelled => EventKind::AttemptCancelled,
        };
        let mut ev = Event::new(kind)
            .with_method(self.method)
            .with_session(self.id)
            .with_scan(scans);
        if let Some(reason) = outcome.reason() {
            ev = ev.with_reason(reason);
        }
        self.bus.publish(ev);

        AttemptReport { outcome, scans }
    }
}

/// Session parameters taken from [`Config`].
#[derive(Clone, Debug)]
pub(crate) struct AttemptParams {
    /// Per-scan timeout (`None` = unbounded).
    pub timeout: Option<Duration>,
    /// Delay between a granted retry and the next scan.
    pub retry_delay: BackoffPolicy,
    /// Duration of a temporary lockout.
    pub lockout_duration: Duration,
    /// Escalate an exhausted mismatch to `LockedOut`.
    pub lockout_on_exhaustion: bool,
}

impl From<&Config> for AttemptParams {
    fn from(cfg: &Config) -> Self {
        Self {
            timeout: cfg.scan_timeout(),
            retry_delay: cfg.retry_delay,
            lockout_duration: cfg.lockout_duration,
            lockout_on_exhaustion: cfg.lockout_on_exhaustion,
        }
    }
}

/// Runs one session against a [`Sensor`].
pub(crate) struct Attempt<S: ?Sized> {
    pub sensor: Arc<S>,
    pub session: Session,
    pub policy: PolicyBox,
    pub lockout: Arc<Lockout>,
    pub params: AttemptParams,
}

impl<S: Sensor + ?Sized> Attempt<S> {
    /// Runs the session until success, a declined restart, or cancellation.
    ///
    /// ### Exit conditions
    /// - a scan matched;
    /// - a scan failed and the policy declined a restart;
    /// - the session token fired (checked before each scan, raced against each scan
    ///   and each retry delay);
    /// - the precheck found no hardware, no enrollment or an active lockout.
    ///
    /// A panic in sensor or policy code is recovered as `Failed(Unknown)`, so the
    /// listener still gets its terminal callback.
    pub(crate) async fn run(mut self) -> AttemptReport {
        let mut scans: u32 = 0;
        let caught = AssertUnwindSafe(self.drive(&mut scans)).catch_unwind().await;
        let outcome = match caught {
            Ok(outcome) => outcome,
            Err(panic) => {
                self.session.panicked(scans, panic_message(panic.as_ref()));
                Outcome::Failed(FailureReason::Unknown)
            }
        };
        self.session.finish(outcome, scans).await
    }

    async fn drive(&mut self, scans: &mut u32) -> Outcome {
        if let Some(reason) = self.precheck() {
            return Outcome::Failed(reason);
        }

        loop {
            if self.session.token().is_cancelled() {
                return Outcome::Cancelled;
            }
            *scans += 1;
            let scan = *scans;
            self.session.scan_starting(scan);

            let verdict = scan_once(
                &*self.sensor,
                &self.session,
                scan,
                self.params.timeout,
                &self.lockout,
                self.params.lockout_duration,
            )
            .await;

            let reason = match verdict {
                ScanVerdict::Matched => return Outcome::Succeeded,
                ScanVerdict::Cancelled => return Outcome::Cancelled,
                ScanVerdict::Failed(reason) => reason,
            };

            if !self.policy.should_restart(reason) {
                return self.declined(reason);
            }

            let delay = self.params.retry_delay.next(scan - 1);
            self.session.retrying(reason, scan, delay);
            select! {
                _ = self.session.token().cancelled() => return Outcome::Cancelled,
                _ = time::sleep(delay) => {}
            }
        }
    }

    /// Reason to finish without scanning, if any.
    fn precheck(&self) -> Option<FailureReason> {
        if !(self.sensor.is_manager_accessible() && self.sensor.is_hardware_present()) {
            return Some(FailureReason::NoHardware);
        }
        if !self.sensor.has_enrolled() {
            return Some(FailureReason::NoBiometricsRegistered);
        }
        match self.lockout.state() {
            LockState::Clear => None,
            LockState::Temporary => Some(FailureReason::LockedOut),
            LockState::Permanent => Some(FailureReason::HardwareUnavailable),
        }
    }

    /// Terminal outcome once the policy declined a restart for `reason`.
    fn declined(&self, reason: FailureReason) -> Outcome {
        if !reason.is_retryable() {
            return Outcome::Failed(reason);
        }
        let escalate = self.params.lockout_on_exhaustion
            && matches!(
                reason,
                FailureReason::SensorFailed | FailureReason::AuthenticationFailed
            );
        if escalate {
            self.lockout.engage(self.params.lockout_duration);
            return Outcome::Exhausted(FailureReason::LockedOut);
        }
        Outcome::Exhausted(reason)
    }
}
