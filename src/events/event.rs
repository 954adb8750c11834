//! # Runtime events emitted by backends, sessions and the callback context.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Registry events**: backends becoming available (or failing to)
//! - **Session events**: scan flow (starting, failed, timeout, help, retry)
//! - **Terminal events**: how a session ended (succeeded, failed, exhausted, cancelled)
//! - **Delivery events**: listener/subscriber faults
//!
//! Events are an observability side channel. The listener stays the only channel that
//! carries outcomes to the caller.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use biovisor::{Event, EventKind, FailureReason, MethodId};
//!
//! let ev = Event::new(EventKind::ScanFailed)
//!     .with_method(MethodId(1))
//!     .with_scan(2)
//!     .with_reason(FailureReason::SensorFailed);
//!
//! assert_eq!(ev.kind, EventKind::ScanFailed);
//! assert_eq!(ev.reason, Some(FailureReason::SensorFailed));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::error::FailureReason;
use crate::method::MethodId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Registry events ===
    /// Backend was added to the registry.
    ///
    /// Sets: `method`, `detail` (method name)
    BackendRegistered,

    /// Asynchronous backend initializer failed.
    ///
    /// Sets: `detail` (error message)
    BackendInitFailed,

    // === Session events ===
    /// `authenticate` was called; session spawned.
    ///
    /// Sets: `method`, `session`
    AttemptStarting,

    /// Sensor is being armed for one scan.
    ///
    /// Sets: `method`, `session`, `scan`
    ScanStarting,

    /// Scan ended without a match.
    ///
    /// Sets: `method`, `session`, `scan`, `reason`
    ScanFailed,

    /// Scan exceeded the configured timeout (always followed by `ScanFailed`).
    ///
    /// Sets: `method`, `session`, `scan`, `timeout_ms`
    TimeoutHit,

    /// Sensor reported non-terminal guidance.
    ///
    /// Sets: `method`, `session`, `scan`, `detail`
    HelpReported,

    /// Sensor or policy code panicked inside a session; recovered as `Unknown`.
    ///
    /// Sets: `method`, `session`, `scan`, `detail` (panic message)
    SessionPanicked,

    /// Policy granted a retry; next scan after `delay_ms`.
    ///
    /// Sets: `method`, `session`, `scan` (failed scan), `reason`, `delay_ms`
    RetryScheduled,

    /// Backend entered lockout.
    ///
    /// Sets: `method`, `detail` ("temporary"/"permanent"), `delay_ms` (temporary duration)
    LockoutEngaged,

    // === Terminal events ===
    /// Session delivered success.
    ///
    /// Sets: `method`, `session`, `scan`
    AttemptSucceeded,

    /// Session delivered a terminal failure without exhausting a retryable budget.
    ///
    /// Sets: `method`, `session`, `scan`, `reason`
    AttemptFailed,

    /// Session ran out of retries for a retryable reason.
    ///
    /// Sets: `method`, `session`, `scan`, `reason`
    AttemptExhausted,

    /// Session delivered the cancellation failure.
    ///
    /// Sets: `method`, `session`, `scan`
    AttemptCancelled,

    // === Delivery events ===
    /// Listener panicked inside a callback.
    ///
    /// Sets: `detail` (panic message)
    ListenerPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `detail` (subscriber name and reason)
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `detail` (subscriber name and panic message)
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Method of the backend involved.
    pub method: Option<MethodId>,
    /// Session number (unique per `authenticate` call).
    pub session: Option<u64>,
    /// Scan number within the session (1-based).
    pub scan: Option<u32>,
    /// Failure classification.
    pub reason: Option<FailureReason>,
    /// Scan timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Free-form detail (names, panic messages, help text).
    pub detail: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            method: None,
            session: None,
            scan: None,
            reason: None,
            timeout_ms: None,
            delay_ms: None,
            detail: None,
        }
    }

    #[inline]
    pub fn with_method(mut self, method: MethodId) -> Self {
        self.method = Some(method);
        self
    }

    #[inline]
    pub fn with_session(mut self, session: u64) -> Self {
        self.session = Some(session);
        self
    }

    #[inline]
    pub fn with_scan(mut self, scan: u32) -> Self {
        self.scan = Some(scan);
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: FailureReason) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    #[inline]
    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_detail(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_detail(format!("subscriber={subscriber} info={info}"))
    }

    /// Returns `true` for the four session-ending kinds.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::AttemptSucceeded
                | EventKind::AttemptFailed
                | EventKind::AttemptExhausted
                | EventKind::AttemptCancelled
        )
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::ScanStarting);
        let b = Event::new(EventKind::ScanStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn huge_delay_is_saturated() {
        let ev = Event::new(EventKind::RetryScheduled).with_delay(Duration::from_secs(u64::MAX));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }

    #[test]
    fn terminal_kinds() {
        assert!(Event::new(EventKind::AttemptCancelled).is_terminal());
        assert!(!Event::new(EventKind::RetryScheduled).is_terminal());
    }
}
