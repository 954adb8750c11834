//! # Sensor lockout state.
//!
//! Vendors lock a sensor after too many failed attempts: temporarily (usually ~30s)
//! or permanently (until the device credential is used). [`Lockout`] remembers that
//! per backend so later sessions fail fast instead of arming a sensor that will refuse.
//!
//! This is device state, not session state: it is the only mutable state a backend
//! shares between sessions, and it is driven by what the hardware reports.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::events::{Bus, Event, EventKind};
use crate::method::MethodId;

/// Deadline used when `now + duration` does not fit in an [`Instant`] (about 30 years).
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Current lockout state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Clear,
    Temporary,
    Permanent,
}

/// Per-backend lockout tracker.
#[derive(Debug)]
pub struct Lockout {
    method: MethodId,
    until: Mutex<Option<Instant>>,
    permanent: AtomicBool,
    bus: Bus,
}

impl Lockout {
    pub fn new(method: MethodId, bus: Bus) -> Self {
        Self {
            method,
            until: Mutex::new(None),
            permanent: AtomicBool::new(false),
            bus,
        }
    }

    /// Locks the sensor for `duration`; a zero duration is not remembered.
    ///
    /// Durations past the clock's range are clamped to a far-future deadline.
    pub fn engage(&self, duration: Duration) {
        if duration == Duration::ZERO {
            return;
        }
        let now = Instant::now();
        let deadline = now
            .checked_add(duration)
            .unwrap_or_else(|| now + FAR_FUTURE);
        {
            let mut until = self.until.lock().unwrap_or_else(|e| e.into_inner());
            // Never shorten a lockout that is already running.
            if until.map_or(true, |cur| cur < deadline) {
                *until = Some(deadline);
            }
        }
        self.bus.publish(
            Event::new(EventKind::LockoutEngaged)
                .with_method(self.method)
                .with_delay(duration)
                .with_detail("temporary"),
        );
    }

    /// Locks the sensor until [`Lockout::clear`].
    pub fn engage_permanent(&self) {
        if !self.permanent.swap(true, Ordering::AcqRel) {
            self.bus.publish(
                Event::new(EventKind::LockoutEngaged)
                    .with_method(self.method)
                    .with_detail("permanent"),
            );
        }
    }

    /// Lifts any lockout (e.g. after the device credential was confirmed).
    pub fn clear(&self) {
        self.permanent.store(false, Ordering::Release);
        *self.until.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn state(&self) -> LockState {
        if self.permanent.load(Ordering::Acquire) {
            return LockState::Permanent;
        }
        let until = *self.until.lock().unwrap_or_else(|e| e.into_inner());
        match until {
            Some(deadline) if Instant::now() < deadline => LockState::Temporary,
            _ => LockState::Clear,
        }
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.state() != LockState::Clear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lockout() -> Lockout {
        Lockout::new(MethodId(1), Bus::new(4))
    }

    #[tokio::test(start_paused = true)]
    async fn temporary_lockout_expires() {
        let l = lockout();
        l.engage(Duration::from_secs(30));
        assert_eq!(l.state(), LockState::Temporary);

        tokio::time::advance(Duration::from_secs(29)).await;
        assert!(l.is_locked());
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(l.state(), LockState::Clear);
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_duration_is_clamped() {
        let l = lockout();
        l.engage(Duration::MAX);
        assert_eq!(l.state(), LockState::Temporary);

        tokio::time::advance(Duration::from_secs(86400 * 365)).await;
        assert_eq!(l.state(), LockState::Temporary);
    }

    #[tokio::test(start_paused = true)]
    async fn shorter_lockout_does_not_shorten() {
        let l = lockout();
        l.engage(Duration::from_secs(30));
        l.engage(Duration::from_secs(1));
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(l.is_locked());
    }

    #[tokio::test]
    async fn permanent_until_cleared() {
        let l = lockout();
        l.engage_permanent();
        assert_eq!(l.state(), LockState::Permanent);
        l.clear();
        assert_eq!(l.state(), LockState::Clear);
    }

    #[tokio::test]
    async fn zero_duration_is_ignored() {
        let l = lockout();
        l.engage(Duration::ZERO);
        assert!(!l.is_locked());
    }
}
