//! # Restart policies for authentication sessions.
//!
//! A [`RestartPolicy`] is consulted after every failed scan (except cancellation)
//! and decides whether the session re-arms the sensor.
//!
//! Policies are **stateful** and **per session**: the backend takes ownership of a
//! boxed policy for the lifetime of one `authenticate` call, so a budget can never be
//! shared between sessions or carried into the next one.
//!
//! ## Default policy
//! ```text
//! RetryBudget::new(n)
//!   should_restart(reason):
//!     ├─ already exhausted         → false
//!     ├─ spend one unit (saturating)
//!     ├─ reason not retryable      → exhausted, false
//!     ├─ a unit was available      → true
//!     └─ budget empty              → exhausted, false
//! ```
//!
//! With `n` retries and a retryable reason the sensor is scanned `n + 1` times.
//!
//! ## Custom policies
//! Any `FnMut(FailureReason) -> bool + Send` is a policy:
//! ```rust
//! use biovisor::{FailureReason, RestartPolicy};
//!
//! let mut only_timeouts = |r: FailureReason| r == FailureReason::Timeout;
//! assert!(only_timeouts.should_restart(FailureReason::Timeout));
//! assert!(!only_timeouts.should_restart(FailureReason::SensorFailed));
//! ```

use crate::error::FailureReason;

/// Per-session retry decision.
pub trait RestartPolicy: Send + 'static {
    /// Returns `true` if the session should scan again after `reason`.
    fn should_restart(&mut self, reason: FailureReason) -> bool;
}

impl<F> RestartPolicy for F
where
    F: FnMut(FailureReason) -> bool + Send + 'static,
{
    fn should_restart(&mut self, reason: FailureReason) -> bool {
        self(reason)
    }
}

/// Owned policy handed to a backend for one session.
pub type PolicyBox = Box<dyn RestartPolicy>;

/// Bounded retry counter with monotonic exhaustion.
///
/// ### Rules
/// - Every call spends one unit (saturating at zero).
/// - Non-retryable reasons return `false` regardless of remaining budget.
/// - Once `false` has been returned, every later call returns `false`.
/// - Decisions depend only on `(reason, counter)`: two budgets built with the same
///   `n` and fed the same reasons decide identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryBudget {
    remaining: u32,
    exhausted: bool,
}

impl RetryBudget {
    /// Creates a budget granting at most `retries` retries.
    pub fn new(retries: u32) -> Self {
        Self {
            remaining: retries,
            exhausted: false,
        }
    }

    /// A budget that never retries.
    pub fn none() -> Self {
        Self::new(0)
    }

    /// Retries still available.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns `true` once the policy has declined a retry.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Boxes the budget for [`Biometric::authenticate`](crate::Biometric::authenticate).
    pub fn boxed(self) -> PolicyBox {
        Box::new(self)
    }
}

impl RestartPolicy for RetryBudget {
    fn should_restart(&mut self, reason: FailureReason) -> bool {
        if self.exhausted {
            return false;
        }
        let had_budget = self.remaining > 0;
        self.remaining = self.remaining.saturating_sub(1);

        if !reason.is_retryable() || !had_budget {
            self.exhausted = true;
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grants_exactly_n_retries() {
        let mut p = RetryBudget::new(3);
        let granted = (0..10)
            .filter(|_| p.should_restart(FailureReason::AuthenticationFailed))
            .count();
        assert_eq!(granted, 3);
        assert!(p.is_exhausted());
    }

    #[test]
    fn zero_budget_never_retries() {
        let mut p = RetryBudget::none();
        assert!(!p.should_restart(FailureReason::Timeout));
        assert!(p.is_exhausted());
    }

    #[test]
    fn non_retryable_declines_with_budget_left() {
        for reason in [
            FailureReason::LockedOut,
            FailureReason::HardwareUnavailable,
            FailureReason::Cancelled,
        ] {
            let mut p = RetryBudget::new(5);
            assert!(!p.should_restart(reason), "{reason:?} must not be retried");
        }
    }

    #[test]
    fn exhaustion_is_monotonic() {
        let mut p = RetryBudget::new(5);
        assert!(p.should_restart(FailureReason::SensorFailed));
        assert!(!p.should_restart(FailureReason::LockedOut));
        // Budget is left, but the policy already said no.
        assert_eq!(p.remaining(), 3);
        assert!(!p.should_restart(FailureReason::SensorFailed));
        assert!(!p.should_restart(FailureReason::Timeout));
    }

    #[test]
    fn identical_inputs_identical_decisions() {
        let reasons = [
            FailureReason::SensorFailed,
            FailureReason::Timeout,
            FailureReason::AuthenticationFailed,
            FailureReason::SensorFailed,
            FailureReason::Timeout,
        ];
        let mut a = RetryBudget::new(3);
        let mut b = RetryBudget::new(3);
        let da: Vec<bool> = reasons.iter().map(|r| a.should_restart(*r)).collect();
        let db: Vec<bool> = reasons.iter().map(|r| b.should_restart(*r)).collect();
        assert_eq!(da, db);
        assert_eq!(da, vec![true, true, true, false, false]);
    }

    #[test]
    fn closure_is_a_policy() {
        let mut calls = 0;
        let mut p: PolicyBox = Box::new(move |_r: FailureReason| {
            calls += 1;
            calls < 2
        });
        assert!(p.should_restart(FailureReason::Timeout));
        assert!(!p.should_restart(FailureReason::Timeout));
    }
}
