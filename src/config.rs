//! # Engine configuration.
//!
//! Provides [`Config`], the centralized settings for backends built by the
//! [`Engine`](crate::Engine).
//!
//! Config is used in two ways:
//! 1. **Engine creation**: `Engine::builder(config)`
//! 2. **Session defaults**: `config.restart_policy()` builds a fresh budget per session
//!
//! ## Sentinel values
//! - `scan_timeout = 0s` → no per-scan timeout
//! - `lockout_duration = 0s` → lockout codes are reported but never remembered

use std::time::Duration;

use crate::policies::{BackoffPolicy, PolicyBox, RetryBudget};

/// Engine-wide settings.
///
/// ## Field semantics
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `placeholder_delay`: how long the placeholder backend "scans" before failing
/// - `scan_timeout`: bound on one sensor scan (`0s` = none)
/// - `retries`: retry budget of [`Config::restart_policy`]
/// - `retry_delay`: pause between a granted retry and the next scan
/// - `lockout_duration`: how long a temporary lockout lasts (`0s` = not tracked)
/// - `lockout_on_exhaustion`: escalate an exhausted mismatch to `LockedOut`
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Delay before the placeholder backend reports its failure.
    pub placeholder_delay: Duration,

    /// Maximum duration of one scan.
    ///
    /// A scan that exceeds it is aborted (its child token is cancelled) and
    /// reported as `FailureReason::Timeout`.
    pub scan_timeout: Duration,

    /// Retries granted by the default per-session policy.
    pub retries: u32,

    /// Delay between a granted retry and the next scan.
    pub retry_delay: BackoffPolicy,

    /// Duration of a temporary lockout.
    pub lockout_duration: Duration,

    /// When the policy declines a retry for `SensorFailed`/`AuthenticationFailed`,
    /// lock the sensor out and report `LockedOut` instead.
    pub lockout_on_exhaustion: bool,
}

impl Config {
    /// Returns the per-scan timeout as an `Option`.
    #[inline]
    pub fn scan_timeout(&self) -> Option<Duration> {
        if self.scan_timeout == Duration::ZERO {
            None
        } else {
            Some(self.scan_timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Builds a fresh default restart policy for one session.
    pub fn restart_policy(&self) -> PolicyBox {
        RetryBudget::new(self.retries).boxed()
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `placeholder_delay = 2500ms`
    /// - `scan_timeout = 30s`
    /// - `retries = 0`
    /// - `retry_delay = BackoffPolicy::default()` (constant 250ms)
    /// - `lockout_duration = 30s`
    /// - `lockout_on_exhaustion = false`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            placeholder_delay: Duration::from_millis(2500),
            scan_timeout: Duration::from_secs(30),
            retries: 0,
            retry_delay: BackoffPolicy::default(),
            lockout_duration: Duration::from_secs(30),
            lockout_on_exhaustion: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureReason;

    #[test]
    fn zero_timeout_means_none() {
        let cfg = Config {
            scan_timeout: Duration::ZERO,
            ..Config::default()
        };
        assert!(cfg.scan_timeout().is_none());
        assert_eq!(Config::default().scan_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn bus_capacity_never_zero() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn each_session_gets_a_fresh_budget() {
        let cfg = Config {
            retries: 1,
            ..Config::default()
        };
        let mut first = cfg.restart_policy();
        assert!(first.should_restart(FailureReason::Timeout));
        assert!(!first.should_restart(FailureReason::Timeout));

        let mut second = cfg.restart_policy();
        assert!(second.should_restart(FailureReason::Timeout));
    }
}
