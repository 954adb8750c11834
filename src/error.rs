//! Failure classification and runtime errors.
//!
//! This module defines two enums:
//!
//! - [`FailureReason`]: why a single scan (or a whole session) did not succeed.
//!   Every failure delivered to an [`AuthListener`](crate::AuthListener) carries one.
//! - [`EngineError`]: errors raised by the engine surface itself (registry, init).
//!
//! Both provide `as_label` for logs/metrics. [`FailureReason`] additionally exposes
//! [`FailureReason::is_retryable`], which drives the default restart policy.

use thiserror::Error;

use crate::method::MethodId;

/// # Classified reason of an authentication failure.
///
/// Reasons fall into two groups:
/// - **retryable**: the next scan may succeed (`SensorFailed`, `Timeout`, `AuthenticationFailed`);
/// - **non-retryable**: retrying cannot help (`LockedOut`, `HardwareUnavailable`, ...).
///
/// [`FailureReason::Cancelled`] is special: it is always final and the restart policy
/// is never consulted for it.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The sensor could not read the sample (moved too quickly, dirty sensor, ...).
    #[error("sensor failed to read the sample")]
    SensorFailed,

    /// The sensor ran too long without reading anything.
    #[error("sensor timed out")]
    Timeout,

    /// A sample was read but did not match any enrolled credential.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Too many failed attempts; the sensor refuses further attempts for a while.
    #[error("too many attempts, sensor locked out")]
    LockedOut,

    /// The sensor exists but cannot be used right now (or is permanently locked).
    #[error("hardware unavailable")]
    HardwareUnavailable,

    /// No sensor of this modality is present.
    #[error("no hardware")]
    NoHardware,

    /// The user has not enrolled any credential of this modality.
    #[error("no biometrics enrolled")]
    NoBiometricsRegistered,

    /// The process lacks the permission to use the sensor.
    #[error("permissions required")]
    PermissionsRequired,

    /// The session token was cancelled.
    #[error("cancelled")]
    Cancelled,

    /// The backend reported something it could not classify.
    #[error("unknown failure")]
    Unknown,
}

impl FailureReason {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use biovisor::FailureReason;
    ///
    /// assert_eq!(FailureReason::LockedOut.as_label(), "locked_out");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FailureReason::SensorFailed => "sensor_failed",
            FailureReason::Timeout => "timeout",
            FailureReason::AuthenticationFailed => "authentication_failed",
            FailureReason::LockedOut => "locked_out",
            FailureReason::HardwareUnavailable => "hardware_unavailable",
            FailureReason::NoHardware => "no_hardware",
            FailureReason::NoBiometricsRegistered => "no_biometrics_registered",
            FailureReason::PermissionsRequired => "permissions_required",
            FailureReason::Cancelled => "cancelled",
            FailureReason::Unknown => "unknown",
        }
    }

    /// Indicates whether another scan may succeed after this failure.
    ///
    /// # Example
    /// ```
    /// use biovisor::FailureReason;
    ///
    /// assert!(FailureReason::Timeout.is_retryable());
    /// assert!(!FailureReason::LockedOut.is_retryable());
    /// assert!(!FailureReason::Cancelled.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FailureReason::SensorFailed | FailureReason::Timeout | FailureReason::AuthenticationFailed
        )
    }

    /// Returns `true` for reasons that end a session without consulting the restart policy.
    pub fn is_final(&self) -> bool {
        matches!(self, FailureReason::Cancelled)
    }
}

/// # Errors produced by the engine surface.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EngineError {
    /// A backend with the same method id is already registered.
    #[error("backend {id} is already registered")]
    DuplicateMethod {
        /// The conflicting method id.
        id: MethodId,
    },

    /// No backend with this method id is registered.
    #[error("backend {id} is not registered")]
    UnknownMethod {
        /// The requested method id.
        id: MethodId,
    },

    /// An asynchronous backend initializer did not produce a backend.
    #[error("backend init failed: {error}")]
    InitFailed {
        /// Why initialization failed.
        error: String,
    },
}

impl EngineError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EngineError::DuplicateMethod { .. } => "engine_duplicate_method",
            EngineError::UnknownMethod { .. } => "engine_unknown_method",
            EngineError::InitFailed { .. } => "engine_init_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_set_matches_taxonomy() {
        let retryable = [
            FailureReason::SensorFailed,
            FailureReason::Timeout,
            FailureReason::AuthenticationFailed,
        ];
        let terminal = [
            FailureReason::LockedOut,
            FailureReason::HardwareUnavailable,
            FailureReason::NoHardware,
            FailureReason::NoBiometricsRegistered,
            FailureReason::PermissionsRequired,
            FailureReason::Cancelled,
            FailureReason::Unknown,
        ];
        for r in retryable {
            assert!(r.is_retryable(), "{r:?} should be retryable");
            assert!(!r.is_final());
        }
        for r in terminal {
            assert!(!r.is_retryable(), "{r:?} should not be retryable");
        }
    }

    #[test]
    fn only_cancelled_is_final() {
        assert!(FailureReason::Cancelled.is_final());
        assert!(!FailureReason::LockedOut.is_final());
    }

    #[test]
    fn engine_error_labels() {
        let err = EngineError::DuplicateMethod { id: MethodId(7) };
        assert_eq!(err.as_label(), "engine_duplicate_method");
        assert_eq!(err.to_string(), "backend 7 is already registered");
    }
}
