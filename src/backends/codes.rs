//! # Vendor error-code classification.
//!
//! Sensor SDKs report failures as integer codes. This module maps the common
//! platform code space to a [`FailureReason`] and to the lockout side effect the
//! code implies.
//!
//! | code | constant            | reason                   | side effect          |
//! |------|---------------------|--------------------------|----------------------|
//! | 1    | `HW_UNAVAILABLE`    | `HardwareUnavailable`    |                      |
//! | 2    | `UNABLE_TO_PROCESS` | `SensorFailed`           |                      |
//! | 3    | `TIMEOUT`           | `Timeout`                |                      |
//! | 4    | `NO_SPACE`          | `SensorFailed`           |                      |
//! | 5    | `CANCELED`          | `Cancelled`              |                      |
//! | 7    | `LOCKOUT`           | `LockedOut`              | temporary lockout    |
//! | 9    | `LOCKOUT_PERMANENT` | `HardwareUnavailable`    | permanent lockout    |
//! | 10   | `USER_CANCELED`     | `Cancelled`              |                      |
//! | 11   | `NO_BIOMETRICS`     | `NoBiometricsRegistered` |                      |
//! | 12   | `HW_NOT_PRESENT`    | `NoHardware`             |                      |
//! | *    |                     | `Unknown`                |                      |

use crate::error::FailureReason;

pub const HW_UNAVAILABLE: i32 = 1;
pub const UNABLE_TO_PROCESS: i32 = 2;
pub const TIMEOUT: i32 = 3;
pub const NO_SPACE: i32 = 4;
pub const CANCELED: i32 = 5;
pub const LOCKOUT: i32 = 7;
pub const VENDOR: i32 = 8;
pub const LOCKOUT_PERMANENT: i32 = 9;
pub const USER_CANCELED: i32 = 10;
pub const NO_BIOMETRICS: i32 = 11;
pub const HW_NOT_PRESENT: i32 = 12;

/// Lockout implied by a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LockEffect {
    None,
    Temporary,
    Permanent,
}

/// Maps a vendor error code to a failure reason.
///
/// ```
/// use biovisor::{codes, FailureReason};
///
/// assert_eq!(codes::classify(codes::LOCKOUT), FailureReason::LockedOut);
/// assert_eq!(codes::classify(codes::VENDOR), FailureReason::Unknown);
/// ```
pub fn classify(code: i32) -> FailureReason {
    match code {
        NO_BIOMETRICS => FailureReason::NoBiometricsRegistered,
        HW_NOT_PRESENT => FailureReason::NoHardware,
        HW_UNAVAILABLE | LOCKOUT_PERMANENT => FailureReason::HardwareUnavailable,
        UNABLE_TO_PROCESS | NO_SPACE => FailureReason::SensorFailed,
        TIMEOUT => FailureReason::Timeout,
        LOCKOUT => FailureReason::LockedOut,
        CANCELED | USER_CANCELED => FailureReason::Cancelled,
        _ => FailureReason::Unknown,
    }
}

pub(crate) fn lock_effect(code: i32) -> LockEffect {
    match code {
        LOCKOUT => LockEffect::Temporary,
        LOCKOUT_PERMANENT => LockEffect::Permanent,
        _ => LockEffect::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lockout_codes_carry_side_effects() {
        assert_eq!(lock_effect(LOCKOUT), LockEffect::Temporary);
        assert_eq!(lock_effect(LOCKOUT_PERMANENT), LockEffect::Permanent);
        assert_eq!(lock_effect(TIMEOUT), LockEffect::None);
    }

    #[test]
    fn permanent_lockout_reads_as_unavailable() {
        assert_eq!(classify(LOCKOUT_PERMANENT), FailureReason::HardwareUnavailable);
    }

    #[test]
    fn both_cancel_codes_are_cancellation() {
        assert_eq!(classify(CANCELED), FailureReason::Cancelled);
        assert_eq!(classify(USER_CANCELED), FailureReason::Cancelled);
    }

    #[test]
    fn transient_codes_are_retryable() {
        for code in [UNABLE_TO_PROCESS, NO_SPACE, TIMEOUT] {
            assert!(classify(code).is_retryable(), "code {code}");
        }
        for code in [HW_UNAVAILABLE, LOCKOUT, NO_BIOMETRICS, HW_NOT_PRESENT, -1] {
            assert!(!classify(code).is_retryable(), "code {code}");
        }
    }
}
