//! # Biometric backend contract.
//!
//! [`Biometric`] is what a caller sees: one authentication mechanism with three
//! capability probes and a cancellable, non-blocking `authenticate`.
//!
//! ```text
//! caller ──► authenticate(token, listener, policy) ──► AttemptHandle (immediately)
//!                         │
//!                         └──► [background session] ──► callback context ──► listener
//! ```
//!
//! ## Rules
//! - Probes are quick, synchronous and side-effect free.
//! - `authenticate` never blocks and never calls the listener inline.
//! - Each call is an independent session: its own token (child of the caller's),
//!   its own policy, its own exactly-once terminal callback.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::AttemptHandle;
use crate::error::FailureReason;
use crate::listener::ListenerRef;
use crate::method::BiometricMethod;
use crate::policies::PolicyBox;

/// Shared handle to a backend.
pub type BiometricRef = Arc<dyn Biometric>;

/// Snapshot of a backend's probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub manager_accessible: bool,
    pub hardware_present: bool,
    pub enrolled: bool,
    pub locked_out: bool,
}

impl Capabilities {
    /// Reason a session would end without scanning, if any.
    ///
    /// A backend without a manager is judged by its hardware probe alone.
    pub fn blocking_reason(&self) -> Option<FailureReason> {
        if !self.hardware_present {
            Some(FailureReason::NoHardware)
        } else if !self.enrolled {
            Some(FailureReason::NoBiometricsRegistered)
        } else if self.locked_out {
            Some(FailureReason::LockedOut)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_usable(&self) -> bool {
        self.blocking_reason().is_none()
    }
}

/// One authentication mechanism.
///
/// Implemented by [`SensorBackend`](crate::SensorBackend) for real sensors and by
/// [`PlaceholderBackend`](crate::PlaceholderBackend) for the stand-in.
pub trait Biometric: Send + Sync + 'static {
    /// The method this backend answers for.
    fn method(&self) -> &BiometricMethod;

    /// The vendor service/manager can be reached.
    fn is_manager_accessible(&self) -> bool;

    /// The physical sensor exists.
    fn is_hardware_present(&self) -> bool;

    /// At least one credential is enrolled.
    fn has_enrolled(&self) -> bool;

    /// The sensor is locked out after too many failures.
    fn is_locked_out(&self) -> bool {
        false
    }

    /// Starts a session and returns immediately.
    ///
    /// The session runs until success, a failure the policy declines to restart, or
    /// until `token` (or [`AttemptHandle::cancel`]) fires. Exactly one terminal
    /// callback reaches `listener`.
    fn authenticate(
        &self,
        token: &CancellationToken,
        listener: ListenerRef,
        policy: PolicyBox,
    ) -> AttemptHandle;

    /// All probes at once.
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            manager_accessible: self.is_manager_accessible(),
            hardware_present: self.is_hardware_present(),
            enrolled: self.has_enrolled(),
            locked_out: self.is_locked_out(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_reason_follows_probe_order() {
        let mut caps = Capabilities::default();
        assert_eq!(caps.blocking_reason(), Some(FailureReason::NoHardware));

        caps.hardware_present = true;
        assert_eq!(caps.blocking_reason(), Some(FailureReason::NoBiometricsRegistered));

        caps.enrolled = true;
        caps.locked_out = true;
        assert_eq!(caps.blocking_reason(), Some(FailureReason::LockedOut));

        caps.locked_out = false;
        assert!(caps.is_usable());
    }
}
