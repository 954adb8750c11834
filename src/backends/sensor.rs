//! # Sensor seam and closure-backed sensor.
//!
//! A [`Sensor`] is what a vendor SDK looks like from the core: three quick status
//! probes and one async [`scan`](Sensor::scan) that arms the hardware once.
//! [`SensorBackend`](crate::SensorBackend) wraps a sensor into a full
//! [`Biometric`](crate::Biometric) backend with retries, timeouts, lockout and
//! exactly-once delivery.
//!
//! A scan receives a [`Scan`] carrying a child [`CancellationToken`]. The token is
//! cancelled when the session is cancelled or the scan times out; a sensor that can
//! abort the hardware operation should do so when it fires.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use biovisor::{Help, HelpReason, Scan, ScanError, SensorFn};
//!
//! let sensor = SensorFn::new(|scan: Scan| async move {
//!     scan.help(Help::new(HelpReason::SensorDirty));
//!     tokio::select! {
//!         _ = scan.token().cancelled() => Err(ScanError::Vendor { code: biovisor::codes::CANCELED }),
//!         _ = tokio::time::sleep(Duration::from_millis(300)) => Ok(()),
//!     }
//! });
//! # let _ = sensor;
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::backends::codes;
use crate::error::FailureReason;
use crate::listener::Help;

/// Why a single scan did not match.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// A sample was read but matched no enrolled credential.
    #[error("no match")]
    NoMatch,
    /// Vendor error code (see [`codes`](crate::codes)).
    #[error("vendor error code {code}")]
    Vendor { code: i32 },
    /// Already classified failure.
    #[error("{0}")]
    Reason(FailureReason),
}

impl ScanError {
    /// Classifies the error.
    pub fn reason(&self) -> FailureReason {
        match self {
            ScanError::NoMatch => FailureReason::AuthenticationFailed,
            ScanError::Vendor { code } => codes::classify(*code),
            ScanError::Reason(r) => *r,
        }
    }

    pub(crate) fn lock_effect(&self) -> codes::LockEffect {
        match self {
            ScanError::Vendor { code } => codes::lock_effect(*code),
            ScanError::Reason(FailureReason::LockedOut) => codes::LockEffect::Temporary,
            _ => codes::LockEffect::None,
        }
    }
}

pub(crate) type HelpSink = Arc<dyn Fn(Help) + Send + Sync>;

/// One arming of the sensor.
pub struct Scan {
    token: CancellationToken,
    number: u32,
    help: HelpSink,
}

impl Scan {
    pub(crate) fn new(token: CancellationToken, number: u32, help: HelpSink) -> Self {
        Self {
            token,
            number,
            help,
        }
    }

    /// Token cancelled on session cancellation or scan timeout.
    #[inline]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Scan number within the session (1-based).
    #[inline]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Reports non-terminal guidance to the session listener.
    pub fn help(&self, help: Help) {
        (self.help)(help);
    }
}

impl fmt::Debug for Scan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scan")
            .field("number", &self.number)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

/// Vendor sensor as seen by the core.
///
/// Probes must be quick status checks. `scan` runs on a background task and should
/// watch [`Scan::token`] to abort early.
#[async_trait]
pub trait Sensor: Send + Sync + 'static {
    /// The vendor service/manager can be reached.
    fn is_manager_accessible(&self) -> bool;

    /// The physical sensor exists.
    fn is_hardware_present(&self) -> bool;

    /// At least one credential is enrolled.
    fn has_enrolled(&self) -> bool;

    /// Arms the sensor once; `Ok(())` means a match.
    async fn scan(&self, scan: Scan) -> Result<(), ScanError>;
}

/// Closure-backed sensor with fixed probe answers.
///
/// Every scan calls the closure to build a fresh future.
pub struct SensorFn<F> {
    manager: bool,
    hardware: bool,
    enrolled: bool,
    f: F,
}

impl<F> SensorFn<F> {
    /// Creates a sensor that reports manager, hardware and enrollment as present.
    pub fn new(f: F) -> Self {
        Self {
            manager: true,
            hardware: true,
            enrolled: true,
            f,
        }
    }

    pub fn without_manager(mut self) -> Self {
        self.manager = false;
        self
    }

    pub fn without_hardware(mut self) -> Self {
        self.hardware = false;
        self
    }

    pub fn without_enrollment(mut self) -> Self {
        self.enrolled = false;
        self
    }
}

#[async_trait]
impl<F, Fut> Sensor for SensorFn<F>
where
    F: Fn(Scan) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ScanError>> + Send + 'static,
{
    fn is_manager_accessible(&self) -> bool {
        self.manager
    }

    fn is_hardware_present(&self) -> bool {
        self.hardware
    }

    fn has_enrolled(&self) -> bool {
        self.enrolled
    }

    async fn scan(&self, scan: Scan) -> Result<(), ScanError> {
        (self.f)(scan).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_errors_classify() {
        assert_eq!(ScanError::NoMatch.reason(), FailureReason::AuthenticationFailed);
        assert_eq!(
            ScanError::Vendor { code: codes::TIMEOUT }.reason(),
            FailureReason::Timeout
        );
        assert_eq!(
            ScanError::Reason(FailureReason::PermissionsRequired).reason(),
            FailureReason::PermissionsRequired
        );
    }

    #[test]
    fn classified_lockout_locks() {
        assert_eq!(
            ScanError::Reason(FailureReason::LockedOut).lock_effect(),
            codes::LockEffect::Temporary
        );
        assert_eq!(ScanError::NoMatch.lock_effect(), codes::LockEffect::None);
    }
}
