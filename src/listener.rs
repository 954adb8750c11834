//! # Result listener contract.
//!
//! [`AuthListener`] is the sink for one authentication session:
//!
//! ```text
//! Running ──► (help | retrying failure)* ──► terminal (success | failure)
//! ```
//!
//! ## Rules
//! - Exactly **one** terminal call per session: `on_success`, or `on_failure` with
//!   [`Failure::will_retry`] == `false`.
//! - Zero or more non-terminal calls before it: `on_help`, and `on_failure` with
//!   `will_retry == true` (one per scan that is about to be retried).
//! - Nothing is delivered after the terminal call.
//! - Calls run on the engine callback context, one at a time, in order.
//!
//! Callbacks should return quickly; a panic is caught and published as
//! `EventKind::ListenerPanicked`, and the session still counts as delivered.

use std::sync::Arc;

use crate::error::FailureReason;
use crate::method::MethodId;

/// One failed scan as seen by the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure {
    /// Why the scan failed.
    pub reason: FailureReason,
    /// Method of the reporting backend.
    pub method: MethodId,
    /// Scan number within the session (1-based, `0` if no scan was started).
    pub scan: u32,
    /// `true` if the session re-arms after this failure (non-terminal notification).
    pub will_retry: bool,
}

impl Failure {
    /// Returns `true` if this is the last callback of the session.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !self.will_retry
    }
}

/// Non-terminal guidance reported by the sensor while a scan is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpReason {
    Good,
    Partial,
    Insufficient,
    SensorDirty,
    TooSlow,
    TooFast,
    /// Vendor-specific code without a portable meaning.
    Vendor(i32),
}

impl HelpReason {
    /// Maps a platform "acquired" code to a help reason.
    ///
    /// ```
    /// use biovisor::HelpReason;
    ///
    /// assert_eq!(HelpReason::from_code(3), HelpReason::SensorDirty);
    /// assert_eq!(HelpReason::from_code(1001), HelpReason::Vendor(1001));
    /// ```
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => HelpReason::Good,
            1 => HelpReason::Partial,
            2 => HelpReason::Insufficient,
            3 => HelpReason::SensorDirty,
            4 => HelpReason::TooSlow,
            5 => HelpReason::TooFast,
            other => HelpReason::Vendor(other),
        }
    }
}

/// Help event: a reason plus an optional vendor-provided message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Help {
    pub reason: HelpReason,
    pub message: Option<Arc<str>>,
}

impl Help {
    pub fn new(reason: HelpReason) -> Self {
        Self {
            reason,
            message: None,
        }
    }

    #[inline]
    pub fn with_message(mut self, message: impl Into<Arc<str>>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Callback surface for one authentication session.
///
/// # Example
/// ```
/// use biovisor::{AuthListener, Failure, MethodId};
///
/// struct Print;
///
/// impl AuthListener for Print {
///     fn on_success(&self, method: MethodId) {
///         println!("authenticated by {method}");
///     }
///     fn on_failure(&self, failure: &Failure) {
///         if failure.is_terminal() {
///             println!("gave up: {}", failure.reason);
///         }
///     }
/// }
/// ```
pub trait AuthListener: Send + Sync + 'static {
    /// Terminal success.
    fn on_success(&self, method: MethodId);

    /// A failed scan; terminal when [`Failure::will_retry`] is `false`.
    fn on_failure(&self, failure: &Failure);

    /// Non-terminal guidance; does not touch the restart policy.
    fn on_help(&self, _help: &Help, _method: MethodId) {}
}

/// Shared listener handle.
pub type ListenerRef = Arc<dyn AuthListener>;
