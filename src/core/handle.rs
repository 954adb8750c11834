//! # Session handle and terminal outcome.
//!
//! `authenticate` returns an [`AttemptHandle`] immediately. The handle can cancel
//! just this session and await its [`AttemptReport`]; dropping it detaches the session,
//! which keeps running and still reports to its listener.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::FailureReason;

/// Terminal state of a session, as delivered to the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `on_success` was delivered.
    Succeeded,
    /// Terminal failure for a reason the policy does not retry (or was never asked about).
    Failed(FailureReason),
    /// The policy ran out of retries for a retryable reason.
    Exhausted(FailureReason),
    /// The session token fired; `on_failure(Cancelled)` was delivered.
    Cancelled,
}

impl Outcome {
    /// Failure reason delivered with this outcome, `None` for success.
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Outcome::Succeeded => None,
            Outcome::Failed(r) | Outcome::Exhausted(r) => Some(*r),
            Outcome::Cancelled => Some(FailureReason::Cancelled),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

/// Summary of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptReport {
    /// What the listener received as its terminal callback (see [`AttemptHandle::wait`]
    /// for the one case where nothing was delivered).
    pub outcome: Outcome,
    /// Number of scans started (`0` if the session ended before arming the sensor).
    pub scans: u32,
}

/// Handle to a running session.
#[derive(Debug)]
pub struct AttemptHandle {
    session: u64,
    token: CancellationToken,
    join: JoinHandle<AttemptReport>,
}

impl AttemptHandle {
    pub(crate) fn new(session: u64, token: CancellationToken, join: JoinHandle<AttemptReport>) -> Self {
        Self {
            session,
            token,
            join,
        }
    }

    /// Session number, as found in events.
    #[inline]
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Session token: a child of the caller's token.
    #[inline]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancels this session only; other sessions sharing the caller's token are unaffected.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the terminal callback has been handled.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits until the terminal callback has run on the callback context.
    ///
    /// Panics in sensor or policy code are recovered inside the session and delivered
    /// as `Failed(Unknown)`. Only a task torn down from outside (runtime shutdown) ends
    /// without a terminal callback; `wait` then also returns `Failed(Unknown)` with
    /// `scans == 0`, and the listener may not have been called.
    pub async fn wait(self) -> AttemptReport {
        match self.join.await {
            Ok(report) => report,
            Err(_) => AttemptReport {
                outcome: Outcome::Failed(FailureReason::Unknown),
                scans: 0,
            },
        }
    }
}
