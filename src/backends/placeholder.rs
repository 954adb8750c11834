//! # Placeholder backend.
//!
//! Stand-in used when no real mechanism is wired up. It fronts no manager but claims
//! hardware and enrollment, so callers that only look at those two probes still offer
//! it. Every session "scans" for [`Config::placeholder_delay`] and then fails with
//! `AuthenticationFailed`; the restart policy is never consulted.

use std::time::Duration;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::backends::Biometric;
use crate::config::Config;
use crate::core::{attempt::Session, AttemptHandle, Context, Outcome};
use crate::error::FailureReason;
use crate::listener::ListenerRef;
use crate::method::BiometricMethod;
use crate::policies::PolicyBox;

/// Backend that always fails after a fixed delay.
pub struct PlaceholderBackend {
    method: BiometricMethod,
    ctx: Context,
    delay: Duration,
}

impl PlaceholderBackend {
    pub fn new(ctx: Context, delay: Duration) -> Self {
        Self {
            method: BiometricMethod::PLACEHOLDER,
            ctx,
            delay,
        }
    }

    pub fn from_config(ctx: Context, cfg: &Config) -> Self {
        Self::new(ctx, cfg.placeholder_delay)
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Biometric for PlaceholderBackend {
    fn method(&self) -> &BiometricMethod {
        &self.method
    }

    fn is_manager_accessible(&self) -> bool {
        false
    }

    fn is_hardware_present(&self) -> bool {
        true
    }

    fn has_enrolled(&self) -> bool {
        true
    }

    fn authenticate(
        &self,
        token: &CancellationToken,
        listener: ListenerRef,
        _policy: PolicyBox,
    ) -> AttemptHandle {
        let session = Session::open(&self.ctx, self.method.id(), token, listener);
        let id = session.id();
        let session_token = session.token().clone();
        let delay = self.delay;

        let join = self.ctx.spawn(async move {
            if session.token().is_cancelled() {
                return session.finish(Outcome::Cancelled, 0).await;
            }
            session.scan_starting(1);
            let outcome = select! {
                biased;
                _ = session.token().cancelled() => Outcome::Cancelled,
                _ = time::sleep(delay) => Outcome::Failed(FailureReason::AuthenticationFailed),
            };
            session.finish(outcome, 1).await
        });
        AttemptHandle::new(id, session_token, join)
    }
}
