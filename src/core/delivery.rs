//! # Exactly-once delivery gate.
//!
//! [`Delivery`] is the only path from a session to its listener. Every call is posted
//! to the callback context and re-checked there, at the moment it runs:
//!
//! ```text
//! help / retrying ──post──► [callback ctx] ──► done or cancelled? ─ yes ─► drop
//!                                                      └─ no ─► listener
//!
//! finish(outcome) ──post──► [callback ctx] ──► done? ─ yes ─► ack(None)
//!                                                └─ no ─► done = true
//!                                                          cancelled? ─ yes ─► on_failure(Cancelled)
//!                                                                └─ no ─► outcome callback
//!                                                          ack(Some(delivered))
//! ```
//!
//! ## Rules
//! - At most one terminal callback per session (`done` flips exactly once).
//! - Nothing is delivered after the terminal callback.
//! - A token that fired before the terminal callback runs turns any outcome into
//!   `Cancelled`: a late success is suppressed in favor of the caller's intent.
//! - Non-terminal callbacks are dropped once the token fired.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::core::handle::Outcome;
use crate::core::schedule::Schedule;
use crate::error::FailureReason;
use crate::listener::{Failure, Help, ListenerRef};
use crate::method::MethodId;

#[derive(Clone)]
pub(crate) struct Delivery {
    listener: ListenerRef,
    method: MethodId,
    token: CancellationToken,
    queue: Arc<dyn Schedule>,
    done: Arc<AtomicBool>,
}

impl Delivery {
    pub(crate) fn new(
        listener: ListenerRef,
        method: MethodId,
        token: CancellationToken,
        queue: Arc<dyn Schedule>,
    ) -> Self {
        Self {
            listener,
            method,
            token,
            queue,
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Posts a non-terminal help callback.
    pub(crate) fn help(&self, help: Help) {
        let me = self.clone();
        self.queue.post(Box::new(move || {
            if me.is_closed() {
                return;
            }
            me.listener.on_help(&help, me.method);
        }));
    }

    /// Posts the non-terminal failure of a scan that is about to be retried.
    pub(crate) fn retrying(&self, reason: FailureReason, scan: u32) {
        let me = self.clone();
        self.queue.post(Box::new(move || {
            if me.is_closed() {
                return;
            }
            me.listener.on_failure(&Failure {
                reason,
                method: me.method,
                scan,
                will_retry: true,
            });
        }));
    }

    /// Posts the terminal callback; the receiver resolves once it ran.
    ///
    /// Resolves to `None` if a terminal callback had already been delivered.
    pub(crate) fn finish(&self, outcome: Outcome, scan: u32) -> oneshot::Receiver<Option<Outcome>> {
        let (tx, rx) = oneshot::channel();
        let me = self.clone();
        self.queue.post(Box::new(move || {
            if me.done.swap(true, Ordering::AcqRel) {
                let _ = tx.send(None);
                return;
            }
            let delivered = if me.token.is_cancelled() {
                Outcome::Cancelled
            } else {
                outcome
            };
            // The ack must go out even if the listener panics; the queue reports the panic.
            let res = std::panic::catch_unwind(AssertUnwindSafe(|| me.deliver(delivered, scan)));
            let _ = tx.send(Some(delivered));
            if let Err(panic) = res {
                std::panic::resume_unwind(panic);
            }
        }));
        rx
    }

    fn deliver(&self, outcome: Outcome, scan: u32) {
        match outcome.reason() {
            None => self.listener.on_success(self.method),
            Some(reason) => self.listener.on_failure(&Failure {
                reason,
                method: self.method,
                scan,
                will_retry: false,
            }),
        }
    }

    fn is_closed(&self) -> bool {
        self.done.load(Ordering::Acquire) || self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schedule::MainQueue;
    use crate::events::Bus;
    use crate::listener::{AuthListener, HelpReason};
    use std::sync::Mutex;
    use tokio::runtime::Handle;

    #[derive(Default)]
    struct Log(Mutex<Vec<String>>);

    impl AuthListener for Log {
        fn on_success(&self, method: MethodId) {
            self.0.lock().unwrap().push(format!("success:{method}"));
        }
        fn on_failure(&self, f: &Failure) {
            self.0
                .lock()
                .unwrap()
                .push(format!("failure:{}:{}", f.reason.as_label(), f.will_retry));
        }
        fn on_help(&self, help: &Help, _method: MethodId) {
            self.0.lock().unwrap().push(format!("help:{:?}", help.reason));
        }
    }

    fn delivery(log: &Arc<Log>, token: &CancellationToken) -> Delivery {
        let queue = MainQueue::spawn(&Handle::current(), Bus::new(4));
        Delivery::new(log.clone(), MethodId(5), token.clone(), queue)
    }

    #[tokio::test]
    async fn second_terminal_is_swallowed() {
        let log = Arc::new(Log::default());
        let token = CancellationToken::new();
        let d = delivery(&log, &token);

        let first = d.finish(Outcome::Succeeded, 1);
        let second = d.finish(Outcome::Failed(FailureReason::LockedOut), 1);
        d.help(Help::new(HelpReason::TooFast));

        assert_eq!(first.await.unwrap(), Some(Outcome::Succeeded));
        assert_eq!(second.await.unwrap(), None);
        let flush = d.finish(Outcome::Succeeded, 1);
        assert_eq!(flush.await.unwrap(), None);

        assert_eq!(*log.0.lock().unwrap(), vec!["success:5".to_string()]);
    }

    #[tokio::test]
    async fn cancellation_suppresses_late_success() {
        let log = Arc::new(Log::default());
        let token = CancellationToken::new();
        let d = delivery(&log, &token);

        d.help(Help::new(HelpReason::Partial));
        d.retrying(FailureReason::SensorFailed, 1);
        token.cancel();
        let ack = d.finish(Outcome::Succeeded, 2);

        assert_eq!(ack.await.unwrap(), Some(Outcome::Cancelled));
        assert_eq!(
            *log.0.lock().unwrap(),
            vec!["failure:cancelled:false".to_string()]
        );
    }

    #[tokio::test]
    async fn non_terminal_callbacks_precede_terminal() {
        let log = Arc::new(Log::default());
        let token = CancellationToken::new();
        let d = delivery(&log, &token);

        d.help(Help::new(HelpReason::SensorDirty));
        d.retrying(FailureReason::Timeout, 1);
        d.finish(Outcome::Exhausted(FailureReason::Timeout), 2)
            .await
            .unwrap();

        assert_eq!(
            *log.0.lock().unwrap(),
            vec![
                "help:SensorDirty".to_string(),
                "failure:timeout:true".to_string(),
                "failure:timeout:false".to_string(),
            ]
        );
    }
}
