//! # Designated callback context.
//!
//! Every listener callback of every session is posted to one [`Schedule`]
//! implementation. The default, [`MainQueue`], runs jobs one at a time on a single
//! worker task in the order they were posted, which is what gives a listener its
//! "never two callbacks at once, always in order" guarantee.
//!
//! ## Architecture
//! ```text
//! session A ──post(job)──┐
//! session B ──post(job)──┼──► [unbounded FIFO] ──► worker ──► job()
//! session C ──post(job)──┘                            └──► panic → ListenerPanicked
//! ```
//!
//! ## Rules
//! - Jobs never run concurrently with each other.
//! - Jobs run in post order (FIFO).
//! - The queue is unbounded: a callback is never dropped for capacity reasons.
//! - A panicking job is isolated and reported; the worker keeps going.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::core::panic_message;
use crate::events::{Bus, Event, EventKind};

/// Unit of work posted to the callback context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// FIFO callback context.
///
/// Implementations must run posted jobs one at a time, in post order.
/// Substitute one through [`EngineBuilder::with_schedule`](crate::EngineBuilder::with_schedule).
pub trait Schedule: Send + Sync + 'static {
    /// Queues `job` behind every job posted earlier.
    fn post(&self, job: Job);
}

/// Single-worker FIFO queue running on a Tokio runtime.
pub struct MainQueue {
    tx: mpsc::UnboundedSender<Job>,
}

impl MainQueue {
    /// Spawns the worker on `handle` and returns the queue.
    ///
    /// The worker exits once every clone of the returned queue is dropped.
    pub fn spawn(handle: &Handle, bus: Bus) -> Arc<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();

        handle.spawn(async move {
            while let Some(job) = rx.recv().await {
                if let Err(panic) = std::panic::catch_unwind(AssertUnwindSafe(job)) {
                    bus.publish(
                        Event::new(EventKind::ListenerPanicked)
                            .with_detail(panic_message(panic.as_ref())),
                    );
                }
            }
        });
        Arc::new(Self { tx })
    }
}

impl Schedule for MainQueue {
    fn post(&self, job: Job) {
        // Closed only when the runtime is gone; there is nobody left to call back.
        let _ = self.tx.send(job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn runs_jobs_in_post_order() {
        let queue = MainQueue::spawn(&Handle::current(), Bus::new(4));
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let seen = Arc::clone(&seen);
            queue.post(Box::new(move || seen.lock().unwrap().push(i)));
        }
        let (tx, rx) = oneshot::channel();
        queue.post(Box::new(move || {
            let _ = tx.send(());
        }));
        rx.await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn panicking_job_is_reported_and_queue_survives() {
        let bus = Bus::new(4);
        let mut rx_bus = bus.subscribe();
        let queue = MainQueue::spawn(&Handle::current(), bus);

        queue.post(Box::new(|| panic!("listener blew up")));
        let (tx, rx) = oneshot::channel();
        queue.post(Box::new(move || {
            let _ = tx.send(7);
        }));

        assert_eq!(rx.await.unwrap(), 7);
        let ev = rx_bus.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ListenerPanicked);
        assert_eq!(ev.detail.as_deref(), Some("listener blew up"));
    }
}
