//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [registered] method=Some(MethodId(0)) name=Some("placeholder")
//! [attempt] method=Some(MethodId(1)) session=Some(3)
//! [scan] method=Some(MethodId(1)) session=Some(3) scan=Some(1)
//! [scan-failed] method=Some(MethodId(1)) session=Some(3) scan=Some(1) reason=sensor_failed
//! [retry] method=Some(MethodId(1)) session=Some(3) delay_ms=Some(250) after_scan=Some(1)
//! [succeeded] method=Some(MethodId(1)) session=Some(3) scans=Some(2)
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn label(e: &Event) -> &'static str {
    e.reason.map(|r| r.as_label()).unwrap_or("none")
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::BackendRegistered => {
                println!("[registered] method={:?} name={:?}", e.method, e.detail);
            }
            EventKind::BackendInitFailed => {
                println!("[init-failed] err={:?}", e.detail);
            }
            EventKind::AttemptStarting => {
                println!("[attempt] method={:?} session={:?}", e.method, e.session);
            }
            EventKind::ScanStarting => {
                println!(
                    "[scan] method={:?} session={:?} scan={:?}",
                    e.method, e.session, e.scan
                );
            }
            EventKind::ScanFailed => {
                println!(
                    "[scan-failed] method={:?} session={:?} scan={:?} reason={}",
                    e.method,
                    e.session,
                    e.scan,
                    label(e)
                );
            }
            EventKind::TimeoutHit => {
                println!(
                    "[timeout] method={:?} session={:?} timeout_ms={:?}",
                    e.method, e.session, e.timeout_ms
                );
            }
            EventKind::HelpReported => {
                println!(
                    "[help] method={:?} session={:?} help={:?}",
                    e.method, e.session, e.detail
                );
            }
            EventKind::SessionPanicked => {
                println!(
                    "[session-panicked] method={:?} session={:?} scan={:?} info={}",
                    e.method,
                    e.session,
                    e.scan,
                    e.detail.as_deref().unwrap_or("unknown")
                );
            }
            EventKind::RetryScheduled => {
                println!(
                    "[retry] method={:?} session={:?} delay_ms={:?} after_scan={:?}",
                    e.method, e.session, e.delay_ms, e.scan
                );
            }
            EventKind::LockoutEngaged => {
                println!(
                    "[lockout] method={:?} kind={:?} duration_ms={:?}",
                    e.method, e.detail, e.delay_ms
                );
            }
            EventKind::AttemptSucceeded => {
                println!(
                    "[succeeded] method={:?} session={:?} scans={:?}",
                    e.method, e.session, e.scan
                );
            }
            EventKind::AttemptFailed => {
                println!(
                    "[failed] method={:?} session={:?} reason={}",
                    e.method,
                    e.session,
                    label(e)
                );
            }
            EventKind::AttemptExhausted => {
                println!(
                    "[exhausted] method={:?} session={:?} scans={:?} reason={}",
                    e.method,
                    e.session,
                    e.scan,
                    label(e)
                );
            }
            EventKind::AttemptCancelled => {
                println!("[cancelled] method={:?} session={:?}", e.method, e.session);
            }
            EventKind::ListenerPanicked => {
                println!(
                    "[listener-panicked] info={}",
                    e.detail.as_deref().unwrap_or("unknown")
                );
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber] {}",
                    e.detail.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
