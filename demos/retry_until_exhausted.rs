//! # Example: Retry until the budget runs out
//!
//! A flaky fingerprint sensor that never matches. The session retries per its
//! budget with an exponential re-arm delay, reporting every failed scan, then
//! ends with one terminal `Exhausted` failure. A second session is cancelled
//! mid-scan to show the cancelled path.

use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

use biovisor::{
    AuthListener, BackoffPolicy, Biometric, BiometricMethod, Config, Engine, Failure, Help,
    HelpReason, JitterPolicy, MethodId, RetryBudget, Scan, ScanError, SensorFn,
};

struct Print;

impl AuthListener for Print {
    fn on_success(&self, method: MethodId) {
        println!("[listener] authenticated by {method}");
    }

    fn on_failure(&self, failure: &Failure) {
        if failure.will_retry {
            println!("[listener] scan {} failed: {}, retrying", failure.scan, failure.reason);
        } else {
            println!("[listener] gave up after scan {}: {}", failure.scan, failure.reason);
        }
    }

    fn on_help(&self, help: &Help, _method: MethodId) {
        println!("[listener] help: {:?} {:?}", help.reason, help.message);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = Config {
        retry_delay: BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_millis(800),
            factor: 2.0,
            jitter: JitterPolicy::Equal,
        },
        scan_timeout: Duration::from_secs(2),
        ..Config::default()
    };
    let engine = Engine::builder(cfg).build();

    let sensor = SensorFn::new(|scan: Scan| async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        if scan.number() % 2 == 0 {
            scan.help(Help::new(HelpReason::Partial).with_message("press a bit longer"));
        }
        Err::<(), _>(ScanError::NoMatch)
    });
    let backend = engine.sensor_backend(BiometricMethod::FINGERPRINT_API, sensor);

    let token = CancellationToken::new();
    let report = backend
        .authenticate(&token, Arc::new(Print), RetryBudget::new(4).boxed())
        .wait()
        .await;
    println!("[main] first session: {report:?}");

    let handle = backend.authenticate(&token, Arc::new(Print), RetryBudget::new(4).boxed());
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel();
    println!("[main] second session: {:?}", handle.wait().await);
    Ok(())
}
