//! # Example: Placeholder backend with the built-in logger
//!
//! Registers the placeholder backend, starts one session and waits for its single
//! terminal failure. Run with:
//! `cargo run --example placeholder --features logging`

use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

use biovisor::{
    AuthListener, Biometric, Config, Engine, Failure, LogWriter, MethodId, Subscribe,
};

struct Print;

impl AuthListener for Print {
    fn on_success(&self, method: MethodId) {
        println!("[listener] authenticated by {method}");
    }

    fn on_failure(&self, failure: &Failure) {
        println!(
            "[listener] scan {} failed: {} (terminal={})",
            failure.scan,
            failure.reason,
            failure.is_terminal()
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = Config {
        placeholder_delay: Duration::from_millis(500),
        ..Config::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let engine = Engine::builder(cfg).with_subscribers(subs).build();

    let backend = engine.placeholder();
    engine.register(Arc::clone(&backend)).await?;
    println!("[main] capabilities: {:?}", backend.capabilities());

    let token = CancellationToken::new();
    let report = backend
        .authenticate(&token, Arc::new(Print), engine.restart_policy())
        .wait()
        .await;
    println!("[main] {report:?}");

    // Let the logger drain.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
