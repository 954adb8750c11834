use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use biovisor::{
    AuthListener, Biometric, BiometricMethod, BiometricRef, BiometricType, Config, Engine,
    EngineError, Event, EventKind, Failure, InitListener, MethodId, Outcome, RetryBudget, Scan,
    ScanError, SensorFn, Subscribe,
};

fn match_sensor(
) -> SensorFn<impl Fn(Scan) -> futures::future::Ready<Result<(), ScanError>> + Send + Sync + 'static> {
    SensorFn::new(|_scan: Scan| futures::future::ready(Ok::<(), ScanError>(())))
}

#[derive(Default)]
struct InitLog(Mutex<Vec<(MethodId, bool)>>);

impl InitListener for InitLog {
    fn init_finished(&self, method: &BiometricMethod, backend: Option<&BiometricRef>) {
        self.0.lock().unwrap().push((method.id(), backend.is_some()));
    }
}

#[tokio::test]
async fn duplicate_method_is_rejected() {
    let engine = Engine::builder(Config::default()).build();

    engine.register(engine.placeholder()).await.unwrap();
    let err = engine.register(engine.placeholder()).await.unwrap_err();

    assert!(matches!(err, EngineError::DuplicateMethod { id } if id == MethodId(0)));
    assert_eq!(err.as_label(), "engine_duplicate_method");
    assert_eq!(engine.registry().len().await, 1);
}

#[tokio::test]
async fn lookup_and_snapshots_follow_registration_order() {
    let engine = Engine::builder(Config::default()).build();
    let registry = engine.registry();
    assert!(registry.is_empty().await);

    engine
        .register(engine.sensor_backend(BiometricMethod::FACE_HUAWEI, match_sensor()))
        .await
        .unwrap();
    engine.register(engine.placeholder()).await.unwrap();

    let ids: Vec<MethodId> = registry.methods().await.iter().map(|m| m.id()).collect();
    assert_eq!(ids, vec![MethodId(10), MethodId(0)]);

    let caps = registry.capabilities().await;
    assert!(caps.iter().all(|(_, c)| c.is_usable()));

    let face = registry.get(MethodId(10)).await.unwrap();
    assert_eq!(face.method().kind(), BiometricType::Face);
    assert!(matches!(
        registry.get(MethodId(99)).await,
        Err(EngineError::UnknownMethod { .. })
    ));
}

#[tokio::test]
async fn spawn_init_registers_and_notifies() {
    let engine = Engine::builder(Config::default()).build();
    let log = Arc::new(InitLog::default());

    let backend: BiometricRef = engine.sensor_backend(BiometricMethod::IRIS_API, match_sensor());
    let ok = engine.registry().spawn_init(
        BiometricMethod::IRIS_API,
        async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(backend)
        },
        Some(log.clone()),
    );
    let failed = engine.registry().spawn_init(
        BiometricMethod::FINGERPRINT_FLYME,
        async {
            Err(EngineError::InitFailed {
                error: "service not bound".into(),
            })
        },
        Some(log.clone()),
    );

    assert!(ok.await.unwrap().is_ok());
    assert!(matches!(
        failed.await.unwrap(),
        Err(EngineError::InitFailed { .. })
    ));

    let mut seen = log.0.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec![(MethodId(2), false), (MethodId(20), true)]);
    assert_eq!(engine.registry().len().await, 1);
}

struct Collect(Mutex<Vec<EventKind>>);

#[async_trait]
impl Subscribe for Collect {
    async fn on_event(&self, ev: &Event) {
        self.0.lock().unwrap().push(ev.kind);
    }

    fn name(&self) -> &'static str {
        "collect"
    }
}

struct Quiet;

impl AuthListener for Quiet {
    fn on_success(&self, _method: MethodId) {}
    fn on_failure(&self, _failure: &Failure) {}
}

#[tokio::test]
async fn subscribers_observe_session_lifecycle() {
    let collect = Arc::new(Collect(Mutex::new(Vec::new())));
    let subs: Vec<Arc<dyn Subscribe>> = vec![collect.clone()];
    let engine = Engine::builder(Config::default())
        .with_subscribers(subs)
        .build();
    assert_eq!(engine.subscriber_count(), 1);

    let backend = engine.sensor_backend(BiometricMethod::FINGERPRINT_API, match_sensor());
    let report = backend
        .authenticate(
            &CancellationToken::new(),
            Arc::new(Quiet),
            RetryBudget::none().boxed(),
        )
        .wait()
        .await;
    assert_eq!(report.outcome, Outcome::Succeeded);

    // Fan-out is asynchronous; wait for the terminal event to arrive.
    for _ in 0..100 {
        if collect.0.lock().unwrap().contains(&EventKind::AttemptSucceeded) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let kinds = collect.0.lock().unwrap().clone();
    assert_eq!(
        kinds,
        vec![
            EventKind::AttemptStarting,
            EventKind::ScanStarting,
            EventKind::AttemptSucceeded,
        ]
    );
}
