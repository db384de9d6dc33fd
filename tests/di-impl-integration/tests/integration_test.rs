//! 跨 crate 的依赖注入集成测试：并发解析、诊断事件与启动流程

use async_trait::async_trait;
use di_abstractions::{
    Binding, ComponentDeclaration, ComponentDiscovery, ContainerBuilder, DiContainer,
    DiagnosticEvent, DiagnosticSink,
};
use di_impl::{DiContainerBuilder, DiContainerImpl};
use infrastructure_common::{
    ComponentError, ComponentIdentity, DependencyError, InjectPriority, Scope,
};
use infrastructure_composition::ContainerBootstrapper;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Default)]
struct RecordingDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingDiagnostics {
    fn count(&self, predicate: impl Fn(&DiagnosticEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|event| predicate(event)).count()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn emit(&self, event: &DiagnosticEvent) {
        self.events.lock().push(event.clone());
    }
}

#[derive(Debug)]
struct Pool {
    id: usize,
}

#[derive(Debug)]
struct Handler {
    pool: Arc<Pool>,
}

fn pool_container(calls: Arc<AtomicUsize>) -> DiContainerImpl {
    DiContainerBuilder::new()
        .bind_type::<Pool>(Binding::singleton(move |_| {
            let id = calls.fetch_add(1, Ordering::SeqCst);
            // 放大竞争窗口
            std::thread::sleep(Duration::from_millis(20));
            Ok(Pool { id })
        }))
        .bind_type::<Handler>(
            Binding::transient(|deps| {
                Ok(Handler {
                    pool: deps.get::<Pool>(0)?,
                })
            })
            .depends_on(ComponentIdentity::of::<Pool>()),
        )
        .build()
        .unwrap()
}

#[test]
fn test_concurrent_first_resolution_runs_factory_once() {
    init_test_logger();
    const THREADS: usize = 32;

    let calls = Arc::new(AtomicUsize::new(0));
    let container = pool_container(Arc::clone(&calls));
    let barrier = Barrier::new(THREADS);

    let (container, barrier) = (&container, &barrier);
    let pools: Vec<Arc<Pool>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                scope.spawn(move || {
                    barrier.wait();
                    if i % 2 == 0 {
                        container.resolve::<Pool>().unwrap()
                    } else {
                        Arc::clone(&container.resolve::<Handler>().unwrap().pool)
                    }
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(pools.iter().all(|pool| pool.id == 0));
    assert!(pools.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn test_containers_do_not_share_singletons_across_threads() {
    let calls = Arc::new(AtomicUsize::new(0));
    let first = pool_container(Arc::clone(&calls));
    let second = pool_container(Arc::clone(&calls));

    let (a, b) = std::thread::scope(|scope| {
        let a = scope.spawn(|| first.resolve::<Pool>().unwrap());
        let b = scope.spawn(|| second.resolve::<Pool>().unwrap());
        (a.join().unwrap(), b.join().unwrap())
    });

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_diagnostic_events() {
    struct Broken;
    struct Consumer;

    let diagnostics = Arc::new(RecordingDiagnostics::default());
    let mut container = DiContainerImpl::new().with_diagnostics(diagnostics.clone());
    container
        .bind(
            ComponentIdentity::of::<Broken>(),
            Binding::singleton(|_| -> Result<Broken, _> {
                Err(anyhow::anyhow!("初始化失败").into())
            }),
        )
        .unwrap();
    container
        .bind(
            ComponentIdentity::of::<Consumer>(),
            Binding::transient(|_| Ok(Consumer)).depends_on(ComponentIdentity::of::<Broken>()),
        )
        .unwrap();

    assert!(container.resolve::<Consumer>().is_err());
    assert!(container.get(&ComponentIdentity::named::<Consumer>("missing")).is_err());
    container.close();

    assert_eq!(
        diagnostics.count(|e| matches!(e, DiagnosticEvent::BindingRegistered { .. })),
        2
    );
    assert_eq!(
        diagnostics.count(|e| matches!(e, DiagnosticEvent::GraphRebuilt { nodes: 2, edges: 1, .. })),
        1
    );
    assert_eq!(
        diagnostics.count(|e| matches!(
            e,
            DiagnosticEvent::ConstructionFailed { chain, message, .. }
                if chain.len() == 2 && message == "初始化失败"
        )),
        1
    );
    assert_eq!(
        diagnostics.count(|e| matches!(e, DiagnosticEvent::MissingBinding { required_by: None, .. })),
        1
    );
    assert_eq!(
        diagnostics.count(|e| matches!(e, DiagnosticEvent::ContainerClosed { released: 0, .. })),
        1
    );
    assert_eq!(
        diagnostics.count(|e| e.container() == container.id()),
        diagnostics.events.lock().len()
    );
}

#[test]
fn test_cycle_event_is_emitted_once_per_attempt() {
    struct A;
    struct B;

    let diagnostics = Arc::new(RecordingDiagnostics::default());
    let container = DiContainerBuilder::new()
        .with_diagnostics(diagnostics.clone())
        .with_config(di_abstractions::ContainerConfig {
            validate_on_build: false,
            ..Default::default()
        })
        .bind_type::<A>(Binding::singleton(|_| Ok(A)).depends_on(ComponentIdentity::of::<B>()))
        .bind_type::<B>(Binding::singleton(|_| Ok(B)).depends_on(ComponentIdentity::of::<A>()))
        .build()
        .unwrap();

    for _ in 0..2 {
        assert!(matches!(
            container.resolve::<B>(),
            Err(DependencyError::CircularDependency { ref cycle }) if cycle.first() == Some(&ComponentIdentity::of::<B>())
        ));
    }
    assert_eq!(
        diagnostics.count(|e| matches!(e, DiagnosticEvent::CycleDetected { .. })),
        2
    );
}

/// 模拟宿主环境中由宏生成的声明清单
struct ManifestDiscovery {
    entries: Vec<(&'static str, Scope, InjectPriority)>,
}

#[derive(Debug)]
struct Plugin(&'static str);

#[async_trait]
impl ComponentDiscovery for ManifestDiscovery {
    async fn discover(&self) -> Result<Vec<ComponentDeclaration>, ComponentError> {
        tokio::task::yield_now().await;
        Ok(self
            .entries
            .iter()
            .map(|&(name, scope, priority)| {
                ComponentDeclaration::new(
                    ComponentIdentity::named::<Plugin>(name),
                    Binding::typed(scope, move |_| Ok(Plugin(name))),
                )
                .with_priority(priority)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "manifest"
    }
}

#[tokio::test]
async fn test_bootstrap_with_async_discovery() {
    init_test_logger();

    let container = ContainerBootstrapper::new()
        .add_discovery(ManifestDiscovery {
            entries: vec![
                ("auth", Scope::Singleton, InjectPriority::Normal),
                ("audit", Scope::Transient, InjectPriority::Low),
            ],
        })
        .bootstrap()
        .await
        .unwrap();

    let auth = container.resolve_named::<Plugin>("auth").unwrap();
    assert!(Arc::ptr_eq(&auth, &container.resolve_named::<Plugin>("auth").unwrap()));

    let audit = container.resolve_named::<Plugin>("audit").unwrap();
    assert_eq!(audit.0, "audit");
    assert!(!Arc::ptr_eq(&audit, &container.resolve_named::<Plugin>("audit").unwrap()));
}

#[tokio::test]
async fn test_resolution_from_blocking_tasks() {
    let calls = Arc::new(AtomicUsize::new(0));
    let container = Arc::new(pool_container(Arc::clone(&calls)));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let container = Arc::clone(&container);
            tokio::task::spawn_blocking(move || container.resolve::<Handler>().map(|h| h.pool.id))
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), 0);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
