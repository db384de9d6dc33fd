//! 依赖解析器实现
//!
//! 解析分两步：先在依赖图上验证请求的根（缺失绑定、循环依赖、深度超限），
//! 验证通过后才按严格后序调用工厂，所以失败的解析不会留下构造了一半的对象。

use crate::graph::DependencyGraph;
use crate::scope_cache::ScopeCache;
use di_abstractions::{
    Binding, ComponentRegistry, ComponentResolver, DiagnosticEvent, DiagnosticSink, Instance,
    ResolveContext, ResolvedDependencies,
};
use infrastructure_common::{ComponentIdentity, DependencyError, DependencyResult};
use tracing::trace;
use uuid::Uuid;

/// 单个容器的依赖解析器
///
/// 只借用容器的注册表、依赖图和缓存，每次解析时临时创建。
pub struct Resolver<'a> {
    container_id: Uuid,
    registry: &'a dyn ComponentRegistry,
    graph: &'a DependencyGraph,
    cache: &'a ScopeCache,
    diagnostics: &'a dyn DiagnosticSink,
    max_depth: usize,
}

impl<'a> Resolver<'a> {
    /// 创建解析器
    pub fn new(
        container_id: Uuid,
        registry: &'a dyn ComponentRegistry,
        graph: &'a DependencyGraph,
        cache: &'a ScopeCache,
        diagnostics: &'a dyn DiagnosticSink,
        max_depth: usize,
    ) -> Self {
        Self {
            container_id,
            registry,
            graph,
            cache,
            diagnostics,
            max_depth,
        }
    }

    /// 验证请求的根，不调用任何工厂
    pub fn plan(&self, identity: &ComponentIdentity) -> DependencyResult<()> {
        self.graph
            .verify_root(identity, self.max_depth)
            .map_err(|error| {
                report_graph_error(self.container_id, self.diagnostics, &error);
                error
            })
    }

    fn instantiate(
        &self,
        identity: &ComponentIdentity,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        let binding = self.registry.lookup(identity)?;
        context.push(identity.clone())?;
        let result = self.cache.get_or_create(binding.scope(), identity, || {
            self.construct(identity, binding, context)
        });
        context.pop();
        result
    }

    fn construct(
        &self,
        identity: &ComponentIdentity,
        binding: &Binding,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        let mut instances = Vec::with_capacity(binding.dependencies().len());
        for dependency in binding.dependencies() {
            instances.push(self.instantiate(dependency, context)?);
        }
        let dependencies = ResolvedDependencies::new(binding.dependencies().to_vec(), instances);

        trace!(container = %self.container_id, %identity, "调用组件工厂");
        match binding.create(&dependencies) {
            Ok(instance) => {
                if binding.scope().is_singleton() {
                    self.diagnostics.emit(&DiagnosticEvent::SingletonCreated {
                        container: self.container_id,
                        identity: identity.clone(),
                    });
                }
                Ok(instance)
            }
            Err(source) => {
                let chain = context.chain().to_vec();
                self.diagnostics.emit(&DiagnosticEvent::ConstructionFailed {
                    container: self.container_id,
                    chain: chain.clone(),
                    message: source.to_string(),
                });
                Err(DependencyError::ComponentCreationFailed { chain, source })
            }
        }
    }
}

impl ComponentResolver for Resolver<'_> {
    fn resolve(&self, identity: &ComponentIdentity) -> DependencyResult<Instance> {
        self.plan(identity)?;
        let mut context = ResolveContext::new(self.max_depth);
        self.instantiate(identity, &mut context)
    }

    fn can_resolve(&self, identity: &ComponentIdentity) -> bool {
        self.graph.verify_root(identity, self.max_depth).is_ok()
    }
}

/// 将依赖图上发现的错误转换为诊断事件
pub(crate) fn report_graph_error(
    container: Uuid,
    diagnostics: &dyn DiagnosticSink,
    error: &DependencyError,
) {
    match error {
        DependencyError::CircularDependency { cycle } => {
            diagnostics.emit(&DiagnosticEvent::CycleDetected {
                container,
                cycle: cycle.clone(),
            });
        }
        DependencyError::MissingBinding {
            identity,
            required_by,
        } => {
            diagnostics.emit(&DiagnosticEvent::MissingBinding {
                container,
                identity: identity.clone(),
                required_by: required_by.clone(),
            });
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraphBuilder;
    use crate::registry::ComponentRegistryImpl;
    use di_abstractions::NoopDiagnostics;
    use infrastructure_common::Scope;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct Leaf;
    #[derive(Debug)]
    struct Left(Arc<Leaf>);
    #[derive(Debug)]
    struct Right(Arc<Leaf>);
    #[derive(Debug)]
    struct Top(Arc<Left>, Arc<Right>);

    fn id<T: 'static>() -> ComponentIdentity {
        ComponentIdentity::of::<T>()
    }

    /// Top -> (Left, Right), Left -> Leaf, Right -> Leaf
    fn diamond_registry(
        leaf_scope: Scope,
        log: Arc<Mutex<Vec<&'static str>>>,
    ) -> ComponentRegistryImpl {
        let mut registry = ComponentRegistryImpl::new();
        let top_log = Arc::clone(&log);
        registry
            .register(
                id::<Top>(),
                Binding::transient(move |deps| {
                    top_log.lock().unwrap().push("Top");
                    Ok(Top(deps.get::<Left>(0)?, deps.get::<Right>(1)?))
                })
                .with_dependencies([id::<Left>(), id::<Right>()]),
            )
            .unwrap();
        let left_log = Arc::clone(&log);
        registry
            .register(
                id::<Left>(),
                Binding::transient(move |deps| {
                    left_log.lock().unwrap().push("Left");
                    Ok(Left(deps.get::<Leaf>(0)?))
                })
                .depends_on(id::<Leaf>()),
            )
            .unwrap();
        let right_log = Arc::clone(&log);
        registry
            .register(
                id::<Right>(),
                Binding::transient(move |deps| {
                    right_log.lock().unwrap().push("Right");
                    Ok(Right(deps.get::<Leaf>(0)?))
                })
                .depends_on(id::<Leaf>()),
            )
            .unwrap();
        let leaf_log = Arc::clone(&log);
        registry
            .register(
                id::<Leaf>(),
                Binding::transient(move |_| {
                    leaf_log.lock().unwrap().push("Leaf");
                    Ok(Leaf)
                })
                .with_scope(leaf_scope),
            )
            .unwrap();
        registry
    }

    fn resolve_top(registry: &ComponentRegistryImpl, cache: &ScopeCache) -> Arc<Top> {
        let graph = DependencyGraphBuilder::build(registry);
        let resolver = Resolver::new(Uuid::new_v4(), registry, &graph, cache, &NoopDiagnostics, 100);
        resolver
            .resolve(&id::<Top>())
            .unwrap()
            .downcast::<Top>()
            .unwrap()
    }

    #[test]
    fn test_post_order_construction() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = diamond_registry(Scope::Transient, Arc::clone(&log));
        resolve_top(&registry, &ScopeCache::new());

        assert_eq!(
            *log.lock().unwrap(),
            vec!["Leaf", "Left", "Leaf", "Right", "Top"]
        );
    }

    #[test]
    fn test_transient_diamond_gets_independent_leaves() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = diamond_registry(Scope::Transient, log);
        let top = resolve_top(&registry, &ScopeCache::new());
        assert!(!Arc::ptr_eq(&(top.0).0, &(top.1).0));
    }

    #[test]
    fn test_singleton_diamond_converges() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = diamond_registry(Scope::Singleton, Arc::clone(&log));
        let top = resolve_top(&registry, &ScopeCache::new());

        assert!(Arc::ptr_eq(&(top.0).0, &(top.1).0));
        assert_eq!(
            log.lock().unwrap().iter().filter(|name| **name == "Leaf").count(),
            1
        );
    }

    #[test]
    fn test_factory_error_carries_chain() {
        let mut registry = ComponentRegistryImpl::new();
        registry
            .register(
                id::<Top>(),
                Binding::singleton(|deps| Ok(Top(deps.get::<Left>(0)?, deps.get::<Right>(1)?)))
                    .with_dependencies([id::<Left>(), id::<Right>()]),
            )
            .unwrap();
        registry
            .register(
                id::<Left>(),
                Binding::singleton(|deps| Ok(Left(deps.get::<Leaf>(0)?))).depends_on(id::<Leaf>()),
            )
            .unwrap();
        registry
            .register(
                id::<Right>(),
                Binding::singleton(|deps| Ok(Right(deps.get::<Leaf>(0)?))).depends_on(id::<Leaf>()),
            )
            .unwrap();
        registry
            .register(
                id::<Leaf>(),
                Binding::singleton(|_| -> Result<Leaf, _> { Err("磁盘已满".into()) }),
            )
            .unwrap();

        let graph = DependencyGraphBuilder::build(&registry);
        let cache = ScopeCache::new();
        let resolver = Resolver::new(Uuid::new_v4(), &registry, &graph, &cache, &NoopDiagnostics, 100);

        match resolver.resolve(&id::<Top>()) {
            Err(DependencyError::ComponentCreationFailed { chain, source }) => {
                assert_eq!(chain, vec![id::<Top>(), id::<Left>(), id::<Leaf>()]);
                assert_eq!(source.to_string(), "磁盘已满");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(cache.instance_count(), 0);
    }

    #[test]
    fn test_cycle_detected_before_any_factory() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ComponentRegistryImpl::new();
        let left_calls = Arc::clone(&calls);
        registry
            .register(
                id::<Left>(),
                Binding::singleton(move |deps| {
                    left_calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Left(deps.get::<Leaf>(0)?))
                })
                .depends_on(id::<Leaf>()),
            )
            .unwrap();
        let leaf_calls = Arc::clone(&calls);
        registry
            .register(
                id::<Leaf>(),
                Binding::singleton(move |_| {
                    leaf_calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Leaf)
                })
                .depends_on(id::<Left>()),
            )
            .unwrap();

        let graph = DependencyGraphBuilder::build(&registry);
        let cache = ScopeCache::new();
        let resolver = Resolver::new(Uuid::new_v4(), &registry, &graph, &cache, &NoopDiagnostics, 100);

        assert!(!resolver.can_resolve(&id::<Left>()));
        assert!(matches!(
            resolver.resolve(&id::<Left>()),
            Err(DependencyError::CircularDependency { cycle }) if cycle == vec![id::<Left>(), id::<Leaf>(), id::<Left>()]
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
