//! 依赖注入容器实现

use crate::graph::{DependencyGraph, DependencyGraphBuilder};
use crate::registry::ComponentRegistryImpl;
use crate::resolver::{report_graph_error, Resolver};
use crate::scope_cache::ScopeCache;
use di_abstractions::{
    Binding, ComponentRegistry, ComponentResolver, ContainerConfig, ContainerStats, DiContainer,
    DiagnosticEvent, DiagnosticSink, Instance, TracingDiagnostics,
};
use infrastructure_common::{ComponentIdentity, DependencyError, DependencyResult};
use parking_lot::RwLock;
use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// 具体的依赖注入容器实现
///
/// 拥有一个注册表、一个按需构建的依赖图和一个单例缓存，彼此之间以及与其他容器之间都不共享状态。
/// 依赖图在第一次解析时构建，任何新的绑定都会使它失效。
pub struct DiContainerImpl {
    id: Uuid,
    config: ContainerConfig,
    registry: ComponentRegistryImpl,
    graph: RwLock<Option<Arc<DependencyGraph>>>,
    cache: ScopeCache,
    diagnostics: Arc<dyn DiagnosticSink>,
    closed: AtomicBool,
    resolutions: AtomicUsize,
    resolution_errors: AtomicUsize,
}

impl DiContainerImpl {
    /// 创建使用默认配置的空容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 创建使用指定配置的空容器
    pub fn with_config(config: ContainerConfig) -> Self {
        let id = Uuid::new_v4();
        debug!(container = %id, ?config, "创建依赖注入容器");
        Self {
            id,
            config,
            registry: ComponentRegistryImpl::new(),
            graph: RwLock::new(None),
            cache: ScopeCache::new(),
            diagnostics: Arc::new(TracingDiagnostics),
            closed: AtomicBool::new(false),
            resolutions: AtomicUsize::new(0),
            resolution_errors: AtomicUsize::new(0),
        }
    }

    /// 设置诊断事件接收器
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// 容器标识
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 容器是否已关闭
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// 当前依赖图，必要时重建
    pub fn dependency_graph(&self) -> Arc<DependencyGraph> {
        if let Some(graph) = self.graph.read().as_ref() {
            return Arc::clone(graph);
        }

        let mut slot = self.graph.write();
        if let Some(graph) = slot.as_ref() {
            return Arc::clone(graph);
        }

        let graph = Arc::new(DependencyGraphBuilder::build(&self.registry));
        self.diagnostics.emit(&DiagnosticEvent::GraphRebuilt {
            container: self.id,
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        });
        *slot = Some(Arc::clone(&graph));
        graph
    }

    fn ensure_open(&self) -> DependencyResult<()> {
        if self.is_closed() {
            Err(DependencyError::ContainerClosed)
        } else {
            Ok(())
        }
    }

    /// 解析组件；标识本身未注册时返回 `Ok(None)`
    ///
    /// 只有请求的标识本身被视为可选，传递依赖缺失仍然是 `MissingBinding` 错误。
    pub fn try_get(&self, identity: &ComponentIdentity) -> DependencyResult<Option<Instance>> {
        self.ensure_open()?;
        if !self.registry.contains(identity) {
            return Ok(None);
        }
        self.get(identity).map(Some)
    }

    /// 解析类型 `T` 的组件；未注册时返回 `Ok(None)`
    pub fn find<T: Any + Send + Sync>(&self) -> DependencyResult<Option<Arc<T>>> {
        let identity = ComponentIdentity::of::<T>();
        match self.try_get(&identity)? {
            Some(instance) => instance
                .downcast::<T>()
                .map(Some)
                .map_err(|_| DependencyError::TypeMismatch {
                    identity,
                    expected: std::any::type_name::<T>(),
                }),
            None => Ok(None),
        }
    }

    /// 按拓扑顺序创建所有单例，返回单例数量
    pub fn warm_up(&self) -> DependencyResult<usize> {
        self.ensure_open()?;
        let order = self.dependency_graph().topological_order()?;

        let mut created = 0;
        for identity in &order {
            let is_singleton = self
                .registry
                .lookup(identity)
                .map(|binding| binding.scope().is_singleton())
                .unwrap_or(false);
            if is_singleton {
                self.get(identity)?;
                created += 1;
            }
        }
        info!(container = %self.id, singletons = created, "单例预热完成");
        Ok(created)
    }

    /// 已创建的单例数量
    pub fn singleton_count(&self) -> usize {
        self.cache.instance_count()
    }

    /// 容器统计信息
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_components: self.registry.len(),
            active_singletons: self.cache.instance_count(),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            resolution_errors: self.resolution_errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for DiContainerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DiContainerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiContainerImpl")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("bindings", &self.registry.len())
            .field("singletons", &self.cache.instance_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl DiContainer for DiContainerImpl {
    fn bind(&mut self, identity: ComponentIdentity, binding: Binding) -> DependencyResult<()> {
        self.ensure_open()?;
        let scope = binding.scope();
        self.registry.register(identity.clone(), binding)?;
        *self.graph.get_mut() = None;

        self.diagnostics.emit(&DiagnosticEvent::BindingRegistered {
            container: self.id,
            identity,
            scope,
        });
        Ok(())
    }

    fn get(&self, identity: &ComponentIdentity) -> DependencyResult<Instance> {
        self.ensure_open()?;
        let graph = self.dependency_graph();
        let resolver = Resolver::new(
            self.id,
            &self.registry,
            &graph,
            &self.cache,
            self.diagnostics.as_ref(),
            self.config.max_resolution_depth,
        );

        let result = resolver.resolve(identity);
        let counter = if result.is_ok() {
            &self.resolutions
        } else {
            &self.resolution_errors
        };
        counter.fetch_add(1, Ordering::Relaxed);
        result
    }

    fn is_registered(&self, identity: &ComponentIdentity) -> bool {
        self.registry.contains(identity)
    }

    fn registered_components(&self) -> Vec<ComponentIdentity> {
        self.registry.identities()
    }

    fn validate(&self) -> Result<(), Vec<DependencyError>> {
        let errors = self
            .dependency_graph()
            .validate_all(self.config.max_resolution_depth);
        if errors.is_empty() {
            return Ok(());
        }
        for error in &errors {
            report_graph_error(self.id, self.diagnostics.as_ref(), error);
        }
        Err(errors)
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let released = self.cache.clear();
        self.diagnostics.emit(&DiagnosticEvent::ContainerClosed {
            container: self.id,
            released,
        });
    }
}
