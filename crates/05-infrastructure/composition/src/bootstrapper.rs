//! 容器启动器
//!
//! 负责协调组件发现、声明合并、绑定注册和容器验证的顺序。

use di_abstractions::{
    ComponentDeclaration, ComponentDiscovery, ContainerBuilder, ContainerConfig, DiagnosticSink,
    DiscoveryResult,
};
use di_impl::{DiContainerBuilder, DiContainerImpl};
use infrastructure_common::{
    ComponentIdentity, ComponentResult, DependencyError, DependencyResult,
};
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 容器启动器
///
/// 依次运行所有发现适配器，按优先级合并声明后构建容器。
/// 直接调用 `bind` 时重复注册总是错误；只有经过发现的声明才会按优先级覆盖。
pub struct ContainerBootstrapper {
    /// 组件发现器列表
    discoveries: Vec<Box<dyn ComponentDiscovery>>,
    /// 容器配置
    config: ContainerConfig,
    /// 诊断事件接收器
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl ContainerBootstrapper {
    /// 创建新的容器启动器
    pub fn new() -> Self {
        Self {
            discoveries: Vec::new(),
            config: ContainerConfig::default(),
            diagnostics: None,
        }
    }

    /// 添加组件发现器
    pub fn add_discovery<D>(mut self, discovery: D) -> Self
    where
        D: ComponentDiscovery + 'static,
    {
        self.discoveries.push(Box::new(discovery));
        self
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置诊断事件接收器
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// 启动容器
    pub async fn bootstrap(self) -> ComponentResult<DiContainerImpl> {
        info!(discoverers = self.discoveries.len(), "开始启动依赖注入容器");

        // 第一步：运行所有发现器
        let results = self.discover_all().await?;

        // 第二步：按优先级合并声明
        let declarations = merge_by_priority(results)?;
        debug!(components = declarations.len(), "组件声明合并完成");

        // 第三步：注册、验证并按配置预热
        let mut builder = DiContainerBuilder::new().with_config(self.config);
        if let Some(diagnostics) = self.diagnostics {
            builder = builder.with_diagnostics(diagnostics);
        }
        for declaration in declarations {
            builder = builder.bind(declaration.identity, declaration.binding);
        }
        let container = builder.build()?;

        info!(container = %container.id(), "依赖注入容器启动完成");
        Ok(container)
    }

    async fn discover_all(&self) -> ComponentResult<Vec<DiscoveryResult>> {
        let mut results = Vec::with_capacity(self.discoveries.len());
        for discovery in &self.discoveries {
            debug!(discoverer = discovery.name(), "运行组件发现器");
            let components = discovery.discover().await.map_err(|e| {
                error!(discoverer = discovery.name(), error = %e, "组件发现失败");
                e
            })?;
            debug!(
                discoverer = discovery.name(),
                components = components.len(),
                "组件发现完成"
            );
            results.push(DiscoveryResult::new(components, discovery.name()));
        }
        Ok(results)
    }
}

impl Default for ContainerBootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContainerBootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let discoverers: Vec<&str> = self.discoveries.iter().map(|d| d.name()).collect();
        f.debug_struct("ContainerBootstrapper")
            .field("discoverers", &discoverers)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// 按优先级合并发现结果
///
/// 同一标识出现多次时保留优先级最高的声明；最高优先级出现并列时返回 `DuplicateBinding`。
/// 结果按标识首次出现的顺序排列。
pub fn merge_by_priority(
    results: Vec<DiscoveryResult>,
) -> DependencyResult<Vec<ComponentDeclaration>> {
    let mut order: Vec<ComponentIdentity> = Vec::new();
    let mut selected: HashMap<ComponentIdentity, (ComponentDeclaration, bool)> = HashMap::new();

    for result in results {
        for declaration in result.components {
            match selected.entry(declaration.identity.clone()) {
                Entry::Vacant(entry) => {
                    order.push(declaration.identity.clone());
                    entry.insert((declaration, false));
                }
                Entry::Occupied(mut entry) => {
                    let (current, tied) = entry.get_mut();
                    match declaration.priority.cmp(&current.priority) {
                        Ordering::Greater => {
                            debug!(
                                identity = %declaration.identity,
                                discoverer = %result.discoverer,
                                priority = %declaration.priority,
                                "更高优先级的声明覆盖已有声明"
                            );
                            *current = declaration;
                            *tied = false;
                        }
                        Ordering::Equal => *tied = true,
                        Ordering::Less => {}
                    }
                }
            }
        }
    }

    let mut merged = Vec::with_capacity(order.len());
    for identity in order {
        if let Some((declaration, tied)) = selected.remove(&identity) {
            if tied {
                return Err(DependencyError::DuplicateBinding { identity });
            }
            merged.push(declaration);
        }
    }
    Ok(merged)
}
