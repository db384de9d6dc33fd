//! 容器构建器

use crate::container::DiContainerImpl;
use di_abstractions::{
    Binding, ContainerBuilder, ContainerConfig, DiContainer, DiagnosticSink,
};
use infrastructure_common::{ComponentError, ComponentIdentity, ComponentResult};
use std::sync::Arc;
use tracing::info;

/// 容器构建器
///
/// 使用建造者模式收集绑定，构建时一次性注册、验证，并按配置预热单例。
#[derive(Default)]
pub struct DiContainerBuilder {
    bindings: Vec<(ComponentIdentity, Binding)>,
    config: ContainerConfig,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl DiContainerBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 为类型 `T` 添加不带限定符的绑定
    pub fn bind_type<T: ?Sized + 'static>(self, binding: Binding) -> Self {
        ContainerBuilder::bind(self, ComponentIdentity::of::<T>(), binding)
    }
}

impl ContainerBuilder for DiContainerBuilder {
    type Container = DiContainerImpl;

    fn bind(mut self, identity: ComponentIdentity, binding: Binding) -> Self {
        self.bindings.push((identity, binding));
        self
    }

    fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    fn build(self) -> ComponentResult<DiContainerImpl> {
        let validate = self.config.validate_on_build;
        let eager = self.config.eager_singletons;

        let mut container = DiContainerImpl::with_config(self.config);
        if let Some(diagnostics) = self.diagnostics {
            container = container.with_diagnostics(diagnostics);
        }

        for (identity, binding) in self.bindings {
            container.bind(identity, binding)?;
        }

        if validate {
            container
                .validate()
                .map_err(|errors| ComponentError::ValidationFailed { errors })?;
        }
        if eager {
            container.warm_up()?;
        }

        info!(
            container = %container.id(),
            components = container.registered_components().len(),
            "依赖注入容器构建完成"
        );
        Ok(container)
    }
}
