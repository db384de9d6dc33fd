//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::diagnostics::DiagnosticSink;
use crate::factory::Instance;
use crate::registry::Binding;
use infrastructure_common::{
    ComponentIdentity, ComponentResult, DependencyError, DependencyResult,
};
use serde::Deserialize;
use std::any::Any;
use std::sync::Arc;

/// 依赖注入容器 trait
///
/// 每个容器拥有自己的注册表、依赖图和作用域缓存，不存在进程级的全局容器。
pub trait DiContainer: Send + Sync {
    /// 注册绑定，并使已构建的依赖图失效
    fn bind(&mut self, identity: ComponentIdentity, binding: Binding) -> DependencyResult<()>;

    /// 解析组件
    fn get(&self, identity: &ComponentIdentity) -> DependencyResult<Instance>;

    /// 检查是否已注册组件
    fn is_registered(&self, identity: &ComponentIdentity) -> bool;

    /// 按注册顺序获取所有已注册的组件标识
    fn registered_components(&self) -> Vec<ComponentIdentity>;

    /// 验证整个容器，返回发现的全部问题
    fn validate(&self) -> Result<(), Vec<DependencyError>>;

    /// 关闭容器，释放缓存的单例；之后的解析返回 `ContainerClosed`
    fn close(&self);

    /// 解析类型 `T` 的组件（不带限定符）
    fn resolve<T: Any + Send + Sync>(&self) -> DependencyResult<Arc<T>>
    where
        Self: Sized,
    {
        self.resolve_identity(&ComponentIdentity::of::<T>())
    }

    /// 解析带限定符的组件
    fn resolve_named<T: Any + Send + Sync>(&self, qualifier: &str) -> DependencyResult<Arc<T>>
    where
        Self: Sized,
    {
        self.resolve_identity(&ComponentIdentity::named::<T>(qualifier))
    }

    /// 解析指定标识并转换为 `T`
    fn resolve_identity<T: Any + Send + Sync>(
        &self,
        identity: &ComponentIdentity,
    ) -> DependencyResult<Arc<T>>
    where
        Self: Sized,
    {
        self.get(identity)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                identity: identity.clone(),
                expected: std::any::type_name::<T>(),
            })
    }
}

/// 容器构建器 trait
pub trait ContainerBuilder: Sized {
    /// 关联的容器类型
    type Container: DiContainer;

    /// 添加组件绑定
    fn bind(self, identity: ComponentIdentity, binding: Binding) -> Self;

    /// 设置容器配置
    fn with_config(self, config: ContainerConfig) -> Self;

    /// 设置诊断事件接收器
    fn with_diagnostics(self, diagnostics: Arc<dyn DiagnosticSink>) -> Self;

    /// 构建容器
    fn build(self) -> ComponentResult<Self::Container>;
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 构建时是否验证整个依赖图
    pub validate_on_build: bool,
    /// 启动后是否立即创建所有单例
    pub eager_singletons: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 100,
            validate_on_build: true,
            eager_singletons: false,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 已注册组件数量
    pub registered_components: usize,
    /// 活跃单例数量
    pub active_singletons: usize,
    /// 成功解析次数
    pub resolutions: usize,
    /// 解析错误数量
    pub resolution_errors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ContainerConfig::default();
        assert_eq!(config.max_resolution_depth, 100);
        assert!(config.validate_on_build);
        assert!(!config.eager_singletons);
    }

    #[test]
    fn test_config_partial_deserialize() {
        let config: ContainerConfig =
            serde_json::from_str(r#"{ "eager_singletons": true }"#).unwrap();
        assert!(config.eager_singletons);
        assert_eq!(config.max_resolution_depth, 100);
        assert!(config.validate_on_build);
    }
}
