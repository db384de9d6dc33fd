//! 错误类型定义

use crate::identity::{format_chain, ComponentIdentity};
use thiserror::Error;

/// 组件工厂返回的错误类型
///
/// 任何 `std::error::Error + Send + Sync`（包括 `anyhow::Error`）都可以通过 `?` 或 `into()` 转换得到。
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

/// 依赖注入错误类型
///
/// 所有错误都在检测点同步返回，不会自动重试：解析失败属于配置错误而不是瞬时故障。
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件重复注册: {identity}")]
    DuplicateBinding { identity: ComponentIdentity },

    #[error("组件未注册: {identity}")]
    ComponentNotRegistered { identity: ComponentIdentity },

    #[error("缺少依赖绑定: {identity}{}", .required_by.as_ref().map(|r| format!(" (被 {r} 依赖)")).unwrap_or_default())]
    MissingBinding {
        identity: ComponentIdentity,
        required_by: Option<ComponentIdentity>,
    },

    #[error("检测到循环依赖: {}", format_chain(.cycle))]
    CircularDependency { cycle: Vec<ComponentIdentity> },

    #[error("组件创建失败: {}, 原因: {source}", format_chain(.chain))]
    ComponentCreationFailed {
        chain: Vec<ComponentIdentity>,
        source: FactoryError,
    },

    #[error("组件类型不匹配: {identity}, 期望类型 {expected}")]
    TypeMismatch {
        identity: ComponentIdentity,
        expected: &'static str,
    },

    #[error("解析深度超出限制: {identity}, 最大深度 {max_depth}")]
    ResolutionDepthExceeded {
        identity: ComponentIdentity,
        max_depth: usize,
    },

    #[error("容器已关闭")]
    ContainerClosed,
}

impl DependencyError {
    /// 出错的组件标识（如果有）
    ///
    /// 对于循环依赖返回环的起点，对于创建失败返回真正失败的组件。
    pub fn identity(&self) -> Option<&ComponentIdentity> {
        match self {
            Self::DuplicateBinding { identity }
            | Self::ComponentNotRegistered { identity }
            | Self::MissingBinding { identity, .. }
            | Self::TypeMismatch { identity, .. }
            | Self::ResolutionDepthExceeded { identity, .. } => Some(identity),
            Self::CircularDependency { cycle } => cycle.first(),
            Self::ComponentCreationFailed { chain, .. } => chain.last(),
            Self::ContainerClosed => None,
        }
    }

    /// 是否可以仅通过依赖图检测（在任何工厂执行之前）
    pub fn is_graph_error(&self) -> bool {
        matches!(
            self,
            Self::MissingBinding { .. }
                | Self::CircularDependency { .. }
                | Self::ResolutionDepthExceeded { .. }
        )
    }
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件发现失败: {discoverer}, 原因: {message}")]
    DiscoveryError { discoverer: String, message: String },

    #[error("组件元数据无效: {message}")]
    InvalidMetadata { message: String },

    #[error("容器验证失败: 共 {} 个问题", .errors.len())]
    ValidationFailed { errors: Vec<DependencyError> },

    #[error("依赖注入错误: {source}")]
    Dependency {
        #[from]
        source: DependencyError,
    },
}

impl ComponentError {
    /// 创建发现错误
    pub fn discovery_error(discoverer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DiscoveryError {
            discoverer: discoverer.into(),
            message: message.into(),
        }
    }
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
