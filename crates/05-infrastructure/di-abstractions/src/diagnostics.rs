//! 诊断事件
//!
//! 容器通过注入的 [`DiagnosticSink`] 发出结构化事件，不依赖任何具体的日志后端。

use infrastructure_common::{format_chain, ComponentIdentity, Scope};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// 诊断事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// 组件绑定已注册
    BindingRegistered {
        container: Uuid,
        identity: ComponentIdentity,
        scope: Scope,
    },
    /// 依赖图已重建
    GraphRebuilt {
        container: Uuid,
        nodes: usize,
        edges: usize,
    },
    /// 检测到循环依赖
    CycleDetected {
        container: Uuid,
        cycle: Vec<ComponentIdentity>,
    },
    /// 缺少依赖绑定
    MissingBinding {
        container: Uuid,
        identity: ComponentIdentity,
        required_by: Option<ComponentIdentity>,
    },
    /// 组件工厂执行失败
    ConstructionFailed {
        container: Uuid,
        chain: Vec<ComponentIdentity>,
        message: String,
    },
    /// 单例实例已创建
    SingletonCreated {
        container: Uuid,
        identity: ComponentIdentity,
    },
    /// 容器已关闭
    ContainerClosed { container: Uuid, released: usize },
}

impl DiagnosticEvent {
    /// 发出事件的容器
    pub fn container(&self) -> Uuid {
        match self {
            Self::BindingRegistered { container, .. }
            | Self::GraphRebuilt { container, .. }
            | Self::CycleDetected { container, .. }
            | Self::MissingBinding { container, .. }
            | Self::ConstructionFailed { container, .. }
            | Self::SingletonCreated { container, .. }
            | Self::ContainerClosed { container, .. } => *container,
        }
    }
}

/// 诊断事件接收器 trait
pub trait DiagnosticSink: Send + Sync {
    /// 接收事件
    fn emit(&self, event: &DiagnosticEvent);
}

/// 将诊断事件转发到 `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn emit(&self, event: &DiagnosticEvent) {
        match event {
            DiagnosticEvent::BindingRegistered {
                container,
                identity,
                scope,
            } => {
                debug!(%container, %identity, %scope, "注册组件绑定");
            }
            DiagnosticEvent::GraphRebuilt {
                container,
                nodes,
                edges,
            } => {
                debug!(%container, nodes, edges, "重建依赖图");
            }
            DiagnosticEvent::CycleDetected { container, cycle } => {
                error!(%container, cycle = %format_chain(cycle), "检测到循环依赖");
            }
            DiagnosticEvent::MissingBinding {
                container,
                identity,
                required_by,
            } => match required_by {
                Some(required_by) => {
                    error!(%container, %identity, %required_by, "缺少依赖绑定");
                }
                None => error!(%container, %identity, "缺少依赖绑定"),
            },
            DiagnosticEvent::ConstructionFailed {
                container,
                chain,
                message,
            } => {
                warn!(%container, chain = %format_chain(chain), %message, "组件创建失败");
            }
            DiagnosticEvent::SingletonCreated {
                container,
                identity,
            } => {
                debug!(%container, %identity, "创建单例实例");
            }
            DiagnosticEvent::ContainerClosed {
                container,
                released,
            } => {
                info!(%container, released, "容器已关闭");
            }
        }
    }
}

/// 丢弃所有诊断事件
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl DiagnosticSink for NoopDiagnostics {
    fn emit(&self, _event: &DiagnosticEvent) {}
}
