//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件注册、发现和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`Binding`] - 组件绑定（工厂 + 依赖列表 + 作用域）
//! - [`ComponentDiscovery`] - 组件发现适配器接口
//! - [`ComponentResolver`] - 依赖解析器接口
//! - [`DiagnosticSink`] - 诊断事件接收器
//! - [`DiContainer`] - 容器门面接口

pub mod container;
pub mod diagnostics;
pub mod discovery;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use container::*;
pub use diagnostics::*;
pub use discovery::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
