//! # Infrastructure Common
//!
//! 这个 crate 提供了依赖注入容器在各层之间共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`ComponentIdentity`] - 组件标识（类型 + 可选限定符），整个容器唯一的查找键
//! - [`TypeInfo`] - 组件的类型信息
//! - [`Scope`] - 组件生命周期作用域（单例 / 瞬时）
//! - [`InjectPriority`] - 组件发现时的注入优先级
//! - [`DependencyError`] / [`ComponentError`] - 错误分类
//!
//! ## 设计原则
//!
//! - 没有任何进程级的全局容器或注册表，所有状态都归属于显式创建的容器实例
//! - 依赖匹配完全基于显式的类型化标识，而不是运行时的鸭子类型

pub mod errors;
pub mod identity;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use identity::*;
pub use lifecycle::*;
pub use metadata::*;
