//! # 基础设施组合层
//!
//! 负责把发现适配器、依赖注入容器和诊断输出组合成一个可以直接使用的容器。
//!
//! ## 主要功能
//!
//! - **容器启动器**: 运行组件发现器并构建容器
//! - **优先级合并**: 同一组件的多个声明按 [`InjectPriority`](infrastructure_common::InjectPriority) 选出一个
//! - **启动验证**: 构建时验证整个依赖图，可选地预热所有单例
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::{Binding, DiContainer, StaticDiscovery};
//! use infrastructure_composition::ContainerBootstrapper;
//!
//! struct Clock;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let discovery = StaticDiscovery::new("app").declare_type::<Clock>(Binding::singleton(|_| Ok(Clock)));
//!
//!     let container = ContainerBootstrapper::new()
//!         .add_discovery(discovery)
//!         .bootstrap()
//!         .await?;
//!
//!     let _clock = container.resolve::<Clock>()?;
//!     container.close();
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use bootstrapper::{merge_by_priority, ContainerBootstrapper};

// 重新导出错误类型
pub use infrastructure_common::ComponentError;
