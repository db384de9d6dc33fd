//! # 依赖注入具体实现
//!
//! 提供具体的依赖注入容器、组件注册表、依赖图和解析器实现。
//!
//! ```
//! use di_abstractions::{Binding, ContainerBuilder, DiContainer};
//! use di_impl::DiContainerBuilder;
//! use infrastructure_common::ComponentIdentity;
//! use std::sync::Arc;
//!
//! struct Wheel;
//! struct Engine {
//!     wheels: Vec<Arc<Wheel>>,
//! }
//!
//! let container = DiContainerBuilder::new()
//!     .bind_type::<Wheel>(Binding::transient(|_| Ok(Wheel)))
//!     .bind_type::<Engine>(
//!         Binding::singleton(|deps| {
//!             let wheels = (0..deps.len())
//!                 .map(|i| deps.get::<Wheel>(i))
//!                 .collect::<Result<Vec<_>, _>>()?;
//!             Ok(Engine { wheels })
//!         })
//!         .with_dependencies(vec![ComponentIdentity::of::<Wheel>(); 4]),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let engine = container.resolve::<Engine>().unwrap();
//! assert_eq!(engine.wheels.len(), 4);
//! ```

pub mod builder;
pub mod container;
pub mod graph;
pub mod registry;
pub mod resolver;
pub mod scope_cache;

pub use builder::DiContainerBuilder;
pub use container::DiContainerImpl;
pub use graph::{DependencyGraph, DependencyGraphBuilder};
pub use registry::ComponentRegistryImpl;
pub use resolver::Resolver;
pub use scope_cache::ScopeCache;
