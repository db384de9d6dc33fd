//! 组件注册表抽象接口

use crate::factory::{typed_factory, ComponentFactoryFn, Instance, ResolvedDependencies};
use infrastructure_common::{ComponentIdentity, DependencyResult, FactoryError, Scope};
use std::any::Any;
use std::sync::Arc;

/// 组件绑定
///
/// 描述如何为某个组件标识生产实例：工厂、按顺序声明的依赖列表以及作用域。
#[derive(Clone)]
pub struct Binding {
    factory: ComponentFactoryFn,
    dependencies: Vec<ComponentIdentity>,
    scope: Scope,
}

impl Binding {
    /// 使用原始工厂函数创建绑定
    pub fn new(
        scope: Scope,
        dependencies: Vec<ComponentIdentity>,
        factory: ComponentFactoryFn,
    ) -> Self {
        Self {
            factory,
            dependencies,
            scope,
        }
    }

    /// 使用返回具体类型的工厂创建绑定
    pub fn typed<T, F>(scope: Scope, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&ResolvedDependencies) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        Self::new(scope, Vec::new(), typed_factory(factory))
    }

    /// 创建单例绑定
    pub fn singleton<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&ResolvedDependencies) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        Self::typed(Scope::Singleton, factory)
    }

    /// 创建瞬时绑定
    pub fn transient<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&ResolvedDependencies) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        Self::typed(Scope::Transient, factory)
    }

    /// 将已有实例注册为单例
    ///
    /// 每次解析都返回同一个 `Arc`。
    pub fn instance<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        let instance: Instance = value;
        Self::new(
            Scope::Singleton,
            Vec::new(),
            Arc::new(move |_| Ok(Arc::clone(&instance))),
        )
    }

    /// 追加一个依赖
    pub fn depends_on(mut self, identity: ComponentIdentity) -> Self {
        self.dependencies.push(identity);
        self
    }

    /// 追加多个依赖
    pub fn with_dependencies<I>(mut self, identities: I) -> Self
    where
        I: IntoIterator<Item = ComponentIdentity>,
    {
        self.dependencies.extend(identities);
        self
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// 作用域
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// 按声明顺序排列的依赖
    pub fn dependencies(&self) -> &[ComponentIdentity] {
        &self.dependencies
    }

    /// 工厂函数
    pub fn factory(&self) -> &ComponentFactoryFn {
        &self.factory
    }

    /// 调用工厂创建实例
    pub fn create(&self, dependencies: &ResolvedDependencies) -> Result<Instance, FactoryError> {
        (self.factory)(dependencies)
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("scope", &self.scope)
            .field("dependencies", &self.dependencies)
            .field("factory", &"<function>")
            .finish()
    }
}

/// 组件注册表 trait
///
/// 维护组件标识到绑定的映射。注册顺序不影响解析的正确性，
/// 但实现必须按注册顺序返回标识，以保证依赖图和诊断信息可复现。
pub trait ComponentRegistry: Send + Sync {
    /// 注册绑定，标识已存在时返回 `DuplicateBinding`
    fn register(&mut self, identity: ComponentIdentity, binding: Binding) -> DependencyResult<()>;

    /// 查找绑定，未注册时返回 `ComponentNotRegistered`
    fn lookup(&self, identity: &ComponentIdentity) -> DependencyResult<&Binding>;

    /// 检查组件是否已注册
    fn contains(&self, identity: &ComponentIdentity) -> bool;

    /// 按注册顺序返回所有标识
    fn identities(&self) -> Vec<ComponentIdentity>;

    /// 已注册的绑定数量
    fn len(&self) -> usize;

    /// 是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清理所有绑定
    fn clear(&mut self);
}
