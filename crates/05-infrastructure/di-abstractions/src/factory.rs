//! 组件工厂抽象
//!
//! 容器只把工厂当作不透明的可调用对象：输入按声明顺序排列的已解析依赖，
//! 输出一个实例或者一个错误。

use infrastructure_common::{ComponentIdentity, FactoryError};
use std::any::Any;
use std::sync::Arc;

/// 容器中的组件实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 组件工厂函数类型
pub type ComponentFactoryFn =
    Arc<dyn Fn(&ResolvedDependencies) -> Result<Instance, FactoryError> + Send + Sync>;

/// 已解析的依赖
///
/// 按绑定声明的依赖顺序排列，下标与 [`Binding::dependencies`](crate::Binding::dependencies) 一一对应。
#[derive(Clone, Default)]
pub struct ResolvedDependencies {
    identities: Vec<ComponentIdentity>,
    instances: Vec<Instance>,
}

impl ResolvedDependencies {
    /// 创建已解析依赖集合
    ///
    /// `identities` 只用于错误信息，下标以 `instances` 为准。
    pub fn new(identities: Vec<ComponentIdentity>, instances: Vec<Instance>) -> Self {
        Self {
            identities,
            instances,
        }
    }

    /// 按下标获取类型化的依赖
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, FactoryError> {
        let instance = self.raw(index)?;
        Arc::clone(instance).downcast::<T>().map_err(|_| {
            let expected = std::any::type_name::<T>();
            match self.identities.get(index) {
                Some(identity) => format!("依赖 #{index} ({identity}) 不是类型 {expected}"),
                None => format!("依赖 #{index} 不是类型 {expected}"),
            }
            .into()
        })
    }

    /// 按下标获取未转换的依赖实例
    pub fn raw(&self, index: usize) -> Result<&Instance, FactoryError> {
        self.instances.get(index).ok_or_else(|| {
            format!("依赖下标越界: {index}, 共 {} 个依赖", self.instances.len()).into()
        })
    }

    /// 依赖的组件标识
    pub fn identities(&self) -> &[ComponentIdentity] {
        &self.identities
    }

    /// 依赖实例迭代器
    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter()
    }

    /// 依赖数量
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// 是否没有依赖
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl std::fmt::Debug for ResolvedDependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedDependencies")
            .field("identities", &self.identities)
            .finish_non_exhaustive()
    }
}

/// 将返回具体类型的工厂包装为 [`ComponentFactoryFn`]
pub fn typed_factory<T, F>(factory: F) -> ComponentFactoryFn
where
    T: Any + Send + Sync,
    F: Fn(&ResolvedDependencies) -> Result<T, FactoryError> + Send + Sync + 'static,
{
    Arc::new(move |dependencies| {
        let instance: Instance = Arc::new(factory(dependencies)?);
        Ok(instance)
    })
}
