//! 作用域缓存
//!
//! 按组件标识保存已创建的单例实例。每个标识对应一个 `OnceCell`，
//! 同一单例的并发首次请求中只有一个会执行工厂，其余线程阻塞等待并拿到同一个实例。

use dashmap::DashMap;
use di_abstractions::Instance;
use infrastructure_common::{ComponentIdentity, DependencyResult, Scope};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// 单例作用域缓存，只属于一个容器
#[derive(Debug, Default)]
pub struct ScopeCache {
    cells: DashMap<ComponentIdentity, Arc<OnceCell<Instance>>>,
}

impl ScopeCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取或创建实例
    ///
    /// 瞬时作用域完全绕过缓存，每次都调用 `create`。
    /// 单例作用域在 `create` 成功后缓存结果；失败时不缓存，下一次请求会重新尝试。
    pub fn get_or_create<F>(
        &self,
        scope: Scope,
        identity: &ComponentIdentity,
        create: F,
    ) -> DependencyResult<Instance>
    where
        F: FnOnce() -> DependencyResult<Instance>,
    {
        if !scope.is_singleton() {
            return create();
        }

        // 先克隆出 cell 再释放分片锁，工厂里对其他单例的解析不会卡在同一个分片上
        let cell = self
            .cells
            .entry(identity.clone())
            .or_default()
            .value()
            .clone();
        cell.get_or_try_init(create).cloned()
    }

    /// 获取已缓存的单例
    pub fn get(&self, identity: &ComponentIdentity) -> Option<Instance> {
        self.cells
            .get(identity)
            .and_then(|cell| cell.get().cloned())
    }

    /// 已创建的单例数量
    pub fn instance_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// 清空缓存，返回释放的实例数量
    pub fn clear(&self) -> usize {
        let released = self.instance_count();
        self.cells.clear();
        released
    }
}
