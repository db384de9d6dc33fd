//! 组件注册表实现

use di_abstractions::{Binding, ComponentRegistry};
use infrastructure_common::{ComponentIdentity, DependencyError, DependencyResult};
use std::collections::HashMap;

/// 基于哈希表的组件注册表
///
/// 额外记录注册顺序，依赖图按该顺序构建，诊断输出因此可复现。
#[derive(Debug, Default, Clone)]
pub struct ComponentRegistryImpl {
    bindings: HashMap<ComponentIdentity, Binding>,
    order: Vec<ComponentIdentity>,
}

impl ComponentRegistryImpl {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }
}

impl ComponentRegistry for ComponentRegistryImpl {
    fn register(&mut self, identity: ComponentIdentity, binding: Binding) -> DependencyResult<()> {
        if self.bindings.contains_key(&identity) {
            return Err(DependencyError::DuplicateBinding { identity });
        }
        self.order.push(identity.clone());
        self.bindings.insert(identity, binding);
        Ok(())
    }

    fn lookup(&self, identity: &ComponentIdentity) -> DependencyResult<&Binding> {
        self.bindings
            .get(identity)
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                identity: identity.clone(),
            })
    }

    fn contains(&self, identity: &ComponentIdentity) -> bool {
        self.bindings.contains_key(identity)
    }

    fn identities(&self) -> Vec<ComponentIdentity> {
        self.order.clone()
    }

    fn len(&self) -> usize {
        self.bindings.len()
    }

    fn clear(&mut self) {
        self.bindings.clear();
        self.order.clear();
    }
}
