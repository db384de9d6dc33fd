//! 组件解析器抽象接口
//!
//! 提供依赖解析和组件实例化的能力

use crate::factory::Instance;
use infrastructure_common::{ComponentIdentity, DependencyError, DependencyResult};
use std::collections::HashSet;

/// 组件解析器 trait
///
/// 负责解析组件依赖并创建组件实例
pub trait ComponentResolver: Send + Sync {
    /// 解析指定标识的组件
    fn resolve(&self, identity: &ComponentIdentity) -> DependencyResult<Instance>;

    /// 检查是否可以解析指定标识（不会调用任何工厂）
    fn can_resolve(&self, identity: &ComponentIdentity) -> bool;
}

/// 解析上下文
///
/// 记录单次解析调用中当前的解析链，用于检测循环依赖和限制递归深度。
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链（从请求的根到当前节点）
    resolution_chain: Vec<ComponentIdentity>,
    /// 解析链上的标识集合
    in_progress: HashSet<ComponentIdentity>,
    /// 最大递归深度
    max_depth: usize,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(max_depth: usize) -> Self {
        Self {
            resolution_chain: Vec::new(),
            in_progress: HashSet::new(),
            max_depth,
        }
    }

    /// 添加标识到解析链
    ///
    /// 标识已在解析链上时返回 `CircularDependency`，环以该标识开始并结束。
    pub fn push(&mut self, identity: ComponentIdentity) -> DependencyResult<()> {
        if self.in_progress.contains(&identity) {
            let start = self
                .resolution_chain
                .iter()
                .position(|candidate| candidate == &identity)
                .unwrap_or(0);
            let mut cycle = self.resolution_chain[start..].to_vec();
            cycle.push(identity);
            return Err(DependencyError::CircularDependency { cycle });
        }
        if self.resolution_chain.len() >= self.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                identity,
                max_depth: self.max_depth,
            });
        }
        self.in_progress.insert(identity.clone());
        self.resolution_chain.push(identity);
        Ok(())
    }

    /// 从解析链中移除最后一个标识
    pub fn pop(&mut self) -> Option<ComponentIdentity> {
        let identity = self.resolution_chain.pop()?;
        self.in_progress.remove(&identity);
        Some(identity)
    }

    /// 当前解析链
    pub fn chain(&self) -> &[ComponentIdentity] {
        &self.resolution_chain
    }

    /// 正在解析的标识
    pub fn current(&self) -> Option<&ComponentIdentity> {
        self.resolution_chain.last()
    }

    /// 当前深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 最大递归深度
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new(100)
    }
}
