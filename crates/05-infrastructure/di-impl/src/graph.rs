//! 依赖关系图
//!
//! 依赖图是注册表快照的纯函数：每个已注册标识一个节点，每个被引用但未注册的依赖也有一个节点，
//! 这样缺失绑定可以和其他错误一样在图上统一发现。边 `A -> B` 表示 "A 依赖 B"，
//! 边的顺序与绑定声明的依赖顺序一致。

use dashmap::DashMap;
use di_abstractions::{ComponentRegistry, ResolveContext};
use infrastructure_common::{ComponentIdentity, DependencyError, DependencyResult};
use std::collections::{HashMap, HashSet, VecDeque};

/// 依赖关系图
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// 节点，按首次出现的顺序
    nodes: Vec<ComponentIdentity>,
    /// 拥有绑定的节点
    bound: HashSet<ComponentIdentity>,
    /// 邻接表（依赖者 -> 依赖）
    adjacency_list: HashMap<ComponentIdentity, Vec<ComponentIdentity>>,
    /// 反向邻接表（依赖 -> 依赖者）
    reverse_adjacency_list: HashMap<ComponentIdentity, Vec<ComponentIdentity>>,
    /// 边数量（重复声明的依赖各算一条）
    edge_count: usize,
    /// 已通过验证的节点及其子图高度（节点自身算一层）
    verified_heights: DashMap<ComponentIdentity, usize>,
}

impl DependencyGraph {
    fn add_node(&mut self, identity: &ComponentIdentity) {
        if !self.adjacency_list.contains_key(identity) {
            self.nodes.push(identity.clone());
            self.adjacency_list.insert(identity.clone(), Vec::new());
            self.reverse_adjacency_list
                .insert(identity.clone(), Vec::new());
        }
    }

    fn add_edge(&mut self, dependent: &ComponentIdentity, dependency: &ComponentIdentity) {
        self.add_node(dependency);
        self.adjacency_list
            .entry(dependent.clone())
            .or_default()
            .push(dependency.clone());
        self.reverse_adjacency_list
            .entry(dependency.clone())
            .or_default()
            .push(dependent.clone());
        self.edge_count += 1;
    }

    /// 所有节点，按首次出现的顺序
    pub fn nodes(&self) -> &[ComponentIdentity] {
        &self.nodes
    }

    /// 节点数量
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 边数量
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// 图中是否包含该节点
    pub fn contains(&self, identity: &ComponentIdentity) -> bool {
        self.adjacency_list.contains_key(identity)
    }

    /// 节点是否拥有绑定
    pub fn is_bound(&self, identity: &ComponentIdentity) -> bool {
        self.bound.contains(identity)
    }

    /// 被引用但没有绑定的节点
    pub fn unbound_nodes(&self) -> Vec<&ComponentIdentity> {
        self.nodes
            .iter()
            .filter(|node| !self.bound.contains(*node))
            .collect()
    }

    /// 获取组件的直接依赖（按声明顺序）
    pub fn dependencies_of(&self, identity: &ComponentIdentity) -> &[ComponentIdentity] {
        self.adjacency_list
            .get(identity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// 获取直接依赖于指定组件的组件列表
    pub fn dependents_of(&self, identity: &ComponentIdentity) -> &[ComponentIdentity] {
        self.reverse_adjacency_list
            .get(identity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// 验证从 `root` 可达的子图
    ///
    /// 深度优先遍历，检测缺失绑定、循环依赖和深度超限，全程不调用任何工厂。
    /// 通过验证的节点会记住子图高度，同一个图上的后续解析只需比较深度。
    pub fn verify_root(&self, root: &ComponentIdentity, max_depth: usize) -> DependencyResult<()> {
        if let Some(height) = self.verified_height(root) {
            if height <= max_depth {
                return Ok(());
            }
        }

        let mut context = ResolveContext::new(max_depth);
        let mut heights = HashMap::new();
        self.visit(root, &mut context, &mut heights)?;

        for (identity, height) in heights {
            self.verified_heights.insert(identity, height);
        }
        Ok(())
    }

    fn verified_height(&self, identity: &ComponentIdentity) -> Option<usize> {
        self.verified_heights.get(identity).map(|entry| *entry.value())
    }

    /// 返回 `identity` 子图的高度
    fn visit(
        &self,
        identity: &ComponentIdentity,
        context: &mut ResolveContext,
        heights: &mut HashMap<ComponentIdentity, usize>,
    ) -> DependencyResult<usize> {
        let known = heights
            .get(identity)
            .copied()
            .or_else(|| self.verified_height(identity));
        if let Some(height) = known {
            if context.depth() + height <= context.max_depth() {
                return Ok(height);
            }
            // 在更深的位置再次到达，继续下探定位超限的节点
        }
        if !self.bound.contains(identity) {
            return Err(DependencyError::MissingBinding {
                identity: identity.clone(),
                required_by: context.current().cloned(),
            });
        }

        context.push(identity.clone())?;
        let mut deepest = 0;
        for dependency in self.dependencies_of(identity) {
            deepest = deepest.max(self.visit(dependency, context, heights)?);
        }
        context.pop();

        let height = deepest + 1;
        heights.insert(identity.clone(), height);
        Ok(height)
    }

    /// 验证整个图，返回发现的全部问题
    ///
    /// 按注册顺序遍历所有已绑定节点；同一个问题只报告一次。
    pub fn validate_all(&self, max_depth: usize) -> Vec<DependencyError> {
        let mut errors = Vec::new();
        let mut heights = HashMap::new();

        for root in self.nodes.iter().filter(|node| self.bound.contains(*node)) {
            let mut context = ResolveContext::new(max_depth);
            if let Err(error) = self.visit(root, &mut context, &mut heights) {
                // 失败路径上的节点记为零高度，不再重复报告
                for identity in context.chain() {
                    heights.entry(identity.clone()).or_insert(0);
                }
                errors.push(error);
            }
        }
        errors
    }

    /// 拓扑排序，依赖排在依赖者之前
    ///
    /// 使用 Kahn 算法；入度为零的节点按首次出现的顺序出队，因此结果是确定的。
    pub fn topological_order(&self) -> DependencyResult<Vec<ComponentIdentity>> {
        let mut remaining: HashMap<&ComponentIdentity, usize> = self
            .nodes
            .iter()
            .map(|node| (node, self.dependencies_of(node).len()))
            .collect();

        let mut queue: VecDeque<&ComponentIdentity> = self
            .nodes
            .iter()
            .filter(|node| remaining.get(node).copied() == Some(0))
            .collect();
        let mut result = Vec::with_capacity(self.nodes.len());

        while let Some(node) = queue.pop_front() {
            result.push(node.clone());
            for dependent in self.dependents_of(node) {
                if let Some(count) = remaining.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        if result.len() == self.nodes.len() {
            Ok(result)
        } else {
            let cycle = self.find_cycle().unwrap_or_default();
            Err(DependencyError::CircularDependency { cycle })
        }
    }

    /// 查找图中的第一个环
    ///
    /// 返回的环首尾相同，例如 `[A, B, A]`。
    pub fn find_cycle(&self) -> Option<Vec<ComponentIdentity>> {
        let mut visited = HashSet::new();
        for node in &self.nodes {
            if visited.contains(node) {
                continue;
            }
            let mut path = Vec::new();
            let mut on_path = HashSet::new();
            if let Some(cycle) = self.dfs_find_cycle(node, &mut visited, &mut on_path, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    fn dfs_find_cycle<'a>(
        &'a self,
        node: &'a ComponentIdentity,
        visited: &mut HashSet<&'a ComponentIdentity>,
        on_path: &mut HashSet<&'a ComponentIdentity>,
        path: &mut Vec<&'a ComponentIdentity>,
    ) -> Option<Vec<ComponentIdentity>> {
        visited.insert(node);
        on_path.insert(node);
        path.push(node);

        for dependency in self.dependencies_of(node) {
            if on_path.contains(dependency) {
                let start = path.iter().position(|n| *n == dependency).unwrap_or(0);
                let mut cycle: Vec<ComponentIdentity> =
                    path[start..].iter().map(|n| (*n).clone()).collect();
                cycle.push(dependency.clone());
                return Some(cycle);
            }
            if !visited.contains(dependency) {
                if let Some(cycle) = self.dfs_find_cycle(dependency, visited, on_path, path) {
                    return Some(cycle);
                }
            }
        }

        path.pop();
        on_path.remove(node);
        None
    }
}

/// 依赖图构建器
#[derive(Debug, Default, Clone, Copy)]
pub struct DependencyGraphBuilder;

impl DependencyGraphBuilder {
    /// 从注册表快照构建依赖图
    pub fn build(registry: &dyn ComponentRegistry) -> DependencyGraph {
        let mut graph = DependencyGraph::default();
        let identities = registry.identities();

        for identity in &identities {
            graph.add_node(identity);
            graph.bound.insert(identity.clone());
        }

        for identity in &identities {
            if let Ok(binding) = registry.lookup(identity) {
                for dependency in binding.dependencies() {
                    graph.add_edge(identity, dependency);
                }
            }
        }

        graph
    }
}
