//! 组件发现抽象接口
//!
//! 发现适配器负责解释宿主环境里的组件声明（属性、宏、配置……），
//! 并产出显式的 [`ComponentDeclaration`] 列表。容器核心只消费这份列表，
//! 从不自己遍历文件系统或模块树。

use crate::registry::Binding;
use async_trait::async_trait;
use infrastructure_common::{ComponentError, ComponentIdentity, InjectPriority};

/// 组件声明
#[derive(Debug, Clone)]
pub struct ComponentDeclaration {
    /// 组件标识
    pub identity: ComponentIdentity,
    /// 组件绑定
    pub binding: Binding,
    /// 注入优先级
    pub priority: InjectPriority,
}

impl ComponentDeclaration {
    /// 创建新的组件声明
    pub fn new(identity: ComponentIdentity, binding: Binding) -> Self {
        Self {
            identity,
            binding,
            priority: InjectPriority::default(),
        }
    }

    /// 为类型 `T` 创建不带限定符的组件声明
    pub fn of<T: ?Sized + 'static>(binding: Binding) -> Self {
        Self::new(ComponentIdentity::of::<T>(), binding)
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: InjectPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// 组件发现器 trait
#[async_trait]
pub trait ComponentDiscovery: Send + Sync {
    /// 发现组件
    async fn discover(&self) -> Result<Vec<ComponentDeclaration>, ComponentError>;

    /// 获取发现器名称
    fn name(&self) -> &str;
}

/// 发现结果
#[derive(Debug, Clone)]
pub struct DiscoveryResult {
    /// 发现的组件声明
    pub components: Vec<ComponentDeclaration>,
    /// 发现器名称
    pub discoverer: String,
    /// 发现时间
    pub discovered_at: chrono::DateTime<chrono::Utc>,
}

impl DiscoveryResult {
    /// 创建新的发现结果
    pub fn new(components: Vec<ComponentDeclaration>, discoverer: impl Into<String>) -> Self {
        Self {
            components,
            discoverer: discoverer.into(),
            discovered_at: chrono::Utc::now(),
        }
    }
}

/// 静态发现器
///
/// 直接返回手工构建的声明列表，适用于测试和显式装配。
#[derive(Debug, Clone)]
pub struct StaticDiscovery {
    name: String,
    declarations: Vec<ComponentDeclaration>,
}

impl StaticDiscovery {
    /// 创建新的静态发现器
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declarations: Vec::new(),
        }
    }

    /// 添加组件声明
    pub fn declare(mut self, declaration: ComponentDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// 为类型 `T` 添加组件声明
    pub fn declare_type<T: ?Sized + 'static>(self, binding: Binding) -> Self {
        self.declare(ComponentDeclaration::of::<T>(binding))
    }
}

impl FromIterator<ComponentDeclaration> for StaticDiscovery {
    fn from_iter<I: IntoIterator<Item = ComponentDeclaration>>(iter: I) -> Self {
        Self {
            name: "static".to_string(),
            declarations: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ComponentDiscovery for StaticDiscovery {
    async fn discover(&self) -> Result<Vec<ComponentDeclaration>, ComponentError> {
        Ok(self.declarations.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
