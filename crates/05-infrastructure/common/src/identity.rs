//! 组件标识
//!
//! 组件标识由声明类型和可选的限定符组成，按值比较和哈希，
//! 是注册表、依赖图和作用域缓存之间唯一的键。

use crate::metadata::TypeInfo;
use std::fmt;
use std::sync::Arc;

/// 组件标识
///
/// 同一类型可以通过不同限定符绑定多次，例如 `Database#primary` 与 `Database#replica`。
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ComponentIdentity {
    type_info: TypeInfo,
    qualifier: Option<Arc<str>>,
}

impl ComponentIdentity {
    /// 创建不带限定符的组件标识
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            qualifier: None,
        }
    }

    /// 创建带限定符的组件标识
    pub fn named<T: ?Sized + 'static>(qualifier: impl Into<Arc<str>>) -> Self {
        Self::of::<T>().with_qualifier(qualifier)
    }

    /// 从类型信息创建组件标识
    pub fn from_type_info(type_info: TypeInfo, qualifier: Option<Arc<str>>) -> Self {
        Self {
            type_info,
            qualifier,
        }
    }

    /// 设置限定符
    pub fn with_qualifier(mut self, qualifier: impl Into<Arc<str>>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 完整类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_info.name
    }

    /// 限定符
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// 声明类型是否为 `T`（忽略限定符）
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_info.is::<T>()
    }
}

impl fmt::Display for ComponentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}#{}", self.type_info, qualifier),
            None => write!(f, "{}", self.type_info),
        }
    }
}

impl fmt::Debug for ComponentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentIdentity({self})")
    }
}

/// 将标识链格式化为 `A -> B -> C`
pub fn format_chain(chain: &[ComponentIdentity]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
