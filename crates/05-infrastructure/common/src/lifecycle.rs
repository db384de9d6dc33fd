//! 组件生命周期管理

use crate::errors::ComponentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 组件生命周期作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// 单例模式 - 每个容器内只创建一个实例
    Singleton,
    /// 瞬时模式 - 每个注入点都创建新实例
    #[default]
    Transient,
}

impl Scope {
    /// 是否为单例
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::Singleton)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singleton => f.write_str("singleton"),
            Self::Transient => f.write_str("transient"),
        }
    }
}

impl FromStr for Scope {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "singleton" => Ok(Self::Singleton),
            "transient" | "prototype" => Ok(Self::Transient),
            _ => Err(ComponentError::InvalidMetadata {
                message: format!("未知的组件作用域: {s}"),
            }),
        }
    }
}

/// 注入优先级
///
/// 多个发现器为同一组件标识提供声明时，优先级最高的声明生效；
/// 顺序从低到高为 `Lowest < Low < Normal < High < Highest`。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InjectPriority {
    /// 最低优先级
    Lowest,
    /// 较低优先级
    Low,
    /// 默认优先级
    #[default]
    Normal,
    /// 较高优先级
    High,
    /// 最高优先级
    Highest,
}

impl fmt::Display for InjectPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lowest => "lowest",
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Highest => "highest",
        };
        f.write_str(name)
    }
}
