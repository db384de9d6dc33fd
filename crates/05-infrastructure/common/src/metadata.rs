//! 元数据定义
//!
//! 提供组件类型的元数据信息

use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型ID
    pub id: TypeId,
    /// 完整类型名称（包含模块路径）
    pub name: &'static str,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    ///
    /// 泛型参数保持原样，只去掉最外层类型的模块路径，
    /// 例如 `alloc::sync::Arc<dyn app::Logger>` 得到 `Arc<dyn app::Logger>`。
    pub fn short_name(&self) -> &'static str {
        let name = self.name;
        let head_end = name.find('<').unwrap_or(name.len());
        match name[..head_end].rfind("::") {
            Some(pos) => &name[pos + 2..],
            None => name,
        }
    }

    /// 是否为指定类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
