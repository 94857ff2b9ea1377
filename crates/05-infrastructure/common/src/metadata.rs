//! 元数据定义
//!
//! 提供抽象的类型标识信息

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 抽象标识
///
/// 用作注册表的查找键。两个键相等当且仅当它们表示同一个类型契约，
/// `name` 仅用于诊断输出，不参与比较。
#[derive(Debug, Clone, Copy)]
pub struct AbstractionKey {
    /// 类型ID
    id: TypeId,
    /// 完整类型名称
    name: &'static str,
}

impl AbstractionKey {
    /// 从类型获取抽象标识
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 类型ID
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名称（包含模块路径）
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &'static str {
        // 泛型参数、元组和数组元素里也可能带路径，只看最外层路径
        let outer = self
            .name
            .split(['<', '(', '[', ' ', '&'])
            .next()
            .unwrap_or(self.name);
        let start = outer.rfind("::").map_or(0, |index| index + 2);
        &self.name[start..]
    }

    /// 是否为单元类型 `()`
    pub fn is_unit(&self) -> bool {
        self.id == TypeId::of::<()>()
    }
}

impl PartialEq for AbstractionKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AbstractionKey {}

impl Hash for AbstractionKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for AbstractionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    trait Greeter {}

    #[test]
    fn keys_compare_by_type() {
        assert_eq!(AbstractionKey::of::<u32>(), AbstractionKey::of::<u32>());
        assert_ne!(AbstractionKey::of::<u32>(), AbstractionKey::of::<i32>());
        assert_ne!(
            AbstractionKey::of::<Arc<dyn Greeter>>(),
            AbstractionKey::of::<Box<dyn Greeter>>()
        );

        let keys: HashSet<_> = [
            AbstractionKey::of::<String>(),
            AbstractionKey::of::<String>(),
            AbstractionKey::of::<u8>(),
        ]
        .into_iter()
        .collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn names_are_readable() {
        let key = AbstractionKey::of::<String>();
        assert_eq!(key.to_string(), "alloc::string::String");
        assert_eq!(key.short_name(), "String");

        let key = AbstractionKey::of::<Arc<dyn Greeter>>();
        assert!(key.short_name().starts_with("Arc<"));
        assert!(key.name().contains("Greeter"));
    }

    #[test]
    fn compound_names_keep_their_shape() {
        let key = AbstractionKey::of::<(u8, String)>();
        assert_eq!(key.short_name(), "(u8, alloc::string::String)");

        let key = AbstractionKey::of::<[String; 2]>();
        assert_eq!(key.short_name(), "[alloc::string::String; 2]");

        let key = AbstractionKey::of::<Option<String>>();
        assert_eq!(key.short_name(), "Option<alloc::string::String>");
    }

    #[test]
    fn unit_is_detected() {
        assert!(AbstractionKey::of::<()>().is_unit());
        assert!(!AbstractionKey::of::<(u8,)>().is_unit());
    }
}
