//! 绑定生命周期

use std::fmt;

/// 绑定生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// 单例模式 - 注册时立即创建，之后每次解析都返回同一个实例
    Singleton,
    /// 瞬时模式 - 每次请求都调用解析器创建新实例
    Transient,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singleton => f.write_str("单例"),
            Self::Transient => f.write_str("瞬时"),
        }
    }
}
