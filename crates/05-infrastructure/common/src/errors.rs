//! 错误类型定义

use crate::metadata::AbstractionKey;
use thiserror::Error;

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("解析器无效: {resolver}, 原因: {reason}")]
    InvalidResolver {
        resolver: &'static str,
        reason: String,
    },

    #[error("抽象未注册: {abstraction}")]
    UnresolvedAbstraction { abstraction: AbstractionKey },

    #[error("接收者无效: {reason}")]
    InvalidReceiver { reason: String },

    #[error("检测到循环依赖: {chain}")]
    CyclicDependency {
        abstraction: AbstractionKey,
        chain: String,
    },

    #[error("解析深度超过上限 {max_depth}: {abstraction}")]
    ResolutionDepthExceeded {
        abstraction: AbstractionKey,
        max_depth: usize,
    },

    #[error("实例类型不匹配: {abstraction}")]
    InstanceTypeMismatch { abstraction: AbstractionKey },

    #[error("默认容器已被当前线程占用，不能在解析器或注入函数中调用 {operation}")]
    ReentrantAccess { operation: &'static str },

    /// 解析器或注入函数自身返回的错误，原样透传
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl DependencyError {
    /// 创建解析器无效错误
    pub fn invalid_resolver(resolver: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidResolver {
            resolver,
            reason: reason.into(),
        }
    }

    /// 创建抽象未注册错误
    pub fn unresolved(abstraction: AbstractionKey) -> Self {
        Self::UnresolvedAbstraction { abstraction }
    }

    /// 创建接收者无效错误
    pub fn invalid_receiver(reason: impl Into<String>) -> Self {
        Self::InvalidReceiver {
            reason: reason.into(),
        }
    }

    /// 包装解析器或注入函数返回的错误
    pub fn failed(error: impl Into<anyhow::Error>) -> Self {
        Self::Failed(error.into())
    }

    /// 出错的抽象（如果错误与某个抽象相关）
    pub fn abstraction(&self) -> Option<&AbstractionKey> {
        match self {
            Self::UnresolvedAbstraction { abstraction }
            | Self::CyclicDependency { abstraction, .. }
            | Self::ResolutionDepthExceeded { abstraction, .. }
            | Self::InstanceTypeMismatch { abstraction } => Some(abstraction),
            Self::InvalidResolver { .. }
            | Self::InvalidReceiver { .. }
            | Self::ReentrantAccess { .. }
            | Self::Failed(_) => None,
        }
    }
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
