//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::abstraction::{Abstraction, Dependencies};
use crate::factory::{Produces, Resolver};
use crate::receiver::Receiver;
use crate::resolver::DependencyResolver;
use infrastructure_common::{AbstractionKey, DependencyResult, Lifetime};
use serde::{Deserialize, Serialize};

/// 依赖注入容器 trait
///
/// 提供注册、解析、注入与重置功能
pub trait DiContainer: DependencyResolver {
    /// 注册单例绑定
    ///
    /// 解析器在注册时立即以已注册的依赖调用一次，结果被缓存。
    /// 任一参数无法解析时注册失败，且不会为解析器的任何返回值创建绑定。
    fn singleton<R, Args>(&mut self, resolver: R) -> DependencyResult<()>
    where
        R: Resolver<Args>,
        R::Output: Produces,
        Args: Dependencies;

    /// 注册返回 `Result` 的单例绑定，解析器返回的错误原样透传
    fn try_singleton<R, Args, O, E>(&mut self, resolver: R) -> DependencyResult<()>
    where
        R: Resolver<Args, Output = Result<O, E>>,
        O: Produces,
        E: Into<anyhow::Error> + 'static,
        Args: Dependencies;

    /// 注册瞬时绑定
    ///
    /// 解析器在每次解析时调用，依赖在那时才解析
    fn transient<R, Args>(&mut self, resolver: R) -> DependencyResult<()>
    where
        R: Resolver<Args>,
        R::Output: Produces,
        Args: Dependencies;

    /// 注册返回 `Result` 的瞬时绑定
    fn try_transient<R, Args, O, E>(&mut self, resolver: R) -> DependencyResult<()>
    where
        R: Resolver<Args, Output = Result<O, E>>,
        O: Produces,
        E: Into<anyhow::Error> + 'static,
        Args: Dependencies;

    /// 解析抽象
    fn resolve<T: Abstraction>(&self) -> DependencyResult<T>;

    /// 填充槽位或向函数注入依赖
    fn make<M, R>(&self, receiver: R) -> DependencyResult<()>
    where
        R: Receiver<M>;

    /// 移除所有绑定
    fn reset(&mut self);

    /// 检查是否已注册抽象
    fn is_registered<T: Abstraction>(&self) -> bool {
        self.can_resolve(&AbstractionKey::of::<T>())
    }

    /// 获取所有已注册的绑定
    fn registered_abstractions(&self) -> Vec<BindingDescriptor>;

    /// 获取容器统计信息
    fn stats(&self) -> ContainerStats;
}

/// 绑定描述符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDescriptor {
    /// 绑定的抽象
    pub abstraction: AbstractionKey,
    /// 绑定生命周期
    pub lifetime: Lifetime,
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 是否启用循环依赖检测
    pub enable_circular_dependency_detection: bool,
    /// 最大解析深度
    pub max_resolution_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            enable_circular_dependency_detection: true,
            max_resolution_depth: 100,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 已注册绑定数量
    pub registered_bindings: usize,
    /// 活跃单例数量
    pub active_singletons: usize,
}
