//! 进程级默认容器
//!
//! 提供与 [`Container`] 相同契约的自由函数，调用方无需自行持有容器。
//! 默认容器在首次使用时创建，之后在整个进程中只有这一个实例。
//!
//! 解析器和注入函数执行期间容器处于加锁状态。它们若在同一线程上再次调用
//! 本模块中的函数，会得到 [`DependencyError::ReentrantAccess`]，而不是死锁。

use crate::Container;
use di_abstractions::{Abstraction, Dependencies, DiContainer, Produces, Receiver, Resolver};
use infrastructure_common::{DependencyError, DependencyResult};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::cell::Cell;

/// 默认容器
static DEFAULT_CONTAINER: Lazy<RwLock<Container>> = Lazy::new(|| RwLock::new(Container::new()));

thread_local! {
    /// 当前线程是否持有默认容器的锁
    static HOLDS_LOCK: Cell<bool> = const { Cell::new(false) };
}

/// 当前线程持有默认容器锁的区间
struct LockScope;

impl LockScope {
    fn enter(operation: &'static str) -> DependencyResult<Self> {
        if HOLDS_LOCK.with(|held| held.replace(true)) {
            return Err(DependencyError::ReentrantAccess { operation });
        }
        Ok(Self)
    }
}

impl Drop for LockScope {
    fn drop(&mut self) {
        HOLDS_LOCK.with(|held| held.set(false));
    }
}

fn with_read<T>(
    operation: &'static str,
    f: impl FnOnce(&Container) -> DependencyResult<T>,
) -> DependencyResult<T> {
    let _scope = LockScope::enter(operation)?;
    let container = DEFAULT_CONTAINER.read();
    f(&container)
}

fn with_write<T>(
    operation: &'static str,
    f: impl FnOnce(&mut Container) -> DependencyResult<T>,
) -> DependencyResult<T> {
    let _scope = LockScope::enter(operation)?;
    let mut container = DEFAULT_CONTAINER.write();
    f(&mut container)
}

/// 在默认容器中注册单例绑定
pub fn singleton<R, Args>(resolver: R) -> DependencyResult<()>
where
    R: Resolver<Args>,
    R::Output: Produces,
    Args: Dependencies,
{
    with_write("singleton", |container| container.singleton(resolver))
}

/// 在默认容器中注册返回 `Result` 的单例绑定
pub fn try_singleton<R, Args, O, E>(resolver: R) -> DependencyResult<()>
where
    R: Resolver<Args, Output = Result<O, E>>,
    O: Produces,
    E: Into<anyhow::Error> + 'static,
    Args: Dependencies,
{
    with_write("try_singleton", |container| container.try_singleton(resolver))
}

/// 在默认容器中注册瞬时绑定
pub fn transient<R, Args>(resolver: R) -> DependencyResult<()>
where
    R: Resolver<Args>,
    R::Output: Produces,
    Args: Dependencies,
{
    with_write("transient", |container| container.transient(resolver))
}

/// 在默认容器中注册返回 `Result` 的瞬时绑定
pub fn try_transient<R, Args, O, E>(resolver: R) -> DependencyResult<()>
where
    R: Resolver<Args, Output = Result<O, E>>,
    O: Produces,
    E: Into<anyhow::Error> + 'static,
    Args: Dependencies,
{
    with_write("try_transient", |container| container.try_transient(resolver))
}

/// 从默认容器解析抽象
pub fn resolve<T: Abstraction>() -> DependencyResult<T> {
    with_read("resolve", |container| container.resolve())
}

/// 使用默认容器填充槽位或向函数注入依赖
pub fn make<M, R>(receiver: R) -> DependencyResult<()>
where
    R: Receiver<M>,
{
    with_read("make", |container| container.make(receiver))
}

/// 移除默认容器中的所有绑定
pub fn reset() -> DependencyResult<()> {
    with_write("reset", |container| {
        container.reset();
        Ok(())
    })
}
