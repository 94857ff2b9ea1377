//! 抽象与依赖参数
//!
//! 一个抽象就是调用方依赖的类型契约，通常是 `Arc<dyn Trait + Send + Sync>`。
//! 解析器与注入函数的参数列表被视为一组依赖，按从左到右的顺序逐个解析。

use crate::resolver::{DependencyResolver, ResolveContext};
use infrastructure_common::{AbstractionKey, DependencyError, DependencyResult};
use std::any::Any;
use std::sync::Arc;

/// 抽象 trait
///
/// 任何可克隆、可跨线程共享的 `'static` 类型都可以作为抽象使用。
/// 注册表保存实例并在解析时交出它的克隆，因此用 `Arc` 包装的抽象
/// 在单例解析之间保持同一性。
pub trait Abstraction: Clone + Send + Sync + 'static {}

impl<T> Abstraction for T where T: Clone + Send + Sync + 'static {}

/// 类型擦除后的实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 将实例还原为具体抽象类型
pub fn downcast_instance<T: Abstraction>(instance: &Instance) -> DependencyResult<T> {
    instance
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| DependencyError::InstanceTypeMismatch {
            abstraction: AbstractionKey::of::<T>(),
        })
}

/// 通过解析器解析单个抽象
pub fn resolve_dependency<T: Abstraction>(
    resolver: &dyn DependencyResolver,
    context: &mut ResolveContext,
) -> DependencyResult<T> {
    let instance = resolver.resolve_instance(&AbstractionKey::of::<T>(), context)?;
    downcast_instance(&instance)
}

/// 依赖参数列表
///
/// 为 0 到 8 个抽象组成的元组实现。解析按参数位置从左到右进行，
/// 第一个失败的参数即终止整个解析。
pub trait Dependencies: Sized + 'static {
    /// 参数列表中各位置的抽象标识
    fn keys() -> Vec<AbstractionKey>;

    /// 解析全部参数
    fn resolve(
        resolver: &dyn DependencyResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<Self>;
}

macro_rules! impl_dependencies {
    ($($ty:ident),*) => {
        impl<$($ty: Abstraction,)*> Dependencies for ($($ty,)*) {
            fn keys() -> Vec<AbstractionKey> {
                vec![$(AbstractionKey::of::<$ty>()),*]
            }

            #[allow(unused_variables)]
            fn resolve(
                resolver: &dyn DependencyResolver,
                context: &mut ResolveContext,
            ) -> DependencyResult<Self> {
                Ok(($(resolve_dependency::<$ty>(resolver, context)?,)*))
            }
        }
    };
}

impl_dependencies!();
impl_dependencies!(A1);
impl_dependencies!(A1, A2);
impl_dependencies!(A1, A2, A3);
impl_dependencies!(A1, A2, A3, A4);
impl_dependencies!(A1, A2, A3, A4, A5);
impl_dependencies!(A1, A2, A3, A4, A5, A6);
impl_dependencies!(A1, A2, A3, A4, A5, A6, A7);
impl_dependencies!(A1, A2, A3, A4, A5, A6, A7, A8);
