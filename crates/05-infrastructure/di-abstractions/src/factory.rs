//! 解析器（工厂）抽象接口
//!
//! 解析器是一个函数，它的参数是其他抽象，返回值声明了它所满足的抽象。
//! 返回单个抽象时直接返回该值，同时满足多个抽象时返回 [`Many`]。

use crate::abstraction::{Abstraction, Instance};
use crate::resolver::SlotTarget;
use infrastructure_common::AbstractionKey;
use std::any::TypeId;
use std::sync::Arc;

/// 解析器 trait
///
/// 为所有 `Fn(A1, .., An) -> R`（n 不超过 8）实现，`Ai` 均为抽象
pub trait Resolver<Args>: Send + Sync + 'static {
    /// 解析器的返回值
    type Output;

    /// 使用已解析的参数调用解析器
    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_resolver {
    ($($ty:ident),*) => {
        impl<F, R, $($ty,)*> Resolver<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            $($ty: Abstraction,)*
        {
            type Output = R;

            #[allow(non_snake_case)]
            fn invoke(&self, args: ($($ty,)*)) -> R {
                let ($($ty,)*) = args;
                (self)($($ty),*)
            }
        }
    };
}

impl_resolver!();
impl_resolver!(A1);
impl_resolver!(A1, A2);
impl_resolver!(A1, A2, A3);
impl_resolver!(A1, A2, A3, A4);
impl_resolver!(A1, A2, A3, A4, A5);
impl_resolver!(A1, A2, A3, A4, A5, A6);
impl_resolver!(A1, A2, A3, A4, A5, A6, A7);
impl_resolver!(A1, A2, A3, A4, A5, A6, A7, A8);

/// 解析器声明提供的一个抽象
#[derive(Debug, Clone, Copy)]
pub struct Provision {
    /// 抽象标识
    pub key: AbstractionKey,
    /// 该抽象的 `Option<T>` 槽位类型
    pub slot_type: TypeId,
    /// 该抽象的槽位写入目标
    pub slot: SlotTarget,
}

impl Provision {
    /// 为抽象 `T` 创建提供声明
    pub fn of<T: Abstraction>() -> Self {
        Self {
            key: AbstractionKey::of::<T>(),
            slot_type: SlotTarget::slot_type::<T>(),
            slot: SlotTarget::of::<T>(),
        }
    }
}

/// 解析器返回值 trait
///
/// 描述返回值满足哪些抽象，以及如何拆分为各个抽象的实例。
/// `instances` 的顺序与 `provisions` 一一对应。
pub trait Produces: Sized + Send + Sync + 'static {
    /// 声明提供的抽象
    fn provisions() -> Vec<Provision>;

    /// 拆分为各个抽象的实例
    fn into_instances(self) -> Vec<Instance>;
}

impl<T: Abstraction> Produces for T {
    fn provisions() -> Vec<Provision> {
        vec![Provision::of::<T>()]
    }

    fn into_instances(self) -> Vec<Instance> {
        vec![Arc::new(self)]
    }
}

/// 同时满足多个抽象的返回值
///
/// 包装一个 2 到 4 元素的元组，每个元素注册为一个独立的绑定：
///
/// ```ignore
/// container.singleton(|| {
///     let service = Arc::new(MySqlService::new());
///     Many((service.clone() as Arc<dyn Reader>, service as Arc<dyn Writer>))
/// })?;
/// ```
#[derive(Debug)]
pub struct Many<T>(pub T);

macro_rules! impl_many {
    ($($ty:ident),*) => {
        impl<$($ty: Abstraction,)*> Produces for Many<($($ty,)*)> {
            fn provisions() -> Vec<Provision> {
                vec![$(Provision::of::<$ty>()),*]
            }

            #[allow(non_snake_case)]
            fn into_instances(self) -> Vec<Instance> {
                let Many(($($ty,)*)) = self;
                vec![$(Arc::new($ty) as Instance),*]
            }
        }
    };
}

impl_many!(A1, A2);
impl_many!(A1, A2, A3);
impl_many!(A1, A2, A3, A4);
