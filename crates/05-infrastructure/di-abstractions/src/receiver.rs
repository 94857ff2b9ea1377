//! 接收者抽象接口
//!
//! `make` 操作的接收者有三种形态：
//!
//! - 槽位：`&mut Option<T>`，解析 `T` 后写入槽位
//! - 注入函数：参数均为抽象的 `FnOnce`，解析参数后调用
//! - 类型擦除：`&mut dyn Any`，在运行时识别 [`Injection`] 或已注册抽象的槽位

use crate::abstraction::{resolve_dependency, Abstraction, Dependencies};
use crate::resolver::{DependencyResolver, ResolveContext};
use infrastructure_common::{DependencyError, DependencyResult};
use std::any::Any;
use std::fmt;

/// 可注入函数 trait
///
/// 为所有 `FnOnce(A1, .., An) -> R`（n 不超过 8）实现，`Ai` 均为抽象
pub trait Injectable<Args> {
    /// 注入函数的返回值
    type Output: InjectionOutcome;

    /// 使用已解析的参数调用注入函数
    fn inject(self, args: Args) -> Self::Output;
}

macro_rules! impl_injectable {
    ($($ty:ident),*) => {
        impl<F, R, $($ty,)*> Injectable<($($ty,)*)> for F
        where
            F: FnOnce($($ty),*) -> R,
            R: InjectionOutcome,
            $($ty: Abstraction,)*
        {
            type Output = R;

            #[allow(non_snake_case)]
            fn inject(self, args: ($($ty,)*)) -> R {
                let ($($ty,)*) = args;
                (self)($($ty),*)
            }
        }
    };
}

impl_injectable!();
impl_injectable!(A1);
impl_injectable!(A1, A2);
impl_injectable!(A1, A2, A3);
impl_injectable!(A1, A2, A3, A4);
impl_injectable!(A1, A2, A3, A4, A5);
impl_injectable!(A1, A2, A3, A4, A5, A6);
impl_injectable!(A1, A2, A3, A4, A5, A6, A7);
impl_injectable!(A1, A2, A3, A4, A5, A6, A7, A8);

/// 注入函数的结果
///
/// 返回 `()` 表示成功；返回 `Result` 时，`Err` 作为 `make` 的结果原样透传
pub trait InjectionOutcome {
    /// 转换为 `make` 的结果
    fn into_outcome(self) -> DependencyResult<()>;
}

impl InjectionOutcome for () {
    fn into_outcome(self) -> DependencyResult<()> {
        Ok(())
    }
}

impl<T, E> InjectionOutcome for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn into_outcome(self) -> DependencyResult<()> {
        self.map(|_| ()).map_err(DependencyError::failed)
    }
}

/// 接收者形态标记
pub mod marker {
    use std::marker::PhantomData;

    /// `&mut Option<T>` 槽位
    #[derive(Debug)]
    pub enum Slot {}

    /// 注入函数
    #[derive(Debug)]
    pub struct Inject<Args>(PhantomData<Args>);

    /// 类型擦除的接收者
    #[derive(Debug)]
    pub enum Erased {}

    /// 预先打包的 [`Injection`](super::Injection)
    #[derive(Debug)]
    pub enum Packaged {}
}

/// 接收者 trait
///
/// `M` 仅用于区分接收者形态，调用方无需指定
pub trait Receiver<M> {
    /// 解析依赖并交付给接收者
    fn receive(
        self,
        resolver: &dyn DependencyResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<()>;
}

impl<T: Abstraction> Receiver<marker::Slot> for &mut Option<T> {
    fn receive(
        self,
        resolver: &dyn DependencyResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<()> {
        *self = Some(resolve_dependency::<T>(resolver, context)?);
        Ok(())
    }
}

impl<F, Args> Receiver<marker::Inject<Args>> for F
where
    F: Injectable<Args>,
    Args: Dependencies,
{
    fn receive(
        self,
        resolver: &dyn DependencyResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<()> {
        let args = Args::resolve(resolver, context)?;
        self.inject(args).into_outcome()
    }
}

impl Receiver<marker::Packaged> for Injection {
    fn receive(
        mut self,
        resolver: &dyn DependencyResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<()> {
        self.run(resolver, context)
    }
}

impl Receiver<marker::Erased> for &mut dyn Any {
    fn receive(
        self,
        resolver: &dyn DependencyResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<()> {
        if let Some(injection) = self.downcast_mut::<Injection>() {
            return injection.run(resolver, context);
        }

        let slot_type = (*self).type_id();
        let Some(target) = resolver.slot_target(slot_type) else {
            return Err(DependencyError::invalid_receiver(
                "接收者既不是已注册抽象的槽位，也不是注入函数",
            ));
        };
        let instance = resolver.resolve_instance(&target.abstraction, context)?;
        (target.write)(self, instance)
    }
}

type InjectionFn =
    Box<dyn FnOnce(&dyn DependencyResolver, &mut ResolveContext) -> DependencyResult<()> + Send>;

/// 打包后的注入函数
///
/// 用于需要以 `&mut dyn Any` 传递注入函数的场景，只能被调用一次
pub struct Injection {
    call: Option<InjectionFn>,
}

impl Injection {
    /// 打包注入函数
    pub fn new<F, Args>(function: F) -> Self
    where
        F: Injectable<Args> + Send + 'static,
        Args: Dependencies,
    {
        Self {
            call: Some(Box::new(
                move |resolver: &dyn DependencyResolver, context: &mut ResolveContext| {
                    let args = Args::resolve(resolver, context)?;
                    function.inject(args).into_outcome()
                },
            )),
        }
    }

    /// 是否已被调用
    pub fn is_consumed(&self) -> bool {
        self.call.is_none()
    }

    fn run(
        &mut self,
        resolver: &dyn DependencyResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<()> {
        let call = self
            .call
            .take()
            .ok_or_else(|| DependencyError::invalid_receiver("注入函数已被调用"))?;
        call(resolver, context)
    }
}

impl fmt::Debug for Injection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injection")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}
