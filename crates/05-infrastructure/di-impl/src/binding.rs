//! 绑定记录

use di_abstractions::{DependencyResolver, Instance, Provision, ResolveContext};
use infrastructure_common::{AbstractionKey, DependencyResult, Lifetime};
use std::fmt;
use std::sync::Arc;

/// 类型擦除后的单抽象解析函数
pub(crate) type ErasedResolver = Arc<
    dyn Fn(&dyn DependencyResolver, &mut ResolveContext) -> DependencyResult<Instance>
        + Send
        + Sync,
>;

/// 抽象与解析器之间的绑定
///
/// 单例绑定在注册时即持有实例，瞬时绑定的 `instance` 始终为空
pub(crate) struct Binding {
    pub(crate) provision: Provision,
    pub(crate) lifetime: Lifetime,
    resolver: ErasedResolver,
    instance: Option<Instance>,
}

impl Binding {
    pub(crate) fn new(
        provision: Provision,
        lifetime: Lifetime,
        resolver: ErasedResolver,
        instance: Option<Instance>,
    ) -> Self {
        Self {
            provision,
            lifetime,
            resolver,
            instance,
        }
    }

    pub(crate) fn key(&self) -> AbstractionKey {
        self.provision.key
    }

    /// 单例缓存的实例
    pub(crate) fn cached(&self) -> Option<Instance> {
        self.instance.as_ref().map(Arc::clone)
    }

    pub(crate) fn is_singleton(&self) -> bool {
        self.instance.is_some()
    }

    /// 调用解析器创建新实例
    pub(crate) fn invoke(
        &self,
        resolver: &dyn DependencyResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        (self.resolver)(resolver, context)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("abstraction", &self.provision.key)
            .field("lifetime", &self.lifetime)
            .field("instance", &self.instance.as_ref().map(|_| "<instance>"))
            .field("resolver", &"<function>")
            .finish()
    }
}
