//! # 依赖注入具体实现
//!
//! 提供具体的依赖注入容器，以及进程级的默认容器（[`global`]）。
//!
//! ```
//! use di_abstractions::DiContainer;
//! use di_impl::Container;
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.singleton(|| Arc::new(English) as Arc<dyn Greeter>)?;
//!
//! let mut greeting = None;
//! container.make(|greeter: Arc<dyn Greeter>| greeting = Some(greeter.greet()))?;
//! assert_eq!(greeting.as_deref(), Some("hello"));
//! # Ok::<(), infrastructure_common::DependencyError>(())
//! ```

mod binding;
pub mod global;

use binding::{Binding, ErasedResolver};
use di_abstractions::{
    resolve_dependency, Abstraction, BindingDescriptor, ContainerConfig, ContainerStats, Dependencies,
    DependencyResolver, DiContainer, Instance, Produces, Provision, Receiver, ResolveContext,
    ResolveOptions, Resolver, SlotTarget,
};
use infrastructure_common::{AbstractionKey, DependencyError, DependencyResult, Lifetime};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 以解析器参数调用解析器并产生返回值的函数
type Produce<O> =
    Arc<dyn Fn(&dyn DependencyResolver, &mut ResolveContext) -> DependencyResult<O> + Send + Sync>;

/// 具体的依赖注入容器实现
///
/// 注册需要 `&mut self`，解析只需要 `&self`；容器内部不做任何同步。
pub struct Container {
    /// 抽象到绑定的映射
    bindings: HashMap<AbstractionKey, Binding>,
    /// `Option<T>` 槽位类型到抽象的索引，供类型擦除的接收者使用
    slots: HashMap<TypeId, AbstractionKey>,
    config: ContainerConfig,
}

impl Container {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            bindings: HashMap::new(),
            slots: HashMap::new(),
            config,
        }
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    fn context(&self) -> ResolveContext {
        ResolveContext::with_options(ResolveOptions::from(&self.config))
    }

    /// 为解析器的每个返回位置创建绑定
    ///
    /// 单例在这里调用一次解析器；调用失败时不会安装任何绑定。
    fn bind<O: Produces>(
        &mut self,
        lifetime: Lifetime,
        resolver_name: &'static str,
        produce: Produce<O>,
    ) -> DependencyResult<()> {
        let provisions = O::provisions();
        validate_provisions(resolver_name, &provisions)?;

        let instances: Vec<Option<Instance>> = match lifetime {
            Lifetime::Singleton => {
                let deps: &dyn DependencyResolver = &*self;
                let mut context = self.context();
                let produced = produce(deps, &mut context)?;
                produced.into_instances().into_iter().map(Some).collect()
            }
            Lifetime::Transient => vec![None; provisions.len()],
        };

        for (position, (provision, instance)) in provisions.into_iter().zip(instances).enumerate()
        {
            let key = provision.key;
            let produce = Arc::clone(&produce);
            let resolver: ErasedResolver = Arc::new(
                move |deps: &dyn DependencyResolver, context: &mut ResolveContext| {
                    produce(deps, context)?
                        .into_instances()
                        .into_iter()
                        .nth(position)
                        .ok_or(DependencyError::InstanceTypeMismatch { abstraction: key })
                },
            );

            info!("注册{}绑定: {} ({})", lifetime, key, resolver_name);
            self.slots.insert(provision.slot_type, key);
            self.bindings
                .insert(key, Binding::new(provision, lifetime, resolver, instance));
        }

        Ok(())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.bindings.values().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

impl DependencyResolver for Container {
    fn resolve_instance(
        &self,
        key: &AbstractionKey,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        let binding = self
            .bindings
            .get(key)
            .ok_or_else(|| DependencyError::unresolved(*key))?;

        if let Some(instance) = binding.cached() {
            return Ok(instance);
        }

        context.push(*key)?;
        debug!("调用瞬时解析器: {} (深度 {})", key, context.depth());
        let result = binding.invoke(self, context);
        context.pop();
        result
    }

    fn can_resolve(&self, key: &AbstractionKey) -> bool {
        self.bindings.contains_key(key)
    }

    fn slot_target(&self, slot_type: TypeId) -> Option<SlotTarget> {
        self.slots
            .get(&slot_type)
            .and_then(|key| self.bindings.get(key))
            .map(|binding| binding.provision.slot)
    }
}

impl DiContainer for Container {
    fn singleton<R, Args>(&mut self, resolver: R) -> DependencyResult<()>
    where
        R: Resolver<Args>,
        R::Output: Produces,
        Args: Dependencies,
    {
        self.bind(
            Lifetime::Singleton,
            std::any::type_name::<R>(),
            produce_with::<R, Args>(resolver),
        )
    }

    fn try_singleton<R, Args, O, E>(&mut self, resolver: R) -> DependencyResult<()>
    where
        R: Resolver<Args, Output = Result<O, E>>,
        O: Produces,
        E: Into<anyhow::Error> + 'static,
        Args: Dependencies,
    {
        self.bind(
            Lifetime::Singleton,
            std::any::type_name::<R>(),
            try_produce_with::<R, Args, O, E>(resolver),
        )
    }

    fn transient<R, Args>(&mut self, resolver: R) -> DependencyResult<()>
    where
        R: Resolver<Args>,
        R::Output: Produces,
        Args: Dependencies,
    {
        self.bind(
            Lifetime::Transient,
            std::any::type_name::<R>(),
            produce_with::<R, Args>(resolver),
        )
    }

    fn try_transient<R, Args, O, E>(&mut self, resolver: R) -> DependencyResult<()>
    where
        R: Resolver<Args, Output = Result<O, E>>,
        O: Produces,
        E: Into<anyhow::Error> + 'static,
        Args: Dependencies,
    {
        self.bind(
            Lifetime::Transient,
            std::any::type_name::<R>(),
            try_produce_with::<R, Args, O, E>(resolver),
        )
    }

    fn resolve<T: Abstraction>(&self) -> DependencyResult<T> {
        resolve_dependency::<T>(self, &mut self.context())
    }

    fn make<M, R>(&self, receiver: R) -> DependencyResult<()>
    where
        R: Receiver<M>,
    {
        debug!("注入依赖: {}", std::any::type_name::<R>());
        receiver.receive(self, &mut self.context())
    }

    fn reset(&mut self) {
        info!("重置容器，移除 {} 个绑定", self.bindings.len());
        self.bindings.clear();
        self.slots.clear();
    }

    fn registered_abstractions(&self) -> Vec<BindingDescriptor> {
        let mut descriptors: Vec<_> = self
            .bindings
            .values()
            .map(|binding| BindingDescriptor {
                abstraction: binding.key(),
                lifetime: binding.lifetime,
            })
            .collect();
        descriptors.sort_by_key(|descriptor| descriptor.abstraction.name());
        descriptors
    }

    fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_bindings: self.bindings.len(),
            active_singletons: self
                .bindings
                .values()
                .filter(|binding| binding.is_singleton())
                .count(),
        }
    }
}

fn produce_with<R, Args>(resolver: R) -> Produce<R::Output>
where
    R: Resolver<Args>,
    R::Output: Produces,
    Args: Dependencies,
{
    Arc::new(
        move |deps: &dyn DependencyResolver, context: &mut ResolveContext| {
            let args = Args::resolve(deps, context)?;
            Ok(resolver.invoke(args))
        },
    )
}

fn try_produce_with<R, Args, O, E>(resolver: R) -> Produce<O>
where
    R: Resolver<Args, Output = Result<O, E>>,
    O: Produces,
    E: Into<anyhow::Error> + 'static,
    Args: Dependencies,
{
    Arc::new(
        move |deps: &dyn DependencyResolver, context: &mut ResolveContext| {
            let args = Args::resolve(deps, context)?;
            resolver.invoke(args).map_err(DependencyError::failed)
        },
    )
}

/// 解析器必须声明至少一个抽象，且同一抽象只能声明一次
fn validate_provisions(resolver: &'static str, provisions: &[Provision]) -> DependencyResult<()> {
    if provisions.iter().any(|provision| provision.key.is_unit()) {
        return Err(DependencyError::invalid_resolver(
            resolver,
            "解析器没有声明任何抽象",
        ));
    }

    let mut seen = HashSet::new();
    for provision in provisions {
        if !seen.insert(provision.key) {
            return Err(DependencyError::invalid_resolver(
                resolver,
                format!("重复声明抽象 {}", provision.key),
            ));
        }
    }
    Ok(())
}
