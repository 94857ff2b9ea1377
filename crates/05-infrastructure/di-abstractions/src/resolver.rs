//! 依赖解析器抽象接口
//!
//! 提供按抽象标识解析实例的能力，以及解析过程中使用的上下文

use crate::abstraction::Instance;
use crate::container::ContainerConfig;
use infrastructure_common::{AbstractionKey, DependencyError, DependencyResult};
use std::any::{Any, TypeId};

/// 依赖解析器 trait
///
/// 由容器实现，供参数解析、槽位写入和函数注入使用
pub trait DependencyResolver {
    /// 解析指定抽象的实例
    fn resolve_instance(
        &self,
        key: &AbstractionKey,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance>;

    /// 检查是否可以解析指定抽象
    fn can_resolve(&self, key: &AbstractionKey) -> bool;

    /// 按槽位类型（`Option<T>` 的 `TypeId`）查找对应的已注册抽象
    fn slot_target(&self, slot_type: TypeId) -> Option<SlotTarget>;
}

/// 槽位写入函数
pub type SlotWriter = fn(&mut dyn Any, Instance) -> DependencyResult<()>;

/// 类型擦除槽位的写入目标
#[derive(Clone, Copy)]
pub struct SlotTarget {
    /// 槽位对应的抽象
    pub abstraction: AbstractionKey,
    /// 将实例写入槽位
    pub write: SlotWriter,
}

impl SlotTarget {
    /// 为抽象 `T` 创建写入 `Option<T>` 槽位的目标
    pub fn of<T: crate::Abstraction>() -> Self {
        Self {
            abstraction: AbstractionKey::of::<T>(),
            write: write_slot::<T>,
        }
    }

    /// 槽位类型
    pub fn slot_type<T: crate::Abstraction>() -> TypeId {
        TypeId::of::<Option<T>>()
    }
}

impl std::fmt::Debug for SlotTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotTarget")
            .field("abstraction", &self.abstraction)
            .field("write", &"<function>")
            .finish()
    }
}

fn write_slot<T: crate::Abstraction>(slot: &mut dyn Any, instance: Instance) -> DependencyResult<()> {
    let slot = slot.downcast_mut::<Option<T>>().ok_or_else(|| {
        DependencyError::invalid_receiver(format!(
            "槽位类型不是 Option<{}>",
            std::any::type_name::<T>()
        ))
    })?;
    *slot = Some(crate::downcast_instance::<T>(&instance)?);
    Ok(())
}

/// 解析上下文
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<AbstractionKey>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::with_options(ResolveOptions::default())
    }

    /// 使用指定选项创建解析上下文
    pub fn with_options(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加抽象到解析链
    pub fn push(&mut self, key: AbstractionKey) -> DependencyResult<()> {
        if self.options.detect_cycles && self.resolution_chain.contains(&key) {
            return Err(DependencyError::CyclicDependency {
                abstraction: key,
                chain: self.describe_chain(&key),
            });
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                abstraction: key,
                max_depth: self.options.max_depth,
            });
        }
        self.resolution_chain.push(key);
        Ok(())
    }

    /// 从解析链中移除最后一个抽象
    pub fn pop(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    fn describe_chain(&self, next: &AbstractionKey) -> String {
        self.resolution_chain
            .iter()
            .chain(std::iter::once(next))
            .map(AbstractionKey::short_name)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析选项
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// 是否检测循环依赖
    pub detect_cycles: bool,
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::from(&ContainerConfig::default())
    }
}

impl From<&ContainerConfig> for ResolveOptions {
    fn from(config: &ContainerConfig) -> Self {
        Self {
            detect_cycles: config.enable_circular_dependency_detection,
            max_depth: config.max_resolution_depth,
        }
    }
}
