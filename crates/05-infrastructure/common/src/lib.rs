//! # DI Common
//!
//! 这个 crate 提供了 Lorn IoC 注册表各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`AbstractionKey`] - 抽象（类型契约）的唯一标识
//! - [`Lifetime`] - 绑定的生命周期
//! - [`DependencyError`] - 注册与解析过程中的错误
//!
//! ## 设计原则
//!
//! - 基于 [`std::any::TypeId`] 的运行时类型标识
//! - 错误总是返回给调用方，从不在内部吞掉或记录

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
