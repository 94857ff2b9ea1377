//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义绑定注册、依赖解析与注入的核心接口。
//!
//! ## 核心接口
//!
//! - [`DiContainer`] - 依赖注入容器接口
//! - [`DependencyResolver`] - 依赖解析器接口
//! - [`Resolver`] - 解析器（工厂函数）接口
//! - [`Receiver`] - `make` 接收者接口

pub mod abstraction;
pub mod container;
pub mod factory;
pub mod receiver;
pub mod resolver;

pub use abstraction::*;
pub use container::*;
pub use factory::*;
pub use receiver::*;
pub use resolver::*;
