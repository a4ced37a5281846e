//! Application Layer - 应用服务
//!
//! 包含：
//! - services: 变量存储与导出

pub mod services;

pub use services::{Exporter, VariableStore};
