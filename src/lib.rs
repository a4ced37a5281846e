//! envexplorer - 系统级与用户级环境变量查看与编辑
//!
//! 代码结构遵循 Clean Architecture 原则：
//! 领域层定义变量模型与存储端口，应用层维护带默认值的变量存储，
//! 基础设施层提供注册表、文件与内存三种存储后端。

// 领域层
pub mod domain;

// 应用层
pub mod application;

// 基础设施层
pub mod infrastructure;

// 命令层
pub mod commands;

// CLI 定义
pub mod cli;

// 应用程序容器
pub mod app;

// 日志
pub mod logging;

#[cfg(test)]
mod test_utils;

// 重新导出常用类型
pub use application::VariableStore;
pub use domain::{DomainError, EnvStorage, Result, Scope, Variable, VariableValue};
