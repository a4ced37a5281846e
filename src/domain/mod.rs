//! Domain Layer - 核心业务逻辑
//!
//! 包含：
//! - models: 领域实体
//! - repositories: 存储接口（输出端口）
//! - validation: 新增变量校验
//! - error: 领域错误类型

pub mod error;
pub mod models;
pub mod repositories;
pub mod validation;

pub use error::{DomainError, Result};
pub use models::{ExportFormat, OutputFormat, Scope, Variable, VariableValue};
pub use repositories::{BackendKind, EnvStorage, StorageConfig};
pub use validation::NameValidator;
