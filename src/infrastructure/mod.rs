//! Infrastructure Layer - 技术实现
//!
//! 包含：
//! - file_storage: `KEY=VALUE` 文件存储
//! - registry: Windows 注册表存储
//! - memory: 内存存储
//! - paths: 路径工具

pub mod file_storage;
pub mod memory;
pub mod paths;
#[cfg(windows)]
pub mod registry;

pub use file_storage::FileStorage;
pub use memory::MemoryStorage;
#[cfg(windows)]
pub use registry::RegistryStorage;
