//! 存储接口定义（输出端口）

use crate::domain::error::Result;
use crate::domain::models::Scope;
use serde::Deserialize;
use std::path::PathBuf;

/// 操作系统环境变量存储接口
///
/// 每个作用域是一组扁平的 `name=value` 字符串，列表值已按分隔符连接。
pub trait EnvStorage {
    /// 读取作用域内的全部变量
    fn read(&self, scope: Scope) -> Result<Vec<(String, String)>>;

    /// 写入（新增或覆盖）变量
    fn write(&mut self, scope: Scope, name: &str, value: &str) -> Result<()>;

    /// 删除变量，不存在时视为成功
    fn remove(&mut self, scope: Scope, name: &str) -> Result<()>;

    /// 当前进程是否有权限写入该作用域
    fn is_writable(&self, scope: Scope) -> bool;

    /// 作用域的存储位置描述
    fn location(&self, scope: Scope) -> String;
}

impl<S: EnvStorage + ?Sized> EnvStorage for Box<S> {
    fn read(&self, scope: Scope) -> Result<Vec<(String, String)>> {
        (**self).read(scope)
    }

    fn write(&mut self, scope: Scope, name: &str, value: &str) -> Result<()> {
        (**self).write(scope, name, value)
    }

    fn remove(&mut self, scope: Scope, name: &str) -> Result<()> {
        (**self).remove(scope, name)
    }

    fn is_writable(&self, scope: Scope) -> bool {
        (**self).is_writable(scope)
    }

    fn location(&self, scope: Scope) -> String {
        (**self).location(scope)
    }
}

/// 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Windows 注册表
    Registry,
    /// `KEY=VALUE` 文本文件
    File,
}

impl Default for BackendKind {
    fn default() -> Self {
        if cfg!(windows) {
            BackendKind::Registry
        } else {
            BackendKind::File
        }
    }
}

/// 文件后端的文件位置
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileLocations {
    pub system: Option<PathBuf>,
    pub user: Option<PathBuf>,
}

impl Default for FileLocations {
    fn default() -> Self {
        Self {
            system: Some(PathBuf::from("/etc/environment")),
            user: dirs::config_dir().map(|d| d.join("environment.d").join("envexplorer.conf")),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub backend: BackendKind,
    pub separator: char,
    pub files: FileLocations,
}

/// 平台默认的列表分隔符
#[must_use]
pub fn default_separator() -> char {
    if cfg!(windows) { ';' } else { ':' }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            separator: default_separator(),
            files: FileLocations::default(),
        }
    }
}
