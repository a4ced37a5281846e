//! 路径管理工具

use crate::domain::error::{DomainError, Result};
use std::path::{Path, PathBuf};

/// 获取配置目录
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("envexplorer"))
        .ok_or_else(|| DomainError::Config("无法确定配置目录".to_string()))
}

/// 默认配置文件路径
pub fn default_config_file() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

/// 展开以 `~/` 开头的路径
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .ok_or_else(|| DomainError::Config("无法确定主目录".to_string())),
        Err(_) => Ok(path.to_path_buf()),
    }
}

/// 确保文件的父目录存在
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(DomainError::from)?;
    }
    Ok(())
}

/// 当前主机名
pub fn host_name() -> String {
    ["COMPUTERNAME", "HOSTNAME"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .chain(std::fs::read_to_string("/etc/hostname").ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
