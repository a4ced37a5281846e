//! 应用程序容器
//!
//! 负责配置加载、存储后端选择与生命周期管理

use crate::application::services::{BoxedStore, VariableStore};
use crate::domain::error::DomainError;
use crate::domain::repositories::{
    BackendKind, EnvStorage, FileLocations, StorageConfig, default_separator,
};
use crate::domain::validation::{DEFAULT_NAME_PATTERN, NameValidator};
use crate::infrastructure::{FileStorage, paths};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// 配置文件内容
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    backend: BackendKind,
    separator: char,
    name_pattern: String,
    files: FileLocations,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            separator: default_separator(),
            name_pattern: DEFAULT_NAME_PATTERN.to_string(),
            files: FileLocations::default(),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub verbose: bool,
    pub dry_run: bool,
    pub storage: StorageConfig,
    pub name_pattern: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_file(ConfigFile::default())
    }
}

impl AppConfig {
    fn from_file(file: ConfigFile) -> Self {
        Self {
            verbose: false,
            dry_run: false,
            storage: StorageConfig {
                backend: file.backend,
                separator: file.separator,
                files: file.files,
            },
            name_pattern: file.name_pattern,
        }
    }

    /// 解析 TOML 配置
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("配置文件格式错误")?;
        if file.separator.is_whitespace() || file.separator == '=' {
            anyhow::bail!("无效的列表分隔符: {:?}", file.separator);
        }
        Ok(Self::from_file(file))
    }

    /// 加载配置
    ///
    /// 显式指定的路径必须存在；未指定时读取默认位置，不存在则使用默认配置。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(DomainError::FileNotFound(path.to_path_buf()).into());
                }
                path.to_path_buf()
            }
            None => {
                let default = paths::default_config_file()?;
                if !default.exists() {
                    debug!("未找到配置文件，使用默认配置");
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("无法读取配置文件 {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("加载配置文件 {} 失败", path.display()))?;
        debug!(path = %path.display(), backend = ?config.storage.backend, "已加载配置");
        Ok(config)
    }
}

/// 按配置创建存储后端
pub fn build_storage(config: &StorageConfig) -> std::result::Result<Box<dyn EnvStorage>, DomainError> {
    match config.backend {
        BackendKind::File => {
            let system = config
                .files
                .system
                .as_deref()
                .ok_or_else(|| DomainError::Config("未配置系统级变量文件 files.system".to_string()))?;
            let user = config
                .files
                .user
                .as_deref()
                .ok_or_else(|| DomainError::Config("未配置用户级变量文件 files.user".to_string()))?;
            Ok(Box::new(FileStorage::new(
                paths::expand_home(system)?,
                paths::expand_home(user)?,
            )))
        }
        #[cfg(windows)]
        BackendKind::Registry => Ok(Box::new(crate::infrastructure::RegistryStorage::new())),
        #[cfg(not(windows))]
        BackendKind::Registry => Err(DomainError::Config(
            "注册表后端仅在 Windows 上可用".to_string(),
        )),
    }
}

/// 应用程序容器
pub struct Application {
    pub config: AppConfig,
    pub store: BoxedStore,
    pub validator: NameValidator,
}

impl Application {
    /// 创建应用程序实例并加载环境变量
    pub fn new(config: AppConfig) -> Result<Self> {
        let storage = build_storage(&config.storage)?;
        let validator = NameValidator::new(&config.name_pattern)?;

        let mut store = VariableStore::new(storage, config.storage.separator);
        store.load().context("加载环境变量失败")?;

        Ok(Self {
            config,
            store,
            validator,
        })
    }
}
