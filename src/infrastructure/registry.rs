//! Windows 注册表存储实现
//!
//! - 系统级: HKEY_LOCAL_MACHINE\SYSTEM\CurrentControlSet\Control\Session Manager\Environment
//! - 用户级: HKEY_CURRENT_USER\Environment

use crate::domain::error::{DomainError, Result};
use crate::domain::models::Scope;
use crate::domain::repositories::EnvStorage;
use tracing::{debug, warn};
use winreg::enums::*;
use winreg::{RegKey, RegValue};

const SYSTEM_ENV_KEY: &str = r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment";
const USER_ENV_KEY: &str = "Environment";

/// 注册表环境变量存储
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryStorage;

impl RegistryStorage {
    pub fn new() -> Self {
        Self
    }

    fn root_and_path(scope: Scope) -> (RegKey, &'static str) {
        match scope {
            Scope::System => (RegKey::predef(HKEY_LOCAL_MACHINE), SYSTEM_ENV_KEY),
            Scope::User => (RegKey::predef(HKEY_CURRENT_USER), USER_ENV_KEY),
        }
    }

    fn open(scope: Scope, flags: u32) -> std::io::Result<RegKey> {
        let (root, path) = Self::root_and_path(scope);
        root.open_subkey_with_flags(path, flags)
    }

    fn open_for_write(scope: Scope) -> Result<RegKey> {
        Self::open(scope, KEY_READ | KEY_WRITE).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => DomainError::PermissionDenied(format!(
                "写入 {} 注册表需要管理员权限: {}",
                scope, e
            )),
            _ => DomainError::Storage(format!("无法打开 {} 注册表: {}", scope, e)),
        })
    }

    /// 包含 `%VAR%` 引用的值以 REG_EXPAND_SZ 写入
    fn to_reg_value(value: &str) -> RegValue {
        let vtype = if value.contains('%') {
            REG_EXPAND_SZ
        } else {
            REG_SZ
        };
        let bytes = value
            .encode_utf16()
            .chain(std::iter::once(0))
            .flat_map(u16::to_le_bytes)
            .collect();
        RegValue { bytes, vtype }
    }
}

impl EnvStorage for RegistryStorage {
    fn read(&self, scope: Scope) -> Result<Vec<(String, String)>> {
        let key = match Self::open(scope, KEY_READ) {
            Ok(key) => key,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DomainError::Storage(format!(
                    "无法读取 {} 注册表: {}",
                    scope, e
                )));
            }
        };

        let mut vars = Vec::new();
        for entry in key.enum_values() {
            let (name, value) =
                entry.map_err(|e| DomainError::Storage(format!("枚举注册表值失败: {}", e)))?;
            match value.vtype {
                REG_SZ | REG_EXPAND_SZ | REG_MULTI_SZ => {
                    let text: String = winreg::types::FromRegValue::from_reg_value(&value)
                        .map_err(|e| {
                            DomainError::Storage(format!("无法解析注册表值 {}: {}", name, e))
                        })?;
                    vars.push((name, text));
                }
                ref other => warn!(%scope, name = %name, vtype = ?other, "跳过非字符串注册表值"),
            }
        }

        debug!(%scope, count = vars.len(), "读取注册表");
        Ok(vars)
    }

    fn write(&mut self, scope: Scope, name: &str, value: &str) -> Result<()> {
        let key = Self::open_for_write(scope)?;
        key.set_raw_value(name, &Self::to_reg_value(value))
            .map_err(|e| DomainError::Storage(format!("写入注册表值 {} 失败: {}", name, e)))?;
        debug!(%scope, name, "写入注册表");
        Ok(())
    }

    fn remove(&mut self, scope: Scope, name: &str) -> Result<()> {
        let key = Self::open_for_write(scope)?;
        match key.delete_value(name) {
            Ok(()) => {
                debug!(%scope, name, "删除注册表值");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Storage(format!(
                "删除注册表值 {} 失败: {}",
                name, e
            ))),
        }
    }

    fn is_writable(&self, scope: Scope) -> bool {
        Self::open(scope, KEY_WRITE).is_ok()
    }

    fn location(&self, scope: Scope) -> String {
        match scope {
            Scope::System => format!(r"HKEY_LOCAL_MACHINE\{}", SYSTEM_ENV_KEY),
            Scope::User => format!(r"HKEY_CURRENT_USER\{}", USER_ENV_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_sz_for_references() {
        assert_eq!(RegistryStorage::to_reg_value("%USERPROFILE%\\bin").vtype, REG_EXPAND_SZ);
        assert_eq!(RegistryStorage::to_reg_value("C:\\bin").vtype, REG_SZ);
    }

    #[test]
    fn test_value_is_nul_terminated_utf16() {
        let value = RegistryStorage::to_reg_value("ab");
        assert_eq!(value.bytes, vec![b'a', 0, b'b', 0, 0, 0]);
    }

    #[test]
    fn test_user_environment_readable() {
        let storage = RegistryStorage::new();
        assert!(storage.read(Scope::User).is_ok());
        assert!(storage.location(Scope::User).starts_with("HKEY_CURRENT_USER"));
    }
}
