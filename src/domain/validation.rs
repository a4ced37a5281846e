//! 新增变量的名称与值校验

use crate::domain::error::{DomainError, Result};
use regex::Regex;

/// 默认的变量名规则
pub const DEFAULT_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// 变量名校验器
#[derive(Debug, Clone)]
pub struct NameValidator {
    pattern: Regex,
}

impl NameValidator {
    /// 从正则表达式创建
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| DomainError::Config(format!("无效的变量名规则 '{}': {}", pattern, e)))?;
        Ok(Self { pattern })
    }

    /// 校验变量名
    pub fn validate_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation("变量名不能为空".to_string()));
        }
        if !self.pattern.is_match(name) {
            return Err(DomainError::Validation(format!(
                "变量名 '{}' 不符合规则 {}",
                name,
                self.pattern.as_str()
            )));
        }
        Ok(())
    }

    /// 校验变量值
    pub fn validate_value(&self, name: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(DomainError::Validation(format!("变量 {} 的值不能为空", name)));
        }
        Ok(())
    }

    /// 校验新增变量的名称与值
    pub fn validate_new_variable(&self, name: &str, value: &str) -> Result<()> {
        self.validate_name(name)?;
        self.validate_value(name, value)
    }
}
