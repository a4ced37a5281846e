//! 内存存储实现，用于测试与嵌入场景

use crate::domain::error::{DomainError, Result};
use crate::domain::models::Scope;
use crate::domain::repositories::EnvStorage;
use std::collections::{BTreeMap, HashSet};

/// 内存环境变量存储
///
/// 记录写入与删除次数，便于断言保存过程实际触达了多少条目。
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    system: BTreeMap<String, String>,
    user: BTreeMap<String, String>,
    read_only: HashSet<Scope>,
    writes: usize,
    removals: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置变量
    #[must_use]
    pub fn with_var(mut self, scope: Scope, name: &str, value: &str) -> Self {
        self.map_mut(scope).insert(name.to_string(), value.to_string());
        self
    }

    /// 将作用域设为只读
    #[must_use]
    pub fn read_only(mut self, scope: Scope) -> Self {
        self.read_only.insert(scope);
        self
    }

    /// 读取存储中的原始值
    pub fn value(&self, scope: Scope, name: &str) -> Option<&str> {
        self.map(scope).get(name).map(String::as_str)
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn removals(&self) -> usize {
        self.removals
    }

    /// 写入与删除的总次数
    pub fn operations(&self) -> usize {
        self.writes + self.removals
    }

    fn map(&self, scope: Scope) -> &BTreeMap<String, String> {
        match scope {
            Scope::System => &self.system,
            Scope::User => &self.user,
        }
    }

    fn map_mut(&mut self, scope: Scope) -> &mut BTreeMap<String, String> {
        match scope {
            Scope::System => &mut self.system,
            Scope::User => &mut self.user,
        }
    }

    fn ensure_writable(&self, scope: Scope) -> Result<()> {
        if self.read_only.contains(&scope) {
            return Err(DomainError::PermissionDenied(format!("{} 作用域只读", scope)));
        }
        Ok(())
    }
}

impl EnvStorage for MemoryStorage {
    fn read(&self, scope: Scope) -> Result<Vec<(String, String)>> {
        Ok(self
            .map(scope)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn write(&mut self, scope: Scope, name: &str, value: &str) -> Result<()> {
        self.ensure_writable(scope)?;
        self.map_mut(scope).insert(name.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, scope: Scope, name: &str) -> Result<()> {
        self.ensure_writable(scope)?;
        self.map_mut(scope).remove(name);
        self.removals += 1;
        Ok(())
    }

    fn is_writable(&self, scope: Scope) -> bool {
        !self.read_only.contains(&scope)
    }

    fn location(&self, scope: Scope) -> String {
        format!("memory:{}", scope)
    }
}
