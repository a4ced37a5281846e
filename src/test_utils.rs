//! 测试工具模块
//!
//! 提供预置数据的内存存储，避免测试触碰真实的系统环境变量

use crate::application::services::VariableStore;
use crate::domain::models::{Scope, VariableValue};
use crate::infrastructure::memory::MemoryStorage;

/// 以 `;` 为分隔符、预置两个作用域并完成加载的存储
pub fn store_with(
    system: &[(&str, &str)],
    user: &[(&str, &str)],
) -> VariableStore<MemoryStorage> {
    let mut storage = MemoryStorage::new();
    for (name, value) in system {
        storage = storage.with_var(Scope::System, name, value);
    }
    for (name, value) in user {
        storage = storage.with_var(Scope::User, name, value);
    }

    let mut store = VariableStore::new(storage, ';');
    store.load().unwrap();
    store
}

pub fn single(value: &str) -> VariableValue {
    VariableValue::Single(value.to_string())
}

pub fn multi(items: &[&str]) -> VariableValue {
    VariableValue::Multi(items.iter().map(|s| s.to_string()).collect())
}
