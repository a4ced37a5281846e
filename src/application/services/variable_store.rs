//! 环境变量存储：系统级与用户级两个作用域的内存视图
//!
//! 加载时记录每个变量的默认值与来源作用域，保存时只把有变化的条目写回存储。

use crate::domain::error::{DomainError, Result};
use crate::domain::models::{Scope, Variable, VariableValue};
use crate::domain::repositories::EnvStorage;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// 保存时对存储执行的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeAction {
    /// 写入编码后的值
    Write(String),
    /// 删除键
    Remove,
}

/// 一条待执行的存储操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    pub scope: Scope,
    pub name: String,
    pub action: ChangeAction,
}

impl fmt::Display for PendingChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            ChangeAction::Write(value) => write!(f, "~ [{}] {}={}", self.scope, self.name, value),
            ChangeAction::Remove => write!(f, "- [{}] {}", self.scope, self.name),
        }
    }
}

/// 以动态后端构建的存储，后端在运行时按配置选择
pub type BoxedStore = VariableStore<Box<dyn EnvStorage>>;

/// 环境变量存储
pub struct VariableStore<S: EnvStorage> {
    storage: S,
    separator: char,
    system: BTreeMap<String, Variable>,
    user: BTreeMap<String, Variable>,
}

impl<S: EnvStorage> VariableStore<S> {
    /// 创建空存储，调用 [`load`](Self::load) 后才有内容
    pub fn new(storage: S, separator: char) -> Self {
        Self {
            storage,
            separator,
            system: BTreeMap::new(),
            user: BTreeMap::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    fn map(&self, scope: Scope) -> &BTreeMap<String, Variable> {
        match scope {
            Scope::System => &self.system,
            Scope::User => &self.user,
        }
    }

    fn map_mut(&mut self, scope: Scope) -> &mut BTreeMap<String, Variable> {
        match scope {
            Scope::System => &mut self.system,
            Scope::User => &mut self.user,
        }
    }

    /// 从存储重新读取两个作用域，丢弃内存中的修改
    pub fn load(&mut self) -> Result<()> {
        for scope in Scope::ALL {
            let entries = self.storage.read(scope)?;
            let separator = self.separator;
            let map: BTreeMap<String, Variable> = entries
                .into_iter()
                .map(|(name, raw)| {
                    let value = VariableValue::parse(&raw, separator);
                    (name.clone(), Variable::loaded(name, value, scope))
                })
                .collect();
            debug!(%scope, count = map.len(), "已加载作用域");
            *self.map_mut(scope) = map;
        }
        Ok(())
    }

    /// 按名称查找，用户级优先
    pub fn get(&self, name: &str) -> Result<&Variable> {
        self.user
            .get(name)
            .or_else(|| self.system.get(name))
            .ok_or_else(|| DomainError::NotFound(name.to_string()))
    }

    /// 在指定作用域中查找
    pub fn get_in(&self, name: &str, scope: Scope) -> Result<&Variable> {
        self.map(scope)
            .get(name)
            .ok_or_else(|| DomainError::NotFound(format!("{} ({})", name, scope)))
    }

    /// 任一作用域中是否存在该变量
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.user.contains_key(name) || self.system.contains_key(name)
    }

    /// 按名称顺序遍历某个作用域
    pub fn variables(&self, scope: Scope) -> impl Iterator<Item = &Variable> {
        self.map(scope).values()
    }

    /// 系统级在前，依次遍历全部变量
    pub fn all_variables(&self) -> impl Iterator<Item = &Variable> {
        self.system.values().chain(self.user.values())
    }

    /// 新增或更新变量
    ///
    /// 目标作用域已有同名变量时原地更新；另一个作用域有同名变量时将其迁移过来，
    /// 保留默认值与来源；都没有时新增。
    pub fn upsert(&mut self, name: &str, value: VariableValue, scope: Scope) -> &Variable {
        let other = scope.other();
        let variable = if let Some(mut existing) = self.map_mut(scope).remove(name) {
            existing.set_value(value);
            existing
        } else if let Some(mut moved) = self.map_mut(other).remove(name) {
            debug!(name, from = %other, to = %scope, "迁移变量作用域");
            moved.set_value(value);
            moved.set_scope(scope);
            moved
        } else {
            Variable::new(name.to_string(), value, scope)
        };

        let map = self.map_mut(scope);
        map.insert(name.to_string(), variable);
        &map[name]
    }

    /// 标记删除：值置空，保存时从存储中移除
    ///
    /// 未指定作用域时先查找用户级。
    pub fn remove(&mut self, name: &str, scope: Option<Scope>) -> Result<()> {
        let scope = match scope {
            Some(scope) => scope,
            None => self.get(name)?.scope(),
        };
        let variable = self
            .map_mut(scope)
            .get_mut(name)
            .ok_or_else(|| DomainError::NotFound(format!("{} ({})", name, scope)))?;
        variable.set_value(VariableValue::default());
        Ok(())
    }

    /// 重命名：旧变量标记删除，同一作用域下以新名称新增
    ///
    /// 只看旧变量所在的作用域；另一个作用域中的同名变量是独立的变量，不受影响。
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let (scope, value) = {
            let variable = self.get(old)?;
            if variable.is_removed() {
                return Err(DomainError::NotFound(old.to_string()));
            }
            (variable.scope(), variable.value().clone())
        };
        if self.map(scope).get(new).is_some_and(|v| !v.is_removed()) {
            return Err(DomainError::InvalidArgument(format!(
                "{} 作用域中已存在变量 {}",
                scope, new
            )));
        }
        self.remove(old, Some(scope))?;

        // 同作用域中已标记删除的同名变量直接复用，保存时改写而不是删除
        let map = self.map_mut(scope);
        match map.get_mut(new) {
            Some(existing) => existing.set_value(value),
            None => {
                map.insert(new.to_string(), Variable::new(new.to_string(), value, scope));
            }
        }
        Ok(())
    }

    /// 全部恢复到加载时的状态，丢弃新增变量
    pub fn reset(&mut self) {
        let variables: Vec<Variable> = std::mem::take(&mut self.system)
            .into_values()
            .chain(std::mem::take(&mut self.user).into_values())
            .collect();

        for variable in variables.into_iter().filter_map(Variable::into_default) {
            let scope = variable.scope();
            self.map_mut(scope)
                .insert(variable.name().to_string(), variable);
        }
    }

    /// 恢复单个变量，新增变量被丢弃
    pub fn reset_variable(&mut self, name: &str) -> Result<()> {
        let scope = self.get(name)?.scope();
        let Some(variable) = self.map_mut(scope).remove(name) else {
            return Err(DomainError::NotFound(name.to_string()));
        };
        if let Some(restored) = variable.into_default() {
            let origin = restored.scope();
            self.map_mut(origin).insert(name.to_string(), restored);
        }
        Ok(())
    }

    /// 计算保存时需要执行的操作
    #[must_use]
    pub fn pending_changes(&self) -> Vec<PendingChange> {
        let mut changes = Vec::new();

        for variable in self.all_variables() {
            if !variable.is_modified() {
                continue;
            }

            let scope = variable.scope();
            let name = variable.name().to_string();

            if let Some(origin) = variable.origin()
                && origin != scope
            {
                changes.push(PendingChange {
                    scope: origin,
                    name: name.clone(),
                    action: ChangeAction::Remove,
                });
            }

            if variable.is_removed() {
                if variable.origin() == Some(scope) {
                    changes.push(PendingChange {
                        scope,
                        name,
                        action: ChangeAction::Remove,
                    });
                }
                continue;
            }

            changes.push(PendingChange {
                scope,
                name,
                action: ChangeAction::Write(variable.value().encode(self.separator)),
            });
        }

        changes
    }

    /// 是否有未保存的修改
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.pending_changes().is_empty()
    }

    /// 将修改写回存储，返回执行的操作数
    ///
    /// 涉及的作用域不可写时，在任何写入之前返回权限错误。
    pub fn save(&mut self) -> Result<usize> {
        let changes = self.pending_changes();

        for scope in Scope::ALL {
            if changes.iter().any(|c| c.scope == scope) && !self.storage.is_writable(scope) {
                return Err(DomainError::PermissionDenied(format!(
                    "无法写入 {} 作用域 ({})",
                    scope,
                    self.storage.location(scope)
                )));
            }
        }

        for change in &changes {
            debug!(%change, "应用修改");
            match &change.action {
                ChangeAction::Write(value) => {
                    self.storage.write(change.scope, &change.name, value)?
                }
                ChangeAction::Remove => self.storage.remove(change.scope, &change.name)?,
            }
        }

        info!(count = changes.len(), "已保存环境变量");
        Ok(changes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryStorage;
    use crate::test_utils::{multi, single, store_with};

    #[test]
    fn test_load_parses_multi_values() {
        let store = store_with(&[], &[("FOO", "1;2")]);
        assert_eq!(store.get("FOO").unwrap().value(), &multi(&["1", "2"]));
    }

    #[test]
    fn test_load_empty_environment() {
        let mut store = VariableStore::new(MemoryStorage::new(), ';');
        store.load().unwrap();
        assert_eq!(store.all_variables().count(), 0);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_unmodified_save_performs_zero_writes() {
        let mut store = store_with(
            &[("Path", "C:\\Windows;C:\\Windows\\System32"), ("OS", "Windows_NT")],
            &[("TEMP", "C:\\Temp")],
        );
        assert_eq!(store.save().unwrap(), 0);
        assert_eq!(store.storage().operations(), 0);
    }

    #[test]
    fn test_get_prefers_user_scope() {
        let store = store_with(&[("PATH", "sys")], &[("PATH", "usr")]);
        assert_eq!(store.get("PATH").unwrap().scope(), Scope::User);
        assert_eq!(
            store.get_in("PATH", Scope::System).unwrap().value(),
            &single("sys")
        );
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let store = store_with(&[], &[]);
        assert!(matches!(store.get("NOPE"), Err(DomainError::NotFound(_))));
        assert!(!store.contains("NOPE"));
    }

    #[test]
    fn test_upsert_inserts_new_variable() {
        let mut store = store_with(&[], &[]);
        store.upsert("FOO", single("bar"), Scope::User);

        let var = store.get("FOO").unwrap();
        assert_eq!(var.value(), &single("bar"));
        assert!(var.is_new());
        assert_eq!(store.variables(Scope::User).count(), 1);
        assert_eq!(store.variables(Scope::System).count(), 0);
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let mut store = store_with(&[("FOO", "old")], &[]);
        store.upsert("FOO", single("new"), Scope::System);

        let var = store.get("FOO").unwrap();
        assert_eq!(var.value(), &single("new"));
        assert_eq!(var.default_value(), Some(&single("old")));
        assert_eq!(var.scope(), Scope::System);
    }

    #[test]
    fn test_upsert_moves_between_scopes() {
        let mut store = store_with(&[("FOO", "1")], &[]);
        store.upsert("FOO", single("2"), Scope::User);

        assert!(store.get_in("FOO", Scope::System).is_err());
        let var = store.get_in("FOO", Scope::User).unwrap();
        assert_eq!(var.value(), &single("2"));
        assert_eq!(var.default_value(), Some(&single("1")));
        assert_eq!(var.origin(), Some(Scope::System));
    }

    #[test]
    fn test_upsert_targets_requested_scope_when_in_both() {
        let mut store = store_with(&[("PATH", "a")], &[("PATH", "b")]);
        store.upsert("PATH", single("c"), Scope::System);

        assert_eq!(store.get_in("PATH", Scope::System).unwrap().value(), &single("c"));
        assert_eq!(store.get_in("PATH", Scope::User).unwrap().value(), &single("b"));
    }

    #[test]
    fn test_moved_variable_save_removes_from_origin() {
        let mut store = store_with(&[("FOO", "1")], &[]);
        store.upsert("FOO", single("1"), Scope::User);

        assert_eq!(
            store.pending_changes(),
            vec![
                PendingChange {
                    scope: Scope::System,
                    name: "FOO".into(),
                    action: ChangeAction::Remove,
                },
                PendingChange {
                    scope: Scope::User,
                    name: "FOO".into(),
                    action: ChangeAction::Write("1".into()),
                },
            ]
        );

        store.save().unwrap();
        assert_eq!(store.storage().value(Scope::System, "FOO"), None);
        assert_eq!(store.storage().value(Scope::User, "FOO"), Some("1"));
    }

    #[test]
    fn test_remove_then_save_deletes_key() {
        let mut store = store_with(&[], &[("FOO", "bar")]);
        store.remove("FOO", None).unwrap();

        assert!(store.get("FOO").unwrap().is_removed());
        store.save().unwrap();
        assert_eq!(store.storage().value(Scope::User, "FOO"), None);

        // 再次保存同样不报错
        store.save().unwrap();
    }

    #[test]
    fn test_remove_prefers_user_scope() {
        let mut store = store_with(&[("PATH", "a")], &[("PATH", "b")]);
        store.remove("PATH", None).unwrap();

        assert!(store.get_in("PATH", Scope::User).unwrap().is_removed());
        assert!(!store.get_in("PATH", Scope::System).unwrap().is_removed());
    }

    #[test]
    fn test_remove_unknown_is_not_found() {
        let mut store = store_with(&[("FOO", "1")], &[]);
        assert!(matches!(
            store.remove("FOO", Some(Scope::User)),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(store.remove("BAR", None), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_emptied_list_is_removed_on_save() {
        let mut store = store_with(&[], &[("FOO", "1;2")]);
        assert_eq!(store.get("FOO").unwrap().value(), &multi(&["1", "2"]));

        store.upsert("FOO", VariableValue::Multi(vec![]), Scope::User);
        store.save().unwrap();
        assert_eq!(store.storage().value(Scope::User, "FOO"), None);
    }

    #[test]
    fn test_list_of_empty_items_is_removed_on_save() {
        let mut store = store_with(&[("FOO", "1;2")], &[]);
        store.upsert("FOO", multi(&["", ""]), Scope::System);

        assert_eq!(
            store.pending_changes(),
            vec![PendingChange {
                scope: Scope::System,
                name: "FOO".into(),
                action: ChangeAction::Remove,
            }]
        );
    }

    #[test]
    fn test_list_values_are_joined_on_save() {
        let mut store = store_with(&[], &[]);
        store.upsert("LIST", multi(&["a", "b", "c"]), Scope::User);
        store.save().unwrap();
        assert_eq!(store.storage().value(Scope::User, "LIST"), Some("a;b;c"));
    }

    #[test]
    fn test_new_then_removed_variable_is_skipped() {
        let mut store = store_with(&[], &[]);
        store.upsert("FOO", single("1"), Scope::User);
        store.remove("FOO", None).unwrap();

        assert!(store.pending_changes().is_empty());
    }

    #[test]
    fn test_rename_marks_old_and_adds_new() {
        let mut store = store_with(&[("OLD", "v")], &[]);
        store.rename("OLD", "NEW").unwrap();

        assert!(store.get("OLD").unwrap().is_removed());
        let new = store.get("NEW").unwrap();
        assert_eq!(new.scope(), Scope::System);
        assert_eq!(new.value(), &single("v"));

        store.save().unwrap();
        assert_eq!(store.storage().value(Scope::System, "OLD"), None);
        assert_eq!(store.storage().value(Scope::System, "NEW"), Some("v"));
    }

    #[test]
    fn test_rename_onto_existing_fails() {
        let mut store = store_with(&[], &[("A", "1"), ("B", "2")]);
        assert!(matches!(
            store.rename("A", "B"),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_rename_keeps_same_name_in_other_scope() {
        let mut store = store_with(&[("NEW", "sysval")], &[("OLD", "v")]);
        store.rename("OLD", "NEW").unwrap();

        assert_eq!(
            store.get_in("NEW", Scope::System).unwrap().value(),
            &single("sysval")
        );
        assert_eq!(store.get_in("NEW", Scope::User).unwrap().value(), &single("v"));
        assert!(
            store
                .pending_changes()
                .iter()
                .all(|c| c.scope == Scope::User)
        );

        store.save().unwrap();
        assert_eq!(store.storage().value(Scope::System, "NEW"), Some("sysval"));
        assert_eq!(store.storage().value(Scope::User, "NEW"), Some("v"));
        assert_eq!(store.storage().value(Scope::User, "OLD"), None);
    }

    #[test]
    fn test_rename_removed_variable_fails() {
        let mut store = store_with(&[], &[("GONE", "1")]);
        store.remove("GONE", None).unwrap();

        assert!(matches!(
            store.rename("GONE", "OTHER"),
            Err(DomainError::NotFound(_))
        ));
        assert!(!store.contains("OTHER"));
    }

    #[test]
    fn test_rename_onto_removed_name_reuses_it() {
        let mut store = store_with(&[], &[("A", "1"), ("B", "2")]);
        store.remove("B", None).unwrap();
        store.rename("A", "B").unwrap();

        store.save().unwrap();
        assert_eq!(store.storage().value(Scope::User, "A"), None);
        assert_eq!(store.storage().value(Scope::User, "B"), Some("1"));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = store_with(&[("SYS", "1")], &[("USR", "a;b")]);
        store.upsert("SYS", single("changed"), Scope::User);
        store.remove("USR", None).unwrap();
        store.upsert("ADDED", single("x"), Scope::System);
        assert!(store.is_dirty());

        store.reset();

        assert!(!store.is_dirty());
        assert!(!store.contains("ADDED"));
        assert_eq!(store.get_in("SYS", Scope::System).unwrap().value(), &single("1"));
        assert!(store.get_in("SYS", Scope::User).is_err());
        assert_eq!(store.get("USR").unwrap().value(), &multi(&["a", "b"]));
    }

    #[test]
    fn test_reset_variable() {
        let mut store = store_with(&[("FOO", "1")], &[("BAR", "2")]);
        store.upsert("FOO", single("x"), Scope::User);
        store.upsert("BAR", single("y"), Scope::User);
        store.upsert("NEW", single("z"), Scope::User);

        store.reset_variable("FOO").unwrap();
        store.reset_variable("NEW").unwrap();

        assert_eq!(store.get_in("FOO", Scope::System).unwrap().value(), &single("1"));
        assert!(!store.contains("NEW"));
        assert_eq!(store.get("BAR").unwrap().value(), &single("y"));
        assert!(matches!(
            store.reset_variable("NEW"),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_refuses_read_only_scope_before_writing() {
        let storage = MemoryStorage::new()
            .with_var(Scope::System, "FOO", "1")
            .read_only(Scope::System);
        let mut store = VariableStore::new(storage, ';');
        store.load().unwrap();

        store.upsert("BAR", single("2"), Scope::User);
        store.upsert("FOO", single("3"), Scope::System);

        assert!(matches!(store.save(), Err(DomainError::PermissionDenied(_))));
        assert_eq!(store.storage().operations(), 0);
    }

    #[test]
    fn test_save_only_touches_changed_entries() {
        let mut store = store_with(&[("A", "1"), ("B", "2")], &[("C", "3")]);
        store.upsert("B", single("20"), Scope::System);

        assert_eq!(store.save().unwrap(), 1);
        assert_eq!(store.storage().operations(), 1);
        assert_eq!(store.storage().value(Scope::System, "B"), Some("20"));
    }

    #[test]
    fn test_load_discards_edits() {
        let mut store = store_with(&[], &[("FOO", "1")]);
        store.upsert("FOO", single("2"), Scope::User);
        store.save().unwrap();
        store.load().unwrap();

        let var = store.get("FOO").unwrap();
        assert_eq!(var.default_value(), Some(&single("2")));
        assert!(!store.is_dirty());
    }
}
