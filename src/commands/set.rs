//! set 命令处理器

use super::{CommandContext, CommandHandler};
use crate::domain::error::Result;
use crate::domain::models::{Scope, VariableValue};
use tracing::debug;

/// set 命令
pub struct SetCommand {
    name: String,
    value: String,
    scope: Scope,
}

impl SetCommand {
    pub fn new(name: String, value: String, scope: Scope) -> Self {
        Self { name, value, scope }
    }
}

impl CommandHandler for SetCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        // 已存在的变量名来自系统，不受命名规则约束
        if ctx.store.contains(&self.name) {
            ctx.validator.validate_value(&self.name, &self.value)?;
        } else {
            ctx.validator.validate_new_variable(&self.name, &self.value)?;
        }

        let value = VariableValue::parse(&self.value, ctx.store.separator());
        let var = ctx.store.upsert(&self.name, value, self.scope);
        debug!(name = var.name(), scope = %var.scope(), "已设置变量");

        if ctx.verbose {
            println!("✓ 已设置变量 [{}] {} = {}", self.scope, self.name, self.value);
        }
        Ok(())
    }

    fn mutates(&self) -> bool {
        true
    }
}
