//! unset 命令处理器

use super::{CommandContext, CommandHandler};
use crate::domain::error::{DomainError, Result};
use crate::domain::models::Scope;

/// unset 命令
pub struct UnsetCommand {
    name: String,
    scope: Option<Scope>,
}

impl UnsetCommand {
    pub fn new(name: String, scope: Option<Scope>) -> Self {
        Self { name, scope }
    }
}

impl CommandHandler for UnsetCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let var = match self.scope {
            Some(scope) => ctx.store.get_in(&self.name, scope)?,
            None => ctx.store.get(&self.name)?,
        };
        if var.is_removed() {
            return Err(DomainError::NotFound(self.name.clone()));
        }
        let scope = var.scope();

        ctx.store.remove(&self.name, Some(scope))?;
        if ctx.verbose {
            println!("✓ 已删除变量: [{}] {}", scope, self.name);
        }
        Ok(())
    }

    fn mutates(&self) -> bool {
        true
    }
}
