//! get 命令处理器

use super::{CommandContext, CommandHandler};
use crate::application::services::BoxedStore;
use crate::domain::error::{DomainError, Result};
use crate::domain::models::Scope;

/// get 命令
pub struct GetCommand {
    name: String,
    scope: Option<Scope>,
    raw: bool,
}

impl GetCommand {
    pub fn new(name: String, scope: Option<Scope>, raw: bool) -> Self {
        Self { name, scope, raw }
    }

    /// 渲染变量值：原始值一行，或每项一行
    pub fn render(&self, store: &BoxedStore, verbose: bool) -> Result<String> {
        let var = match self.scope {
            Some(scope) => store.get_in(&self.name, scope)?,
            None => store.get(&self.name)?,
        };
        if var.is_removed() {
            return Err(DomainError::NotFound(self.name.clone()));
        }

        let mut out = String::new();
        if self.raw {
            out.push_str(&var.value().encode(store.separator()));
            out.push('\n');
        } else {
            for item in var.value().items() {
                out.push_str(item);
                out.push('\n');
            }
        }
        if verbose {
            out.push_str(&format!("(作用域: {})\n", var.scope()));
        }
        Ok(out)
    }
}

impl CommandHandler for GetCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        print!("{}", self.render(ctx.store, ctx.verbose)?);
        Ok(())
    }
}
