//! list 命令处理器

use super::{CommandContext, CommandHandler};
use crate::application::services::BoxedStore;
use crate::domain::error::Result;
use crate::domain::models::{OutputFormat, Scope, Variable};

/// list 命令
pub struct ListCommand {
    scope: Option<Scope>,
    format: OutputFormat,
}

impl ListCommand {
    pub fn new(scope: Option<Scope>, format: OutputFormat) -> Self {
        Self { scope, format }
    }

    /// 渲染输出文本，每行一项
    pub fn render(&self, store: &BoxedStore, verbose: bool) -> Result<String> {
        let separator = store.separator();
        let vars: Vec<&Variable> = match self.scope {
            Some(scope) => store.variables(scope).collect(),
            None => store.all_variables().collect(),
        };
        let vars: Vec<&Variable> = vars.into_iter().filter(|v| !v.is_removed()).collect();

        match self.format {
            OutputFormat::Env => {
                let mut out = String::new();
                for var in &vars {
                    let line = format!("{}={}", var.name(), var.value().encode(separator));
                    let marker = if verbose && var.is_modified() { " *" } else { "" };
                    match self.scope {
                        Some(_) => out.push_str(&format!("{}{}\n", line, marker)),
                        None => out.push_str(&format!("[{}] {}{}\n", var.scope(), line, marker)),
                    }
                }
                Ok(out)
            }
            OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&vars)?)),
        }
    }
}

impl CommandHandler for ListCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        print!("{}", self.render(ctx.store, ctx.verbose)?);
        Ok(())
    }
}
