//! status 命令处理器

use super::{CommandContext, CommandHandler};
use crate::application::services::BoxedStore;
use crate::domain::error::Result;
use crate::domain::models::Scope;
use crate::domain::repositories::EnvStorage;

/// status 命令
pub struct StatusCommand;

impl StatusCommand {
    /// 渲染分隔符与各作用域的状态
    pub fn render(store: &BoxedStore, verbose: bool) -> String {
        let mut out = format!("列表分隔符: {:?}\n", store.separator());

        for scope in Scope::ALL {
            let storage = store.storage();
            let writable = if storage.is_writable(scope) {
                "可写"
            } else {
                "只读"
            };
            let count = store.variables(scope).filter(|v| !v.is_removed()).count();
            let modified = store.variables(scope).filter(|v| v.is_modified()).count();

            out.push_str(&format!(
                "  {}: {} [{}] {} 个变量, {} 个未保存的修改\n",
                scope,
                storage.location(scope),
                writable,
                count,
                modified
            ));
        }

        if verbose {
            let conflicts: Vec<&str> = store
                .variables(Scope::User)
                .filter(|v| store.get_in(v.name(), Scope::System).is_ok())
                .map(|v| v.name())
                .collect();
            if !conflicts.is_empty() {
                out.push_str("\n同时存在于两个作用域的变量:\n");
                for name in conflicts {
                    out.push_str(&format!("  {}\n", name));
                }
            }
        }

        out
    }
}

impl CommandHandler for StatusCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        print!("{}", Self::render(ctx.store, ctx.verbose));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Fixture;

    #[test]
    fn test_status_counts_and_conflicts() {
        let mut fixture = Fixture::new(&[("PATH", "a"), ("SYS", "1")], &[("PATH", "b")]);
        fixture.store.remove("SYS", None).unwrap();

        let out = StatusCommand::render(&fixture.store, false);
        assert!(out.starts_with("列表分隔符: ';'\n"));
        assert!(out.contains("  system: memory:system [可写] 1 个变量, 1 个未保存的修改\n"));
        assert!(out.contains("  user: memory:user [可写] 1 个变量, 0 个未保存的修改\n"));
        assert!(!out.contains("同时存在"));

        let out = StatusCommand::render(&fixture.store, true);
        assert!(out.ends_with("同时存在于两个作用域的变量:\n  PATH\n"));
        assert!(fixture.run(&StatusCommand).is_ok());
    }
}
