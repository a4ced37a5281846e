//! rename 命令处理器

use super::{CommandContext, CommandHandler};
use crate::domain::error::Result;

/// rename 命令
pub struct RenameCommand {
    old: String,
    new: String,
}

impl RenameCommand {
    pub fn new(old: String, new: String) -> Self {
        Self { old, new }
    }
}

impl CommandHandler for RenameCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.validator.validate_name(&self.new)?;
        ctx.store.rename(&self.old, &self.new)?;
        if ctx.verbose {
            println!("✓ 已将 {} 重命名为 {}", self.old, self.new);
        }
        Ok(())
    }

    fn mutates(&self) -> bool {
        true
    }
}
