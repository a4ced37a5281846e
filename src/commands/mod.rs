//! 命令处理器
//!
//! 每个命令一个模块，实现 CommandHandler trait

use crate::application::services::BoxedStore;
use crate::domain::error::Result;
use crate::domain::validation::NameValidator;

pub mod export;
pub mod get;
pub mod list;
pub mod move_scope;
pub mod rename;
pub mod session;
pub mod set;
pub mod status;
pub mod unset;

pub use export::ExportCommand;
pub use get::GetCommand;
pub use list::ListCommand;
pub use move_scope::MoveCommand;
pub use rename::RenameCommand;
pub use session::SessionCommand;
pub use set::SetCommand;
pub use status::StatusCommand;
pub use unset::UnsetCommand;

/// 命令上下文
pub struct CommandContext<'a> {
    pub store: &'a mut BoxedStore,
    pub validator: &'a NameValidator,
    pub verbose: bool,
    pub dry_run: bool,
}

/// 命令处理器 trait
pub trait CommandHandler {
    /// 执行命令
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()>;

    /// 是否修改了存储，一次性调用时需要保存
    fn mutates(&self) -> bool {
        false
    }
}

/// 打印待保存的修改
pub fn print_pending(store: &BoxedStore) {
    let changes = store.pending_changes();
    if changes.is_empty() {
        println!("无修改");
        return;
    }
    for change in changes {
        println!("{}", change);
    }
}

/// 保存修改；dry-run 时只打印计划
pub fn save_changes(ctx: &mut CommandContext<'_>) -> Result<usize> {
    if ctx.dry_run {
        print_pending(ctx.store);
        return Ok(0);
    }
    let count = ctx.store.save()?;
    if ctx.verbose {
        println!("✓ 已保存 {} 项修改", count);
    }
    Ok(count)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::application::services::VariableStore;
    use crate::domain::models::Scope;
    use crate::domain::repositories::EnvStorage;
    use crate::domain::validation::DEFAULT_NAME_PATTERN;
    use crate::infrastructure::memory::MemoryStorage;

    /// 以内存存储构建的命令测试夹具
    pub struct Fixture {
        pub store: BoxedStore,
        pub validator: NameValidator,
    }

    impl Fixture {
        pub fn new(system: &[(&str, &str)], user: &[(&str, &str)]) -> Self {
            let mut storage = MemoryStorage::new();
            for (name, value) in system {
                storage = storage.with_var(Scope::System, name, value);
            }
            for (name, value) in user {
                storage = storage.with_var(Scope::User, name, value);
            }
            let storage: Box<dyn EnvStorage> = Box::new(storage);
            let mut store = VariableStore::new(storage, ';');
            store.load().unwrap();
            Self {
                store,
                validator: NameValidator::new(DEFAULT_NAME_PATTERN).unwrap(),
            }
        }

        pub fn run(&mut self, handler: &dyn CommandHandler) -> Result<()> {
            let mut ctx = CommandContext {
                store: &mut self.store,
                validator: &self.validator,
                verbose: false,
                dry_run: false,
            };
            handler.execute(&mut ctx)
        }
    }
}
