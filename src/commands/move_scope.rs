//! move 命令处理器

use super::{CommandContext, CommandHandler};
use crate::domain::error::{DomainError, Result};
use crate::domain::models::Scope;

/// move 命令：将变量迁移到另一个作用域
pub struct MoveCommand {
    name: String,
    scope: Scope,
}

impl MoveCommand {
    pub fn new(name: String, scope: Scope) -> Self {
        Self { name, scope }
    }
}

impl CommandHandler for MoveCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        if ctx.store.get_in(&self.name, self.scope).is_ok() {
            return Err(DomainError::InvalidArgument(format!(
                "{} 已在 {} 作用域中",
                self.name, self.scope
            )));
        }
        let value = ctx
            .store
            .get_in(&self.name, self.scope.other())?
            .value()
            .clone();

        ctx.store.upsert(&self.name, value, self.scope);
        if ctx.verbose {
            println!("✓ 已将 {} 迁移到 {}", self.name, self.scope);
        }
        Ok(())
    }

    fn mutates(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Fixture;

    #[test]
    fn test_move_to_other_scope() {
        let mut fixture = Fixture::new(&[("JAVA_HOME", "/opt/jdk")], &[]);
        fixture
            .run(&MoveCommand::new("JAVA_HOME".into(), Scope::User))
            .unwrap();

        assert!(fixture.store.get_in("JAVA_HOME", Scope::System).is_err());
        let var = fixture.store.get_in("JAVA_HOME", Scope::User).unwrap();
        assert_eq!(var.value().items(), vec!["/opt/jdk"]);
        assert_eq!(var.origin(), Some(Scope::System));
    }

    #[test]
    fn test_move_rejects_same_scope() {
        let mut fixture = Fixture::new(&[], &[("FOO", "1")]);
        assert!(matches!(
            fixture.run(&MoveCommand::new("FOO".into(), Scope::User)),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            fixture.run(&MoveCommand::new("BAR".into(), Scope::User)),
            Err(DomainError::NotFound(_))
        ));
    }
}
