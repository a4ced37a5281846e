//! export 命令处理器

use super::{CommandContext, CommandHandler};
use crate::application::services::Exporter;
use crate::domain::error::Result;
use crate::domain::models::ExportFormat;
use crate::infrastructure::paths;
use std::path::PathBuf;

/// export 命令
pub struct ExportCommand {
    file: PathBuf,
    format: ExportFormat,
}

impl ExportCommand {
    pub fn new(file: PathBuf, format: ExportFormat) -> Self {
        Self { file, format }
    }
}

impl CommandHandler for ExportCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let exporter = Exporter::now(paths::host_name());
        let path = exporter.write_file(ctx.store, &self.file, self.format)?;
        println!("{}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Fixture;

    #[test]
    fn test_export_html() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = Fixture::new(&[("SYS", "1")], &[("USR", "a;b")]);

        fixture
            .run(&ExportCommand::new(dir.path().join("env"), ExportFormat::Html))
            .unwrap();

        let html = std::fs::read_to_string(dir.path().join("env.html")).unwrap();
        assert!(html.contains("<td>SYS</td>"));
        assert!(html.contains("<td>USR</td>"));
    }
}
