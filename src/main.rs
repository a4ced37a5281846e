//! envx 主程序入口
//!
//! 设计原则：
//! - 模块化：入口代码简洁，逻辑委托给各模块
//! - 安静模式：默认无输出，成功静默
//! - 错误处理：详细/安静错误模式，通过 --verbose 切换

use clap::Parser;
use envexplorer::app::{AppConfig, Application};
use envexplorer::cli::{Cli, Commands};
use envexplorer::commands::{
    CommandContext, CommandHandler, SessionCommand, StatusCommand, save_changes,
};
use envexplorer::domain::DomainError;
use envexplorer::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    // 解析 CLI 参数
    let cli = Cli::parse();
    let verbose = cli.verbose > 0;

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    // 配置初始化
    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("配置初始化失败: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    config.verbose = verbose;
    config.dry_run = cli.dry_run;

    // 加载环境变量
    let mut app = match Application::new(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("错误: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // 执行命令，统一错误处理
    match run_command(cli.command, &mut app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report(verbose);
            ExitCode::FAILURE
        }
    }
}

/// 运行具体命令，修改类命令执行后立即保存
fn run_command(command: Commands, app: &mut Application) -> Result<(), DomainError> {
    let handler: Box<dyn CommandHandler> = match command {
        Commands::Edit(cmd) => cmd.into_handler().map_err(DomainError::InvalidArgument)?,
        Commands::Status => Box::new(StatusCommand),
        Commands::Session => Box::new(SessionCommand),
    };

    let mut ctx = CommandContext {
        store: &mut app.store,
        validator: &app.validator,
        verbose: app.config.verbose,
        dry_run: app.config.dry_run,
    };

    handler.execute(&mut ctx)?;
    if handler.mutates() {
        save_changes(&mut ctx)?;
    }
    Ok(())
}
