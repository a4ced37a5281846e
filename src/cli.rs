//! CLI 参数定义

use crate::commands::{
    CommandHandler, ExportCommand, GetCommand, ListCommand, MoveCommand, RenameCommand,
    SetCommand, UnsetCommand,
};
use crate::domain::models::{ExportFormat, OutputFormat, Scope};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// envx - 系统级与用户级环境变量查看与编辑工具
#[derive(Parser)]
#[command(
    name = "envx",
    version,
    about = "系统级与用户级环境变量查看与编辑工具",
    long_about = "查看、编辑并导出操作系统中的环境变量。Windows 上读写注册表，其他平台读写 KEY=VALUE 文件"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 详细输出模式 (可重复以提高日志级别)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// 配置文件路径
    #[arg(long, global = true, env = "ENVX_CONFIG")]
    pub config: Option<PathBuf>,

    /// 只显示将要执行的修改，不写入
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Edit(EditCommands),

    /// 显示存储后端与作用域状态
    Status,

    /// 交互式编辑会话，显式 save 后才写入
    Session,
}

/// 一次性命令与交互会话共用的编辑命令
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum EditCommands {
    /// 列出环境变量
    List {
        /// 只列出指定作用域 (system/user)
        #[arg(short, long, value_parser = parse_scope)]
        scope: Option<Scope>,
        /// 输出格式 (env/json)
        #[arg(short, long, default_value = "env")]
        format: String,
    },

    /// 获取环境变量
    Get {
        /// 变量名称
        name: String,
        /// 指定作用域，默认用户级优先
        #[arg(short, long, value_parser = parse_scope)]
        scope: Option<Scope>,
        /// 输出分隔符连接的原始值，而不是每行一项
        #[arg(long)]
        raw: bool,
    },

    /// 设置环境变量 (包含分隔符的值按列表处理)
    Set {
        /// 变量名称
        name: String,
        /// 变量值
        value: String,
        /// 目标作用域
        #[arg(short, long, value_parser = parse_scope, default_value = "user")]
        scope: Scope,
    },

    /// 删除环境变量
    Unset {
        /// 变量名称
        name: String,
        /// 指定作用域，默认用户级优先
        #[arg(short, long, value_parser = parse_scope)]
        scope: Option<Scope>,
    },

    /// 将变量迁移到另一个作用域
    Move {
        /// 变量名称
        name: String,
        /// 目标作用域
        #[arg(value_parser = parse_scope)]
        scope: Scope,
    },

    /// 重命名环境变量
    Rename {
        /// 原名称
        old: String,
        /// 新名称
        new: String,
    },

    /// 导出为 HTML 或文本报告
    Export {
        /// 输出文件
        file: PathBuf,
        /// 导出格式 (html/text)，默认按文件扩展名判断
        #[arg(short, long)]
        format: Option<String>,
    },
}

impl EditCommands {
    /// 转换为命令处理器
    pub fn into_handler(self) -> Result<Box<dyn CommandHandler>, String> {
        let handler: Box<dyn CommandHandler> = match self {
            EditCommands::List { scope, format } => {
                Box::new(ListCommand::new(scope, OutputFormat::from(format.as_str())))
            }
            EditCommands::Get { name, scope, raw } => Box::new(GetCommand::new(name, scope, raw)),
            EditCommands::Set { name, value, scope } => {
                Box::new(SetCommand::new(name, value, scope))
            }
            EditCommands::Unset { name, scope } => Box::new(UnsetCommand::new(name, scope)),
            EditCommands::Move { name, scope } => Box::new(MoveCommand::new(name, scope)),
            EditCommands::Rename { old, new } => Box::new(RenameCommand::new(old, new)),
            EditCommands::Export { file, format } => {
                let format = match format {
                    Some(f) => parse_export_format(&f)?,
                    None => guess_export_format(&file),
                };
                Box::new(ExportCommand::new(file, format))
            }
        };
        Ok(handler)
    }
}

/// 交互会话中的一行命令
#[derive(Parser, Debug)]
#[command(
    name = "envx",
    no_binary_name = true,
    disable_version_flag = true,
    override_usage = "<命令> [参数]"
)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SessionCommands {
    #[command(flatten)]
    Edit(EditCommands),

    /// 显示未保存的修改
    Diff,

    /// 恢复默认值，未指定名称时恢复全部
    Reset {
        /// 变量名称
        name: Option<String>,
    },

    /// 保存修改并重新加载
    Save,

    /// 退出会话
    #[command(alias = "exit")]
    Quit,
}

/// 解析作用域参数
pub fn parse_scope(s: &str) -> Result<Scope, String> {
    s.parse::<Scope>()
        .map_err(|e| format!("{} (有效值: system, user)", e))
}

/// 解析导出格式参数
pub fn parse_export_format(s: &str) -> Result<ExportFormat, String> {
    ExportFormat::parse(s).ok_or_else(|| format!("无效的导出格式: {} (有效值: html, text)", s))
}

/// 按文件扩展名推断导出格式，无法判断时使用 HTML
pub fn guess_export_format(file: &std::path::Path) -> ExportFormat {
    file.extension()
        .and_then(|e| e.to_str())
        .and_then(ExportFormat::parse)
        .unwrap_or_default()
}
