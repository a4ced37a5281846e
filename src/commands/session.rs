//! 交互式编辑会话
//!
//! 逐行读取命令，修改只保存在内存中，直到执行 `save`。
//! 每行按 shell 规则拆分，支持单引号与双引号。

use super::{CommandContext, CommandHandler, print_pending, save_changes};
use crate::cli::{SessionCommands, SessionLine};
use crate::domain::error::{DomainError, Result};
use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::{debug, warn};

const PROMPT: &str = "envx> ";

/// session 命令
pub struct SessionCommand;

impl SessionCommand {
    /// 从任意输入源运行会话，便于测试
    pub fn run_with<R: BufRead>(
        &self,
        reader: R,
        ctx: &mut CommandContext<'_>,
        interactive: bool,
    ) -> Result<()> {
        if interactive {
            println!("输入 help 查看可用命令，save 保存，quit 退出");
            prompt();
        }

        for line in reader.lines() {
            let line = line?;
            match Self::run_line(&line, ctx) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => e.report(ctx.verbose),
            }
            if interactive {
                prompt();
            }
        }

        if ctx.store.is_dirty() {
            warn!("会话结束时仍有未保存的修改");
            eprintln!("警告: 有 {} 项修改未保存", ctx.store.pending_changes().len());
        }
        Ok(())
    }

    /// 执行一行命令，返回 true 表示退出会话
    fn run_line(line: &str, ctx: &mut CommandContext<'_>) -> Result<bool> {
        let args = split_line(line)?;
        if args.is_empty() {
            return Ok(false);
        }

        let parsed = match SessionLine::try_parse_from(&args) {
            Ok(parsed) => parsed,
            Err(e) => {
                let _ = e.print();
                return Ok(false);
            }
        };
        debug!(command = ?parsed.command, "会话命令");

        match parsed.command {
            SessionCommands::Edit(cmd) => {
                let handler = cmd.into_handler().map_err(DomainError::InvalidArgument)?;
                handler.execute(ctx)?;
            }
            SessionCommands::Diff => print_pending(ctx.store),
            SessionCommands::Reset { name: None } => ctx.store.reset(),
            SessionCommands::Reset { name: Some(name) } => ctx.store.reset_variable(&name)?,
            SessionCommands::Save => {
                save_changes(ctx)?;
                if !ctx.dry_run {
                    ctx.store.load()?;
                }
            }
            SessionCommands::Quit => return Ok(true),
        }
        Ok(false)
    }
}

impl CommandHandler for SessionCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        self.run_with(stdin.lock(), ctx, interactive)
    }
}

fn prompt() {
    print!("{}", PROMPT);
    let _ = io::stdout().flush();
}

/// 按空白拆分一行，引号内的空白保留
pub fn split_line(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(DomainError::InvalidArgument(format!("引号未闭合: {}", line)));
    }
    if in_token {
        args.push(current);
    }
    Ok(args)
}
