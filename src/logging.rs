//! 日志初始化
//!
//! 日志写到 stderr，不干扰命令的标准输出。过滤规则优先取 `ENVX_LOG`，
//! 否则按 `-v` 次数决定级别。

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// 日志过滤规则的环境变量
pub const LOG_ENV: &str = "ENVX_LOG";

/// `-v` 次数对应的日志级别
#[must_use]
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// 初始化全局日志订阅者
pub fn init_logging(verbosity: u8) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("无效的 {} 过滤规则: {}", LOG_ENV, directives))?,
        _ => EnvFilter::new(level_for(verbosity)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!("初始化日志失败: {}", e))
}
