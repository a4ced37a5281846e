//! 文件存储实现
//!
//! 每个作用域对应一个 `KEY=VALUE` 文本文件 (如 `/etc/environment` 与
//! `environment.d` 下的用户配置)。改写时保留注释、空行和其他变量的原有行。

use crate::domain::error::{DomainError, Result};
use crate::domain::models::Scope;
use crate::domain::repositories::EnvStorage;
use crate::infrastructure::paths;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 文件环境变量存储
#[derive(Debug, Clone)]
pub struct FileStorage {
    system: PathBuf,
    user: PathBuf,
}

impl FileStorage {
    pub fn new(system: PathBuf, user: PathBuf) -> Self {
        Self { system, user }
    }

    /// 获取作用域对应的文件路径
    pub fn path(&self, scope: Scope) -> &Path {
        match scope {
            Scope::System => &self.system,
            Scope::User => &self.user,
        }
    }

    /// 解析单行，返回键与未去引号的值；注释、空行和无法识别的行返回 `None`
    fn parse_line(line: &str) -> Option<(&str, &str)> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let trimmed = trimmed
            .strip_prefix("export ")
            .map(str::trim_start)
            .unwrap_or(trimmed);
        let (key, value) = trimmed.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }

        Some((key, value.trim()))
    }

    /// 序列化单个变量
    fn format_line(name: &str, value: &str) -> String {
        let needs_quotes = value.chars().any(|c| c.is_whitespace() || c == '#')
            || value.starts_with(['"', '\''])
            || value.ends_with(['"', '\'']);
        if needs_quotes {
            format!("{}=\"{}\"", name, escape(value))
        } else {
            format!("{}={}", name, value)
        }
    }

    fn read_lines(path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Storage(format!("无法读取 {}: {}", path.display(), e)))?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
        paths::ensure_parent_dir(path)?;
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        std::fs::write(path, content)
            .map_err(|e| DomainError::Storage(format!("无法写入 {}: {}", path.display(), e)))
    }

    fn is_key_line(line: &str, name: &str) -> bool {
        Self::parse_line(line).is_some_and(|(key, _)| key == name)
    }
}

/// 双引号内转义反斜杠、双引号与换行，保证一个变量只占一行
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// 去掉一层引号；双引号内还原 `escape` 的转义，无法识别的转义原样保留
fn unquote(value: &str) -> String {
    if value.len() >= 2
        && let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"'))
    {
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some(c @ ('"' | '\\')) => out.push(c),
                Some(c) => {
                    out.push('\\');
                    out.push(c);
                }
                None => out.push('\\'),
            }
        }
        return out;
    }
    if value.len() >= 2
        && let Some(inner) = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\''))
    {
        return inner.to_string();
    }
    value.to_string()
}

impl EnvStorage for FileStorage {
    fn read(&self, scope: Scope) -> Result<Vec<(String, String)>> {
        let path = self.path(scope);
        let lines = Self::read_lines(path)?;
        let vars: Vec<(String, String)> = lines
            .iter()
            .filter_map(|line| Self::parse_line(line))
            .map(|(k, v)| (k.to_string(), unquote(v)))
            .collect();
        debug!(%scope, path = %path.display(), count = vars.len(), "读取变量文件");
        Ok(vars)
    }

    fn write(&mut self, scope: Scope, name: &str, value: &str) -> Result<()> {
        let path = self.path(scope);
        let lines = Self::read_lines(path)?;
        let new_line = Self::format_line(name, value);

        let mut replaced = false;
        let mut out = Vec::with_capacity(lines.len() + 1);
        for line in lines {
            if Self::is_key_line(&line, name) {
                // 只保留第一次出现的位置，其余重复定义丢弃
                if !replaced {
                    out.push(new_line.clone());
                    replaced = true;
                }
            } else {
                out.push(line);
            }
        }
        if !replaced {
            out.push(new_line);
        }

        debug!(%scope, name, path = %path.display(), "写入变量");
        Self::write_lines(path, &out)
    }

    fn remove(&mut self, scope: Scope, name: &str) -> Result<()> {
        let path = self.path(scope);
        let lines = Self::read_lines(path)?;
        let before = lines.len();
        let out: Vec<String> = lines
            .into_iter()
            .filter(|line| !Self::is_key_line(line, name))
            .collect();

        if out.len() == before {
            return Ok(());
        }

        debug!(%scope, name, path = %path.display(), "删除变量");
        Self::write_lines(path, &out)
    }

    fn is_writable(&self, scope: Scope) -> bool {
        let path = self.path(scope);
        if path.exists() {
            return OpenOptions::new().append(true).open(path).is_ok();
        }

        path.ancestors()
            .skip(1)
            .filter(|dir| !dir.as_os_str().is_empty())
            .find(|dir| dir.exists())
            .and_then(|dir| dir.metadata().ok())
            .is_some_and(|meta| !meta.permissions().readonly())
    }

    fn location(&self, scope: Scope) -> String {
        self.path(scope).display().to_string()
    }
}
