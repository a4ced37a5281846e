//! 导出为 HTML 或纯文本报告

use crate::application::services::VariableStore;
use crate::domain::error::{DomainError, Result};
use crate::domain::models::{ExportFormat, Variable};
use crate::domain::repositories::EnvStorage;
use std::path::{Path, PathBuf};
use tracing::info;

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
        <title>Environment variables of {host}</title>
        <style>
            body { font-family: sans-serif; }
            table { border-collapse: collapse; }
            td, th { border: 1px solid #999; padding: 4px 8px; vertical-align: top; }
        </style>
    </head>
    <body>
        <h1>Environment variables of {host}</h1>
        <p>Exported at {timestamp}</p>
        <table>
            <tr>
                <th>Name</th>
                <th>Value(s)</th>
            </tr>
{rows}        </table>
    </body>
</html>
"#;

const TEXT_SEPARATOR: &str = "-----------------------------------------------";

/// 报告生成器
#[derive(Debug, Clone)]
pub struct Exporter {
    host: String,
    timestamp: String,
}

impl Exporter {
    pub fn new(host: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timestamp: timestamp.into(),
        }
    }

    /// 以本地当前时间作为时间戳
    pub fn now(host: impl Into<String>) -> Self {
        Self::new(
            host,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        )
    }

    /// 渲染报告，已标记删除的变量不会出现
    pub fn render<'a>(
        &self,
        variables: impl IntoIterator<Item = &'a Variable>,
        format: ExportFormat,
    ) -> String {
        let variables = variables.into_iter().filter(|v| !v.is_removed());
        match format {
            ExportFormat::Html => self.render_html(variables),
            ExportFormat::Text => Self::render_text(variables),
        }
    }

    fn render_html<'a>(&self, variables: impl Iterator<Item = &'a Variable>) -> String {
        let mut rows = String::new();
        for var in variables {
            rows.push_str("            <tr>\n");
            rows.push_str(&format!("                <td>{}</td>\n", escape_html(var.name())));
            rows.push_str("                <td>\n");
            for item in var.value().items() {
                rows.push_str(&format!("                    {}<br>\n", escape_html(item)));
            }
            rows.push_str("                </td>\n");
            rows.push_str("            </tr>\n");
        }

        HTML_TEMPLATE
            .replace("{host}", &escape_html(&self.host))
            .replace("{timestamp}", &escape_html(&self.timestamp))
            .replace("{rows}", &rows)
    }

    fn render_text<'a>(variables: impl Iterator<Item = &'a Variable>) -> String {
        let mut out = String::new();
        for var in variables {
            out.push_str(&format!("Name: {}\n", var.name()));
            out.push_str("Value(s):\n");
            for item in var.value().items() {
                out.push_str(&format!("       {}\n", item));
            }
            out.push_str(TEXT_SEPARATOR);
            out.push('\n');
        }
        out
    }

    /// 将存储内容写入文件，返回实际写入的路径
    ///
    /// 扩展名与格式不符时替换为格式对应的扩展名。
    pub fn write_file<S: EnvStorage>(
        &self,
        store: &VariableStore<S>,
        path: &Path,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let path = resolve_export_path(path, format);
        let content = self.render(store.all_variables(), format);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            return Err(DomainError::FileNotFound(parent.to_path_buf()));
        }

        std::fs::write(&path, content)?;
        info!(path = %path.display(), "已导出环境变量");
        Ok(path)
    }
}

/// 按导出格式修正文件扩展名
#[must_use]
pub fn resolve_export_path(path: &Path, format: ExportFormat) -> PathBuf {
    let expected = format.extension();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(expected) => path.to_path_buf(),
        _ => path.with_extension(expected),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
