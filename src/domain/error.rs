//! 领域层错误类型

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomainError>;

/// 领域层错误类型
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum DomainError {
    #[error("变量未找到: {0}")]
    #[diagnostic(code(envx::not_found), help("使用 'envx list' 查看所有变量"))]
    NotFound(String),

    #[error("存储错误: {0}")]
    #[diagnostic(code(envx::storage))]
    Storage(String),

    #[error("校验失败: {0}")]
    #[diagnostic(
        code(envx::validation),
        help("变量名只能包含字母、数字和下划线，且不能以数字开头；值不能为空")
    )]
    Validation(String),

    #[error("权限不足: {0}")]
    #[diagnostic(
        code(envx::permission_denied),
        help("系统级变量需要管理员权限，请以管理员身份运行")
    )]
    PermissionDenied(String),

    #[error("无效的作用域: {0}")]
    #[diagnostic(code(envx::invalid_scope), help("有效作用域: system, user"))]
    InvalidScope(String),

    #[error("无效参数: {0}")]
    #[diagnostic(code(envx::invalid_argument))]
    InvalidArgument(String),

    #[error("文件不存在: {}", .0.display())]
    #[diagnostic(code(envx::file_not_found))]
    FileNotFound(PathBuf),

    #[error("IO 错误: {0}")]
    #[diagnostic(code(envx::io))]
    Io(String),

    #[error("配置错误: {0}")]
    #[diagnostic(code(envx::config))]
    Config(String),

    #[error("序列化错误: {0}")]
    #[diagnostic(code(envx::serialization))]
    Serialization(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => DomainError::PermissionDenied(err.to_string()),
            _ => DomainError::Io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl DomainError {
    /// 报告错误，支持详细/安静模式
    ///
    /// verbose = true: 完整 miette 诊断
    /// verbose = false: 一行关键信息
    pub fn report(&self, verbose: bool) {
        if verbose {
            eprintln!("{:?}", miette::Report::new(self.clone()));
        } else {
            eprintln!("错误: {}", self);
        }
    }
}
