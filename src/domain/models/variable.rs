//! 环境变量实体模型

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 环境变量作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// 系统级 (机器范围，通常需要管理员权限)
    System,
    /// 用户级 (当前账户)
    #[default]
    User,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::System => write!(f, "system"),
            Scope::User => write!(f, "user"),
        }
    }
}

impl Scope {
    /// 全部作用域，系统级在前
    pub const ALL: [Scope; 2] = [Scope::System, Scope::User];

    /// 从字符串解析
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "system" | "global" | "machine" => Some(Scope::System),
            "user" | "local" => Some(Scope::User),
            _ => None,
        }
    }

    /// 另一个作用域
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Scope::System => Scope::User,
            Scope::User => Scope::System,
        }
    }
}

impl FromStr for Scope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::parse(s).ok_or_else(|| DomainError::InvalidScope(s.to_string()))
    }
}

/// 变量值：单值或有序列表 (PATH 一类以分隔符连接的变量)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Single(String),
    Multi(Vec<String>),
}

impl Default for VariableValue {
    fn default() -> Self {
        VariableValue::Single(String::new())
    }
}

impl VariableValue {
    /// 解析存储中的原始字符串
    ///
    /// 包含分隔符时拆分为列表 (保留空项)，否则为单值。
    #[must_use]
    pub fn parse(raw: &str, separator: char) -> Self {
        if raw.contains(separator) {
            VariableValue::Multi(raw.split(separator).map(str::to_string).collect())
        } else {
            VariableValue::Single(raw.to_string())
        }
    }

    /// 编码为存储格式，列表以分隔符连接
    #[must_use]
    pub fn encode(&self, separator: char) -> String {
        match self {
            VariableValue::Single(value) => value.clone(),
            VariableValue::Multi(items) => items.join(separator.to_string().as_str()),
        }
    }

    /// 是否为空值 (空字符串、空列表或全部为空项的列表)
    ///
    /// 空值的变量在保存时会被删除而不是写入。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            VariableValue::Single(value) => value.is_empty(),
            VariableValue::Multi(items) => items.iter().all(String::is_empty),
        }
    }

    /// 按顺序返回所有值项
    #[must_use]
    pub fn items(&self) -> Vec<&str> {
        match self {
            VariableValue::Single(value) => vec![value.as_str()],
            VariableValue::Multi(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

/// 环境变量条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    name: String,
    value: VariableValue,
    scope: Scope,
    #[serde(skip)]
    default_value: Option<VariableValue>,
    #[serde(skip)]
    origin: Option<Scope>,
}

impl Variable {
    /// 从存储加载的变量，当前值即默认值
    #[must_use]
    pub fn loaded(name: String, value: VariableValue, scope: Scope) -> Self {
        Self {
            name,
            default_value: Some(value.clone()),
            value,
            scope,
            origin: Some(scope),
        }
    }

    /// 用户新增的变量，没有默认值
    #[must_use]
    pub fn new(name: String, value: VariableValue, scope: Scope) -> Self {
        Self {
            name,
            value,
            scope,
            default_value: None,
            origin: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &VariableValue {
        &self.value
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// 加载时的值
    pub fn default_value(&self) -> Option<&VariableValue> {
        self.default_value.as_ref()
    }

    /// 加载时所在的作用域
    pub fn origin(&self) -> Option<Scope> {
        self.origin
    }

    /// 是否为本次会话新增
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.origin.is_none()
    }

    /// 是否已标记删除
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.value.is_empty()
    }

    /// 与加载时相比是否有变化
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.origin != Some(self.scope) || self.default_value.as_ref() != Some(&self.value)
    }

    pub(crate) fn set_value(&mut self, value: VariableValue) {
        self.value = value;
    }

    pub(crate) fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    /// 恢复到加载时的状态，新增变量返回 `None`
    pub(crate) fn into_default(self) -> Option<Self> {
        let origin = self.origin?;
        let value = self.default_value.clone()?;
        Some(Self {
            value,
            scope: origin,
            ..self
        })
    }
}

/// 输出格式类型
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Env,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "j" => OutputFormat::Json,
            _ => OutputFormat::Env,
        }
    }
}

/// 导出文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Html,
    Text,
}

impl ExportFormat {
    /// 从字符串解析
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Some(ExportFormat::Html),
            "text" | "txt" | "log" => Some(ExportFormat::Text),
            _ => None,
        }
    }

    /// 对应的文件扩展名
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Text => "log",
        }
    }
}
