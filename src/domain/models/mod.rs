//! 领域实体

pub mod variable;

pub use variable::{ExportFormat, OutputFormat, Scope, Variable, VariableValue};
