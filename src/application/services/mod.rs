//! 应用服务

pub mod exporter;
pub mod variable_store;

pub use exporter::Exporter;
pub use variable_store::{BoxedStore, ChangeAction, PendingChange, VariableStore};
