//! Declarative TOML description of a parameter set and its tasks.

mod loader;
mod types;

pub use loader::SchemaError;
pub use types::{ParameterSpec, Schema, TaskSpec};
