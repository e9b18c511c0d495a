use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::error::ParamSetError;
use crate::parameter::{GlobExpander, Parameter, PrintName};
use crate::schema::types::Schema;
use crate::set::ParameterSet;
use crate::task::{TaskDefinition, TaskSet};

/// Errors that can occur when loading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read schema file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Schema validation failed: {message}")]
    ValidationError { message: String },

    #[error("Schema is not accepted by the engine: {0}")]
    Engine(#[from] ParamSetError),
}

impl Schema {
    /// Returns the default schema path.
    ///
    /// Uses `~/.config/paramset/schema.toml` on Unix/macOS, or the
    /// equivalent via `dirs::config_dir()`. Falls back to the current
    /// directory if config_dir is unavailable.
    pub fn schema_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("paramset").join("schema.toml")
    }

    /// Loads the default schema; a missing file yields an empty schema.
    pub fn load_default() -> Result<Self, SchemaError> {
        let path = Self::schema_path();
        if !path.exists() {
            return Ok(Schema::default());
        }
        Self::load(&path)
    }

    /// Loads, parses and validates a schema file.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path).map_err(|e| SchemaError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let schema: Schema = toml::from_str(&content).map_err(|e| SchemaError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        schema.validate()?;
        tracing::info!(
            path = %path.display(),
            parameters = schema.parameters.len(),
            tasks = schema.tasks.len(),
            "schema loaded"
        );
        Ok(schema)
    }

    /// Validates the schema.
    ///
    /// Checks:
    /// - Parameter names and aliases are non-empty and unique
    /// - At most one parameter collects loose values
    /// - Parse options are consistent
    /// - Task ids are unique and tasks reference declared parameters
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen: Vec<&str> = Vec::new();
        for spec in &self.parameters {
            for spelling in std::iter::once(spec.name.as_str()).chain(spec.alias.as_deref()) {
                if spelling.is_empty() {
                    return Err(SchemaError::ValidationError {
                        message: "Parameter names must not be empty".to_string(),
                    });
                }
                if seen.contains(&spelling) {
                    return Err(SchemaError::ValidationError {
                        message: format!("Parameter name '{}' is declared twice", spelling),
                    });
                }
                seen.push(spelling);
            }

            spec.parse_options()
                .validate()
                .map_err(|e| SchemaError::ValidationError {
                    message: format!("Parameter '{}': {}", spec.name, e),
                })?;
        }

        let collectors = self.parameters.iter().filter(|p| p.collect.is_some()).count();
        if collectors > 1 {
            return Err(SchemaError::ValidationError {
                message: "Only one parameter may collect loose values".to_string(),
            });
        }

        let mut ids: Vec<u32> = Vec::new();
        for task in &self.tasks {
            if ids.contains(&task.id) {
                return Err(SchemaError::ValidationError {
                    message: format!("Task id {} is declared twice", task.id),
                });
            }
            ids.push(task.id);

            let atoms = task
                .mandatory
                .iter()
                .chain(&task.at_least_one)
                .chain(&task.forbidden)
                .chain(&task.ignore);
            for atom in atoms {
                if !seen.contains(&atom.as_str()) {
                    return Err(SchemaError::ValidationError {
                        message: format!("Task '{}' refers to unknown parameter '{}'", task.name, atom),
                    });
                }
            }
        }

        Ok(())
    }

    /// Builds the parameter set and the task set described by the schema.
    pub fn build(&self) -> Result<(ParameterSet, TaskSet), SchemaError> {
        let mut set = ParameterSet::default();
        for spec in &self.parameters {
            let mut parameter = Parameter::new(&spec.name)?
                .with_constraint(spec.constraint)
                .with_options(spec.parse_options())?;
            if let Some(alias) = &spec.alias {
                parameter = parameter.with_alias(alias)?;
            }
            if let Some(print_name) = &spec.print_name {
                parameter.set_print_name(PrintName::Constant(print_name.clone()));
            }
            if let Some(help) = &spec.help {
                parameter.set_help(spec.arg.as_deref(), help);
            }
            if spec.expand_wildcard {
                parameter.set_wildcard_expander(
                    Some(&spec.wildcard_chars),
                    Arc::new(GlobExpander::new()),
                );
            }
            set.add_parameter(parameter)?;
        }

        let mut tasks = TaskSet::new();
        for spec in &self.tasks {
            tasks.add(TaskDefinition::from_groups(
                spec.id,
                &spec.name,
                spec.mandatory.clone(),
                spec.at_least_one.clone(),
                spec.forbidden.clone(),
                spec.ignore.clone(),
            )?)?;
        }

        Ok((set, tasks))
    }
}
