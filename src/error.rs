//! Error taxonomy for the parameter engine.
//!
//! Typo and unknown tokens are not errors: they are recorded in the set's
//! bins and reported through [`crate::set::AddOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by value stores, parameters, sets and task analysis.
#[derive(Debug, Error)]
pub enum ParamSetError {
    /// Caller passed an argument the operation cannot work with.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Structurally malformed input, e.g. a bad definition string.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Parameter '{name}' not found")]
    ParameterNotFound { name: String },

    /// The filtered value list is non-empty but shorter than the index.
    #[error("Value not found for parameter '{name}'")]
    ValueNotFound { name: String },

    /// The parameter has no values at all.
    #[error("Parameter '{name}' has no values")]
    ParameterEmpty { name: String },

    #[error("Priority {priority} is larger than the allowed maximum {max}")]
    PriorityTooLarge { priority: u32, max: u32 },

    /// Wildcard expansion is enabled but nothing is configured to expand.
    #[error("Wildcard expansion is enabled for '{name}' but no expander is configured")]
    UnimplementedWildcard { name: String },

    #[error("Wildcard expansion failed for '{name}': {message}")]
    Wildcard { name: String, message: String },

    /// Parse options that contradict each other.
    #[error("Invalid parse option combination: {0}")]
    InvalidCombination(String),

    /// The value conversion hook rejected the raw text.
    #[error("Unable to convert value of '{name}': {message}")]
    Conversion { name: String, message: String },

    #[error("Parameter '{name}' has no alias")]
    AliasNotSpecified { name: String },

    /// Object extraction was requested for a value that failed a check.
    #[error("Value of '{name}' is invalid (format 0x{format:x}, content 0x{content:x})")]
    InvalidValue {
        name: String,
        format: u32,
        content: u32,
    },

    /// Caller-supplied object extractor failed.
    #[error("Unable to extract object from '{name}': {message}")]
    Extract { name: String, message: String },

    #[error("There are no consistent tasks")]
    ZeroConsistentTasks,

    #[error("There are multiple consistent tasks: {ids:?}")]
    MultipleConsistentTasks { ids: Vec<u32> },

    #[error("Task set has no task definitions")]
    NoTaskDefinitions,

    /// Task set was modified (or never analyzed) since the last analysis.
    #[error("Task set is not analyzed")]
    NotAnalyzed,

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading in-memory configuration text failed.
    #[error("Failed to read configuration text: {source}")]
    ReadText {
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = ParamSetError> = std::result::Result<T, E>;
