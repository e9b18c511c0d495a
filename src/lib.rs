//! Declarative command-line and configuration parameter engine.
//!
//! A [`ParameterSet`] holds named parameters, each with a prioritised,
//! source-tagged value history. Values arrive from command lines
//! ([`ParameterSet::parse_cmd`]), configuration files
//! ([`ParameterSet::read_from_file`]) or direct [`ParameterSet::add`] calls.
//! A [`TaskSet`] then decides which task the populated set represents.

pub mod classifier;
mod cmdline;
pub mod conf_file;
pub mod error;
pub mod parameter;
pub mod schema;
pub mod set;
pub mod task;
pub mod value;

pub use error::{ParamSetError, Result};
pub use parameter::{
    Arity, Constraint, ConstraintViolation, Controls, GlobExpander, LooseCollect,
    ObjectExtractor, Parameter, ParseOptions, PrintName, WildcardExpander,
};
pub use schema::{Schema, SchemaError};
pub use set::{AddOutcome, ParameterSet, ValueAttributes};
pub use task::{more_consistent, TaskDefinition, TaskSet};
pub use value::{At, PrioritySelector, Value, ValueHistory, PRIORITY_BASE, PRIORITY_ROOF};
