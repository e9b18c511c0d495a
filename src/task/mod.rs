//! Task definitions and selection of the task a populated set represents.
//!
//! A task is consistent when every mandatory atom is set, at least one atom
//! of a non-empty at-least-one group is set and no forbidden atom is set.

mod definition;
mod set;

pub use definition::{more_consistent, TaskDefinition};
pub use set::TaskSet;
