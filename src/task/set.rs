use std::fmt::Write;

use crate::error::{ParamSetError, Result};
use crate::set::ParameterSet;
use crate::task::{more_consistent, TaskDefinition};

/// Results of the last [`TaskSet::analyze`].
#[derive(Debug, Clone, PartialEq)]
struct Analysis {
    scores: Vec<f64>,
    consistent: Vec<usize>,
}

/// Ordered task definitions with cached consistency results.
#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    definitions: Vec<TaskDefinition>,
    analysis: Option<Analysis>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a definition and drops any previous analysis.
    pub fn add(&mut self, definition: TaskDefinition) -> Result<()> {
        if self.definitions.iter().any(|d| d.id() == definition.id()) {
            return Err(ParamSetError::InvalidArgument(format!(
                "task id {} is already in use",
                definition.id()
            )));
        }
        self.definitions.push(definition);
        self.analysis = None;
        Ok(())
    }

    /// Shorthand for [`TaskDefinition::new`] followed by [`add`](Self::add).
    pub fn add_task(
        &mut self,
        id: u32,
        name: &str,
        mandatory: &str,
        at_least_one: &str,
        forbidden: &str,
        ignore: &str,
    ) -> Result<()> {
        self.add(TaskDefinition::new(
            id,
            name,
            mandatory,
            at_least_one,
            forbidden,
            ignore,
        )?)
    }

    pub fn definitions(&self) -> &[TaskDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn is_analyzed(&self) -> bool {
        self.analysis.is_some()
    }

    /// Scores every definition against `set`.
    pub fn analyze(&mut self, set: &ParameterSet) -> Result<()> {
        if self.definitions.is_empty() {
            return Err(ParamSetError::NoTaskDefinitions);
        }

        let scores: Vec<f64> = self.definitions.iter().map(|d| d.consistency(set)).collect();
        let consistent: Vec<usize> = self
            .definitions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_consistent(set))
            .map(|(i, _)| i)
            .collect();

        for (definition, score) in self.definitions.iter().zip(&scores) {
            tracing::debug!(task = definition.id(), name = %definition.name(), score, "task analyzed");
        }

        self.analysis = Some(Analysis { scores, consistent });
        Ok(())
    }

    /// Scores of the last analysis, in definition order.
    pub fn scores(&self) -> Option<&[f64]> {
        self.analysis.as_ref().map(|a| a.scores.as_slice())
    }

    /// The single definition scoring exactly `1.0`.
    pub fn consistent_task(&self) -> Result<&TaskDefinition> {
        if self.definitions.is_empty() {
            return Err(ParamSetError::NoTaskDefinitions);
        }
        let analysis = self.analysis.as_ref().ok_or(ParamSetError::NotAnalyzed)?;

        match analysis.consistent.as_slice() {
            [] => Err(ParamSetError::ZeroConsistentTasks),
            [only] => {
                let task = &self.definitions[*only];
                tracing::info!(task = task.id(), name = %task.name(), "consistent task selected");
                Ok(task)
            }
            many => Err(ParamSetError::MultipleConsistentTasks {
                ids: many.iter().map(|&i| self.definitions[i].id()).collect(),
            }),
        }
    }

    /// Removes the values of every ignorable atom of `task` that is set.
    ///
    /// Returns the number of values removed.
    pub fn clean_ignored(&self, task: &TaskDefinition, set: &mut ParameterSet) -> usize {
        let mut removed = 0;
        for atom in task.ignore() {
            if let Some(parameter) = set.parameter_mut(atom) {
                removed += parameter.history().len();
                parameter.history_mut().clear();
            }
        }
        removed
    }

    /// Lists the best-scoring task and the tasks equally close to it, at
    /// most `limit` of them, each followed by its repair hints.
    pub fn suggestions_to_string(
        &self,
        set: &ParameterSet,
        limit: usize,
        epsilon: f64,
    ) -> Result<String> {
        if self.definitions.is_empty() {
            return Err(ParamSetError::NoTaskDefinitions);
        }
        let scores = self.scores().ok_or(ParamSetError::NotAnalyzed)?;

        let mut order: Vec<usize> = (0..self.definitions.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let best = &self.definitions[order[0]];
        let suggested = order
            .iter()
            .map(|&i| &self.definitions[i])
            .filter(|d| {
                d.id() == best.id()
                    || more_consistent(best, d, set, epsilon).map(TaskDefinition::id)
                        != Some(best.id())
            })
            .take(limit);

        let mut out = String::new();
        for task in suggested {
            let _ = write!(out, "Maybe you want to: {} {}", task.name(), task);
            out.push_str(&task.how_to_repair(set, "  "));
        }
        Ok(out)
    }
}
