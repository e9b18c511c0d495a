use crate::error::{ParamSetError, Result};
use crate::value::{At, PrioritySelector, Value};

/// Insertion-ordered values of one parameter.
#[derive(Debug, Clone, Default)]
pub struct ValueHistory {
    /// Name used in error reports.
    label: String,
    values: Vec<Value>,
}

impl ValueHistory {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Appends a value at the end of the history.
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Builds and appends a value; fails only on an out-of-range priority.
    pub fn add(&mut self, text: Option<&str>, source: Option<&str>, priority: u32) -> Result<()> {
        self.push(Value::new(text, source, priority)?);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Values passing the source and priority filters, in insertion order.
    pub fn filtered<'a>(
        &'a self,
        source: Option<&'a str>,
        selector: PrioritySelector,
    ) -> impl Iterator<Item = &'a Value> + 'a {
        let bounds = self.bounds(source, selector);
        self.values
            .iter()
            .filter(move |v| v.matches_source(source) && selector.accepts(v.priority(), bounds))
    }

    pub fn count(&self, source: Option<&str>, selector: PrioritySelector) -> usize {
        self.filtered(source, selector).count()
    }

    pub fn get(&self, source: Option<&str>, selector: PrioritySelector, at: At) -> Result<&Value> {
        let index = self.locate(source, selector, at, false)?;
        Ok(&self.values[index])
    }

    /// Mutable access, used to re-mark a value's statuses after the fact.
    pub fn get_mut(
        &mut self,
        source: Option<&str>,
        selector: PrioritySelector,
        at: At,
    ) -> Result<&mut Value> {
        let index = self.locate(source, selector, at, false)?;
        Ok(&mut self.values[index])
    }

    /// Detaches exactly one matching value.
    pub fn remove(&mut self, source: Option<&str>, selector: PrioritySelector, at: At) -> Result<()> {
        self.pop(source, selector, at).map(|_| ())
    }

    /// Detaches and returns exactly one matching value.
    pub fn pop(&mut self, source: Option<&str>, selector: PrioritySelector, at: At) -> Result<Value> {
        let index = self.locate(source, selector, at, false)?;
        Ok(self.values.remove(index))
    }

    /// Like [`get`](Self::get), restricted to values that failed a check.
    pub fn invalid(&self, source: Option<&str>, selector: PrioritySelector, at: At) -> Result<&Value> {
        let index = self.locate(source, selector, at, true)?;
        Ok(&self.values[index])
    }

    pub fn invalid_count(&self, source: Option<&str>, selector: PrioritySelector) -> usize {
        self.filtered(source, selector).filter(|v| !v.is_valid()).count()
    }

    pub fn highest_priority(&self) -> Result<u32> {
        self.values
            .iter()
            .map(Value::priority)
            .max()
            .ok_or_else(|| self.empty())
    }

    pub fn lowest_priority(&self) -> Result<u32> {
        self.values
            .iter()
            .map(Value::priority)
            .min()
            .ok_or_else(|| self.empty())
    }

    /// The smallest priority level present that is strictly above `priority`.
    pub fn next_priority_above(&self, priority: u32) -> Result<u32> {
        if self.values.is_empty() {
            return Err(self.empty());
        }
        self.values
            .iter()
            .map(Value::priority)
            .filter(|&p| p > priority)
            .min()
            .ok_or_else(|| self.not_found())
    }

    /// Replaces the value at arena position `index` with `replacement`.
    pub(crate) fn splice_at(&mut self, index: usize, replacement: Vec<Value>) {
        self.values.splice(index..=index, replacement);
    }

    pub(crate) fn values(&self) -> &[Value] {
        &self.values
    }

    fn bounds(&self, source: Option<&str>, selector: PrioritySelector) -> Option<(u32, u32)> {
        if !selector.is_relative() {
            return None;
        }
        self.values
            .iter()
            .filter(|v| v.matches_source(source))
            .map(Value::priority)
            .fold(None, |acc, p| match acc {
                None => Some((p, p)),
                Some((low, high)) => Some((low.min(p), high.max(p))),
            })
    }

    /// Arena index of the `at`-th value passing the filters.
    fn locate(
        &self,
        source: Option<&str>,
        selector: PrioritySelector,
        at: At,
        invalid_only: bool,
    ) -> Result<usize> {
        if self.values.is_empty() {
            return Err(self.empty());
        }

        let bounds = self.bounds(source, selector);
        let matching: Vec<usize> = self
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.matches_source(source) && selector.accepts(v.priority(), bounds))
            .filter(|(_, v)| !invalid_only || !v.is_valid())
            .map(|(i, _)| i)
            .collect();

        at.resolve(matching.len())
            .map(|i| matching[i])
            .ok_or_else(|| self.not_found())
    }

    fn empty(&self) -> ParamSetError {
        ParamSetError::ParameterEmpty {
            name: self.label.clone(),
        }
    }

    fn not_found(&self) -> ParamSetError {
        ParamSetError::ValueNotFound {
            name: self.label.clone(),
        }
    }
}
