//! The parameter set: name/alias lookup, value insertion with typo and
//! unknown classification, and aggregate status queries.

mod help;
pub mod names;
mod report;

pub use report::{ParameterSnapshot, SetSnapshot, SyntaxError, TypoReport, UnknownReport};

use std::sync::Arc;

use serde::Serialize;

use crate::classifier::{self, Classification};
use crate::error::{ParamSetError, Result};
use crate::parameter::{
    Controls, ObjectExtractor, Parameter, ParseOptions, PrintName, WildcardExpander,
};
use crate::value::{At, PrioritySelector, Value};

/// What [`ParameterSet::add`] did with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Stored under a known parameter.
    Stored,
    /// Name unknown but close to a known one; recorded as a typo.
    Typo,
    /// Name unknown; recorded in the unknown bin.
    Unknown,
}

/// Provenance and validity of a single stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueAttributes {
    pub source: Option<String>,
    pub priority: u32,
    pub format_status: u32,
    pub content_status: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
    typos: Vec<TypoReport>,
    unknowns: Vec<UnknownReport>,
    syntax_errors: Vec<SyntaxError>,
}

impl ParameterSet {
    /// Creates a set from a definition string such as `"{h|help}{file}*"`.
    pub fn new(definition: &str) -> Result<Self> {
        let mut set = Self::default();
        for def in names::parse_definition(definition)? {
            let mut parameter = Parameter::new(&def.name)?.with_constraint(def.constraint);
            if let Some(alias) = &def.alias {
                parameter = parameter.with_alias(alias)?;
            }
            set.add_parameter(parameter)?;
        }
        Ok(set)
    }

    /// Registers a parameter; names and aliases must be unique across both.
    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<()> {
        let spellings = std::iter::once(parameter.name()).chain(parameter.alias());
        for spelling in spellings {
            if self.position(spelling).is_some() {
                return Err(ParamSetError::InvalidArgument(format!(
                    "parameter name '{}' is already in use",
                    spelling
                )));
            }
        }
        if parameter.alias() == Some(parameter.name()) {
            return Err(ParamSetError::InvalidArgument(format!(
                "alias of '{}' repeats its name",
                parameter.name()
            )));
        }
        if parameter.options().collect.is_some() && self.collector().is_some() {
            return Err(ParamSetError::InvalidCombination(
                "only one parameter may collect loose values".to_string(),
            ));
        }
        self.parameters.push(parameter);
        Ok(())
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Looks a parameter up by name or alias.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.position(name).map(|i| &self.parameters[i])
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.position(name).map(move |i| &mut self.parameters[i])
    }

    pub fn typos(&self) -> &[TypoReport] {
        &self.typos
    }

    pub fn unknowns(&self) -> &[UnknownReport] {
        &self.unknowns
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        &self.syntax_errors
    }

    pub fn add_control(&mut self, names: &str, controls: Controls) -> Result<()> {
        for i in self.resolve(names)? {
            self.parameters[i].set_controls(controls.clone());
        }
        Ok(())
    }

    /// Sets the command-line grammar; nothing changes if any step fails.
    pub fn set_parse_options(&mut self, names: &str, options: ParseOptions) -> Result<()> {
        options.validate()?;
        let targets = self.resolve(names)?;

        if options.collect.is_some() {
            let foreign = self.collector().filter(|c| !targets.contains(c));
            if targets.len() > 1 || foreign.is_some() {
                return Err(ParamSetError::InvalidCombination(
                    "only one parameter may collect loose values".to_string(),
                ));
            }
        }

        for i in targets {
            self.parameters[i].set_options(options.clone())?;
        }
        Ok(())
    }

    pub fn set_print_name(&mut self, names: &str, print_name: PrintName) -> Result<()> {
        for i in self.resolve(names)? {
            self.parameters[i].set_print_name(print_name.clone());
        }
        Ok(())
    }

    pub fn set_alias_print_name(&mut self, names: &str, print_name: PrintName) -> Result<()> {
        for i in self.resolve(names)? {
            self.parameters[i].set_alias_print_name(print_name.clone())?;
        }
        Ok(())
    }

    pub fn set_help_text(&mut self, names: &str, arg: Option<&str>, text: &str) -> Result<()> {
        for i in self.resolve(names)? {
            self.parameters[i].set_help(arg, text);
        }
        Ok(())
    }

    pub fn set_wildcard_expander(
        &mut self,
        names: &str,
        chars: Option<&str>,
        expander: Arc<dyn WildcardExpander>,
    ) -> Result<()> {
        for i in self.resolve(names)? {
            self.parameters[i].set_wildcard_expander(chars, Arc::clone(&expander));
        }
        Ok(())
    }

    pub fn print_name(&self, name: &str) -> Result<String> {
        Ok(self.find(name)?.print_name())
    }

    pub fn alias_print_name(&self, name: &str) -> Result<String> {
        self.find(name)?.alias_print_name()
    }

    /// Adds a value under `name`, or records the name as a typo or unknown.
    pub fn add(
        &mut self,
        name: &str,
        value: Option<&str>,
        source: Option<&str>,
        priority: u32,
    ) -> Result<AddOutcome> {
        if name.trim().is_empty() {
            return Err(ParamSetError::InvalidArgument(
                "parameter name must not be empty".to_string(),
            ));
        }
        if let Some(i) = self.position(name) {
            self.parameters[i].add_value(value, source, priority)?;
            return Ok(AddOutcome::Stored);
        }
        Ok(self.record_unrecognised(name, value, source))
    }

    /// Classifies an unrecognised name and appends it to the matching bin.
    pub(crate) fn record_unrecognised(
        &mut self,
        name: &str,
        value: Option<&str>,
        source: Option<&str>,
    ) -> AddOutcome {
        match classifier::classify(name, self.typo_candidates()) {
            Classification::Typo(suggestions) => {
                tracing::debug!(token = %name, suggestions = ?suggestions, "classified as typo");
                self.typos.push(TypoReport {
                    offered: name.to_string(),
                    suggestions,
                    value: value.map(str::to_string),
                    source: source.map(str::to_string),
                });
                AddOutcome::Typo
            }
            Classification::Unknown => {
                self.record_unknown(name, value, source);
                AddOutcome::Unknown
            }
        }
    }

    /// Appends straight to the unknown bin, skipping typo analysis.
    pub(crate) fn record_unknown(&mut self, name: &str, value: Option<&str>, source: Option<&str>) {
        tracing::debug!(token = %name, "classified as unknown");
        self.unknowns.push(UnknownReport {
            offered: name.to_string(),
            value: value.map(str::to_string),
            source: source.map(str::to_string),
        });
    }

    pub(crate) fn record_syntax_error(&mut self, error: SyntaxError) {
        tracing::warn!(row = error.row, excerpt = %error.excerpt, "syntax error");
        self.syntax_errors.push(error);
    }

    /// The `at`-th value across every listed parameter, in list order.
    pub fn get_value(
        &self,
        names: &str,
        source: Option<&str>,
        selector: PrioritySelector,
        at: At,
    ) -> Result<&Value> {
        let (i, local) = self.locate(names, source, selector, at)?;
        self.parameters[i].history().get(source, selector, At::Nth(local))
    }

    /// String value of the selected entry; `None` for a flag without argument.
    pub fn get_str(
        &self,
        names: &str,
        source: Option<&str>,
        selector: PrioritySelector,
        at: At,
    ) -> Result<Option<&str>> {
        Ok(self.get_value(names, source, selector, at)?.text())
    }

    /// Builds a caller object from the selected value.
    ///
    /// Fails with [`ParamSetError::InvalidValue`] when the value did not pass
    /// its checks; extractor errors are passed through as
    /// [`ParamSetError::Extract`].
    pub fn get_obj<C, E>(
        &self,
        names: &str,
        source: Option<&str>,
        selector: PrioritySelector,
        at: At,
        extractor: &E,
        ctx: &C,
    ) -> Result<E::Output>
    where
        C: ?Sized,
        E: ObjectExtractor<C>,
    {
        let (i, local) = self.locate(names, source, selector, at)?;
        let parameter = &self.parameters[i];
        let value = parameter.history().get(source, selector, At::Nth(local))?;

        if !value.is_valid() {
            return Err(ParamSetError::InvalidValue {
                name: parameter.name().to_string(),
                format: value.format_status(),
                content: value.content_status(),
            });
        }

        extractor
            .extract(self, ctx, value.text())
            .map_err(|message| ParamSetError::Extract {
                name: parameter.name().to_string(),
                message,
            })
    }

    pub fn get_attributes(
        &self,
        names: &str,
        source: Option<&str>,
        selector: PrioritySelector,
        at: At,
    ) -> Result<ValueAttributes> {
        let value = self.get_value(names, source, selector, at)?;
        Ok(ValueAttributes {
            source: value.source().map(str::to_string),
            priority: value.priority(),
            format_status: value.format_status(),
            content_status: value.content_status(),
        })
    }

    pub fn value_count(
        &self,
        names: &str,
        source: Option<&str>,
        selector: PrioritySelector,
    ) -> Result<usize> {
        Ok(self
            .resolve(names)?
            .into_iter()
            .map(|i| self.parameters[i].history().count(source, selector))
            .sum())
    }

    /// Removes every value of the listed parameters.
    pub fn clear_parameter(&mut self, names: &str) -> Result<()> {
        for i in self.resolve(names)? {
            self.parameters[i].history_mut().clear();
        }
        Ok(())
    }

    /// Removes the single value that [`get_value`](Self::get_value) would return.
    pub fn clear_value(
        &mut self,
        names: &str,
        source: Option<&str>,
        selector: PrioritySelector,
        at: At,
    ) -> Result<()> {
        let (i, local) = self.locate(names, source, selector, at)?;
        self.parameters[i]
            .history_mut()
            .remove(source, selector, At::Nth(local))
    }

    /// True when every listed parameter exists and holds a value.
    pub fn is_set(&self, names: &str) -> bool {
        match self.resolve(names) {
            Ok(indexes) => indexes.iter().all(|&i| self.parameters[i].is_set()),
            Err(_) => false,
        }
    }

    /// True when at least one listed parameter exists and holds a value.
    pub fn is_one_of_set(&self, names: &str) -> bool {
        names::split_names(names)
            .map(|list| {
                list.iter()
                    .any(|name| self.parameter(name).is_some_and(Parameter::is_set))
            })
            .unwrap_or(false)
    }

    /// True when no stored value failed a format or content check.
    pub fn is_format_ok(&self) -> bool {
        self.parameters
            .iter()
            .all(|p| p.history().invalid_count(None, PrioritySelector::Any) == 0)
    }

    pub fn is_constraint_violation(&self) -> bool {
        self.parameters
            .iter()
            .any(|p| !p.check_constraints().is_empty())
    }

    pub fn is_typo_failure(&self) -> bool {
        !self.typos.is_empty()
    }

    pub fn is_unknown(&self) -> bool {
        !self.unknowns.is_empty()
    }

    pub fn is_syntax_error(&self) -> bool {
        !self.syntax_errors.is_empty()
    }

    /// Copies every value of `src` whose parameter is also known here.
    ///
    /// Values go through this set's hooks; the two sets stay independent.
    pub fn include(&mut self, src: &ParameterSet) -> Result<()> {
        for source_param in &src.parameters {
            let Some(i) = self.position(source_param.name()) else {
                continue;
            };
            for value in source_param.history().iter() {
                self.parameters[i].add_value(value.text(), value.source(), value.priority())?;
            }
        }
        Ok(())
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.matches(name))
    }

    pub(crate) fn parameter_at_mut(&mut self, index: usize) -> &mut Parameter {
        &mut self.parameters[index]
    }

    /// Index of the parameter collecting loose values, if any.
    pub(crate) fn collector(&self) -> Option<usize> {
        self.parameters
            .iter()
            .position(|p| p.options().collect.is_some())
    }

    fn find(&self, name: &str) -> Result<&Parameter> {
        self.parameter(name)
            .ok_or_else(|| ParamSetError::ParameterNotFound {
                name: name.to_string(),
            })
    }

    /// Names and aliases that may be suggested as typo corrections.
    fn typo_candidates(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| !p.options().no_typos)
            .flat_map(|p| std::iter::once(p.name()).chain(p.alias()))
            .collect()
    }

    pub(crate) fn resolve(&self, names: &str) -> Result<Vec<usize>> {
        names::split_names(names)?
            .iter()
            .map(|name| {
                self.position(name)
                    .ok_or_else(|| ParamSetError::ParameterNotFound { name: name.clone() })
            })
            .collect()
    }

    /// Maps a position over the chained filtered values of `names` to
    /// `(parameter index, index within that parameter's filtered values)`.
    fn locate(
        &self,
        names: &str,
        source: Option<&str>,
        selector: PrioritySelector,
        at: At,
    ) -> Result<(usize, usize)> {
        let indexes = self.resolve(names)?;
        if let [single] = indexes.as_slice() {
            let history = self.parameters[*single].history();
            let len = history.count(source, selector);
            return match at.resolve(len) {
                Some(local) => Ok((*single, local)),
                None => history.get(source, selector, at).map(|_| (*single, 0)),
            };
        }

        let chain: Vec<(usize, usize)> = indexes
            .iter()
            .flat_map(|&i| {
                let n = self.parameters[i].history().count(source, selector);
                (0..n).map(move |local| (i, local))
            })
            .collect();

        if let Some(pos) = at.resolve(chain.len()) {
            return Ok(chain[pos]);
        }

        let all_empty = indexes.iter().all(|&i| !self.parameters[i].is_set());
        if all_empty {
            Err(ParamSetError::ParameterEmpty {
                name: names.to_string(),
            })
        } else {
            Err(ParamSetError::ValueNotFound {
                name: names.to_string(),
            })
        }
    }
}
