//! A named parameter: its value history plus the hooks and grammar that
//! govern how values get in.

mod controls;
pub mod grammar;
pub mod wildcard;

pub use controls::{CheckFn, Controls, ConvertFn, ObjectExtractor};
pub use grammar::{Arity, Breaks, LooseCollect, ParseOptions};
pub use wildcard::{GlobExpander, WildcardExpander, DEFAULT_WILDCARD_CHARS};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ParamSetError, Result};
use crate::value::{Value, ValueHistory};

/// How many values a parameter may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Constraint {
    #[serde(rename = "multiple")]
    Unconstrained,
    #[serde(rename = "single")]
    SingleValue,
    #[default]
    #[serde(rename = "single-per-priority")]
    SingleValuePerPriority,
}

/// A broken multiplicity rule found by [`Parameter::check_constraints`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    DuplicateValues,
    DuplicateValuesAtPriority(u32),
}

/// Formatter used to render a parameter name in messages and help.
pub type PrintNameFn = Arc<dyn Fn(&Parameter) -> String + Send + Sync>;

/// How a name or alias is rendered.
#[derive(Clone, Default)]
pub enum PrintName {
    /// `-x` for one-character names, `--name` otherwise.
    #[default]
    Default,
    Constant(String),
    Formatter(PrintNameFn),
}

impl fmt::Debug for PrintName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintName::Default => f.write_str("Default"),
            PrintName::Constant(s) => f.debug_tuple("Constant").field(s).finish(),
            PrintName::Formatter(_) => f.write_str("Formatter"),
        }
    }
}

/// Help entry: `<print name> [<arg>] - <text>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpText {
    pub arg: Option<String>,
    pub text: String,
}

/// Renders a name the default way.
pub fn default_print_name(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{}", name)
    } else {
        format!("--{}", name)
    }
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Clone)]
pub(crate) struct WildcardConfig {
    pub(crate) chars: String,
    pub(crate) expander: Option<Arc<dyn WildcardExpander>>,
}

impl Default for WildcardConfig {
    fn default() -> Self {
        Self {
            chars: DEFAULT_WILDCARD_CHARS.to_string(),
            expander: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    alias: Option<String>,
    constraint: Constraint,
    history: ValueHistory,
    controls: Controls,
    options: ParseOptions,
    print_name: PrintName,
    alias_print_name: PrintName,
    help: Option<HelpText>,
    wildcard: WildcardConfig,
}

impl fmt::Debug for WildcardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WildcardConfig")
            .field("chars", &self.chars)
            .field("expander", &self.expander.is_some())
            .finish()
    }
}

impl Parameter {
    pub fn new(name: &str) -> Result<Self> {
        if !is_valid_name(name) {
            return Err(ParamSetError::InvalidArgument(format!(
                "invalid parameter name '{}'",
                name
            )));
        }

        Ok(Self {
            name: name.to_string(),
            alias: None,
            constraint: Constraint::default(),
            history: ValueHistory::new(name),
            controls: Controls::default(),
            options: ParseOptions::default(),
            print_name: PrintName::Default,
            alias_print_name: PrintName::Default,
            help: None,
            wildcard: WildcardConfig::default(),
        })
    }

    pub fn with_alias(mut self, alias: &str) -> Result<Self> {
        if !is_valid_name(alias) {
            return Err(ParamSetError::InvalidArgument(format!(
                "invalid alias '{}' for '{}'",
                alias, self.name
            )));
        }
        self.alias = Some(alias.to_string());
        Ok(self)
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn with_controls(mut self, controls: Controls) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_options(mut self, options: ParseOptions) -> Result<Self> {
        self.set_options(options)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn constraint(&self) -> Constraint {
        self.constraint
    }

    pub fn history(&self) -> &ValueHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ValueHistory {
        &mut self.history
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn help(&self) -> Option<&HelpText> {
        self.help.as_ref()
    }

    /// True when the name or the alias equals `token`.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.alias.as_deref() == Some(token)
    }

    pub fn is_set(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn set_controls(&mut self, controls: Controls) {
        self.controls = controls;
    }

    /// Replaces the grammar; on error the previous grammar is kept.
    pub fn set_options(&mut self, options: ParseOptions) -> Result<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    pub fn set_help(&mut self, arg: Option<&str>, text: &str) {
        self.help = Some(HelpText {
            arg: arg.map(str::to_string),
            text: text.to_string(),
        });
    }

    pub fn set_print_name(&mut self, print_name: PrintName) {
        self.print_name = print_name;
    }

    pub fn set_alias_print_name(&mut self, print_name: PrintName) -> Result<()> {
        if self.alias.is_none() {
            return Err(ParamSetError::AliasNotSpecified {
                name: self.name.clone(),
            });
        }
        self.alias_print_name = print_name;
        Ok(())
    }

    /// Configures wildcard expansion. `chars == None` keeps `?*`.
    pub fn set_wildcard_expander(
        &mut self,
        chars: Option<&str>,
        expander: Arc<dyn WildcardExpander>,
    ) {
        self.wildcard.chars = chars.unwrap_or(DEFAULT_WILDCARD_CHARS).to_string();
        self.wildcard.expander = Some(expander);
    }

    pub fn print_name(&self) -> String {
        self.render(&self.print_name, &self.name)
    }

    pub fn alias_print_name(&self) -> Result<String> {
        match &self.alias {
            Some(alias) => Ok(self.render(&self.alias_print_name, alias)),
            None => Err(ParamSetError::AliasNotSpecified {
                name: self.name.clone(),
            }),
        }
    }

    fn render(&self, print_name: &PrintName, name: &str) -> String {
        match print_name {
            PrintName::Default => default_print_name(name),
            PrintName::Constant(s) => s.clone(),
            PrintName::Formatter(f) => f(self),
        }
    }

    /// Converts, checks and stores a raw value.
    ///
    /// A value failing its checks is still stored with non-zero statuses.
    pub fn add_value(&mut self, raw: Option<&str>, source: Option<&str>, priority: u32) -> Result<()> {
        let converted = match (raw, &self.controls.convert) {
            (Some(raw), Some(convert)) => {
                convert(raw).map_err(|message| ParamSetError::Conversion {
                    name: self.name.clone(),
                    message,
                })?
            }
            _ => None,
        };
        let text = converted.as_deref().or(raw);

        let mut value = Value::new(text, source, priority)?;
        let (format, content) = self.controls.statuses(text);
        value.set_format_status(format);
        value.set_content_status(content);
        self.history.push(value);
        Ok(())
    }

    /// Scans the whole history for broken multiplicity rules.
    pub fn check_constraints(&self) -> Vec<ConstraintViolation> {
        match self.constraint {
            Constraint::Unconstrained => Vec::new(),
            Constraint::SingleValue => {
                if self.history.len() > 1 {
                    vec![ConstraintViolation::DuplicateValues]
                } else {
                    Vec::new()
                }
            }
            Constraint::SingleValuePerPriority => {
                let mut levels: Vec<u32> = self.history.iter().map(Value::priority).collect();
                levels.sort_unstable();
                let mut violations: Vec<ConstraintViolation> = levels
                    .windows(2)
                    .filter(|w| w[0] == w[1])
                    .map(|w| ConstraintViolation::DuplicateValuesAtPriority(w[0]))
                    .collect();
                violations.dedup();
                violations
            }
        }
    }

    /// Whether any value from history position `from` on contains a
    /// wildcard character.
    pub(crate) fn needs_expansion_from(&self, from: usize) -> bool {
        self.options.expand_wildcard
            && self
                .history
                .values()
                .get(from..)
                .is_some_and(|added| added.iter().any(|v| self.has_wildcard(v)))
    }

    /// Replaces every value at `source`/`priority` containing a wildcard
    /// character with the expander output, in place.
    ///
    /// Returns the number of values produced by the expander.
    pub fn expand_wildcards(&mut self, source: Option<&str>, priority: u32) -> Result<usize> {
        self.expand_selected(0, |v| v.matches_source(source) && v.priority() == priority)
    }

    /// Expands the values stored at history position `from` or later,
    /// whatever their source and priority.
    pub(crate) fn expand_wildcards_from(&mut self, from: usize) -> Result<usize> {
        self.expand_selected(from, |_| true)
    }

    fn expand_selected<F>(&mut self, from: usize, select: F) -> Result<usize>
    where
        F: Fn(&Value) -> bool,
    {
        let expander = match &self.wildcard.expander {
            Some(expander) => Arc::clone(expander),
            None => {
                return Err(ParamSetError::UnimplementedWildcard {
                    name: self.name.clone(),
                })
            }
        };

        let mut produced = 0;
        let mut index = from;
        while index < self.history.len() {
            let value = &self.history.values()[index];
            let selected = select(value) && self.has_wildcard(value);
            if !selected {
                index += 1;
                continue;
            }

            let pattern = value.text().unwrap_or_default().to_string();
            let matches = expander
                .expand(&pattern)
                .map_err(|message| ParamSetError::Wildcard {
                    name: self.name.clone(),
                    message,
                })?;
            tracing::debug!(
                parameter = %self.name,
                pattern = %pattern,
                matches = matches.len(),
                "expanded wildcard"
            );

            let replacement: Vec<Value> = matches
                .iter()
                .map(|text| {
                    let mut expanded = value.with_text(text);
                    let (format, content) = self.controls.statuses(Some(text));
                    expanded.set_format_status(format);
                    expanded.set_content_status(content);
                    expanded
                })
                .collect();
            let count = replacement.len();
            self.history.splice_at(index, replacement);
            produced += count;
            index += count;
        }

        Ok(produced)
    }

    fn has_wildcard(&self, value: &Value) -> bool {
        value
            .text()
            .is_some_and(|text| text.chars().any(|c| self.wildcard.chars.contains(c)))
    }
}
