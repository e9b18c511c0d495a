//! Command-line grammar of a single parameter.
//!
//! The options are orthogonal fields instead of a flag word; contradicting
//! combinations are rejected by [`ParseOptions::validate`].

use serde::{Deserialize, Serialize};

use crate::error::{ParamSetError, Result};

/// How many following tokens a flag consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Arity {
    /// Takes the next token only when it does not begin with `-`.
    #[default]
    Default,
    /// Never takes a value.
    NoValue,
    /// Takes exactly the next token, even if it looks like a flag.
    Value,
    /// Takes tokens until a break condition or the end of input.
    Sequence,
}

/// Conditions that stop a `Value` or `Sequence` parameter from consuming a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Breaks {
    /// Token is a known flag spelling (compared case-insensitively).
    pub on_known: bool,
    /// Token begins with `-`.
    pub on_dash: bool,
    /// Token is the end-of-arguments marker `--`.
    pub on_end_of_args: bool,
}

impl Breaks {
    pub fn any(&self) -> bool {
        self.on_known || self.on_dash || self.on_end_of_args
    }
}

/// Loose-value collection for a catch-all parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LooseCollect {
    /// Also collect unrecognised dash-prefixed tokens.
    pub dashes: bool,
    /// Everything after `--` is collected.
    pub after_end_of_args: bool,
    /// Store loose values one priority level below the parse priority.
    pub lower_priority: bool,
    /// Number of loose values stored at the collection priority; the rest
    /// go one level lower.
    pub limit: Option<usize>,
}

/// Per-parameter command-line grammar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub arity: Arity,
    pub breaks: Breaks,
    pub collect: Option<LooseCollect>,
    pub expand_wildcard: bool,
    /// The parameter can not be given as `-x`/`--name` on the command line.
    pub no_flag: bool,
    /// The parameter is never suggested as a typo correction.
    pub no_typos: bool,
}

impl ParseOptions {
    pub fn new(arity: Arity) -> Self {
        Self {
            arity,
            ..Self::default()
        }
    }

    pub fn break_on_known(mut self) -> Self {
        self.breaks.on_known = true;
        self
    }

    pub fn break_on_dash(mut self) -> Self {
        self.breaks.on_dash = true;
        self
    }

    pub fn stop_at_end_of_args(mut self) -> Self {
        self.breaks.on_end_of_args = true;
        self
    }

    pub fn collect(mut self, collect: LooseCollect) -> Self {
        self.collect = Some(collect);
        self
    }

    pub fn expand_wildcard(mut self) -> Self {
        self.expand_wildcard = true;
        self
    }

    pub fn no_flag(mut self) -> Self {
        self.no_flag = true;
        self
    }

    pub fn no_typos(mut self) -> Self {
        self.no_typos = true;
        self
    }

    /// Rejects option combinations that can not be honoured by the tokenizer.
    pub fn validate(&self) -> Result<()> {
        if self.breaks.any() && matches!(self.arity, Arity::Default | Arity::NoValue) {
            return Err(ParamSetError::InvalidCombination(format!(
                "break conditions require value or sequence arity, not {:?}",
                self.arity
            )));
        }

        if self.no_flag && self.collect.is_none() {
            return Err(ParamSetError::InvalidCombination(
                "a parameter without a flag must collect loose values".to_string(),
            ));
        }

        if let Some(LooseCollect { limit: Some(0), .. }) = self.collect {
            return Err(ParamSetError::InvalidCombination(
                "loose collection limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether `token` stops this parameter from consuming it.
    pub(crate) fn breaks_at(&self, token: &str, is_known: impl Fn(&str) -> bool) -> bool {
        (self.breaks.on_end_of_args && token == "--")
            || (self.breaks.on_dash && token.starts_with('-'))
            || (self.breaks.on_known && is_known(token))
    }
}
