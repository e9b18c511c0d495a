use serde::{Deserialize, Serialize};

use crate::parameter::{Arity, Constraint, LooseCollect, ParseOptions, DEFAULT_WILDCARD_CHARS};

/// Root schema container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, rename = "parameter")]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskSpec>,
}

/// One `[[parameter]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    /// "multiple", "single" or "single-per-priority" (default).
    #[serde(default)]
    pub constraint: Constraint,
    /// "default", "no-value", "value" or "sequence".
    #[serde(default)]
    pub arity: Arity,
    #[serde(default)]
    pub break_on_known: bool,
    #[serde(default)]
    pub break_on_dash: bool,
    #[serde(default)]
    pub stop_at_end_of_args: bool,
    /// Present when the parameter collects loose values.
    #[serde(default)]
    pub collect: Option<LooseCollect>,
    #[serde(default)]
    pub expand_wildcard: bool,
    #[serde(default = "default_wildcard_chars")]
    pub wildcard_chars: String,
    #[serde(default)]
    pub no_flag: bool,
    #[serde(default)]
    pub no_typos: bool,
    /// Constant print name overriding `-x`/`--name`.
    #[serde(default)]
    pub print_name: Option<String>,
    /// Argument placeholder shown in help.
    #[serde(default)]
    pub arg: Option<String>,
    #[serde(default)]
    pub help: Option<String>,
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub mandatory: Vec<String>,
    #[serde(default)]
    pub at_least_one: Vec<String>,
    #[serde(default)]
    pub forbidden: Vec<String>,
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_wildcard_chars() -> String {
    DEFAULT_WILDCARD_CHARS.to_string()
}

impl ParameterSpec {
    pub fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::new(self.arity);
        options.breaks.on_known = self.break_on_known;
        options.breaks.on_dash = self.break_on_dash;
        options.breaks.on_end_of_args = self.stop_at_end_of_args;
        options.collect = self.collect;
        options.expand_wildcard = self.expand_wildcard;
        options.no_flag = self.no_flag;
        options.no_typos = self.no_typos;
        options
    }
}
