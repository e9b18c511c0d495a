//! Human-readable reports and a serializable snapshot of a set.

use std::fmt::Write;

use serde::Serialize;

use crate::parameter::ConstraintViolation;
use crate::set::ParameterSet;
use crate::value::{PrioritySelector, Value};

/// An unrecognised name close to one or more known names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypoReport {
    pub offered: String,
    pub suggestions: Vec<String>,
    pub value: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownReport {
    pub offered: String,
    pub value: Option<String>,
    pub source: Option<String>,
}

/// A configuration line that could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    /// 1-based line number.
    pub row: usize,
    pub excerpt: String,
    pub message: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterSnapshot {
    pub name: String,
    pub alias: Option<String>,
    pub values: Vec<Value>,
}

/// Every stored value and every recorded problem.
#[derive(Debug, Clone, Serialize)]
pub struct SetSnapshot {
    pub parameters: Vec<ParameterSnapshot>,
    pub typos: Vec<TypoReport>,
    pub unknowns: Vec<UnknownReport>,
    pub syntax_errors: Vec<SyntaxError>,
}

impl ParameterSet {
    /// One line per suggestion: `Did You mean '<name>' instead of '<token>'.`
    pub fn typos_to_string(&self, prefix: &str) -> String {
        let mut out = String::new();
        for typo in self.typos() {
            for suggestion in &typo.suggestions {
                let _ = writeln!(
                    out,
                    "{}Did You mean '{}' instead of '{}'.",
                    prefix, suggestion, typo.offered
                );
            }
        }
        out
    }

    pub fn unknowns_to_string(&self, prefix: &str) -> String {
        let mut out = String::new();
        for unknown in self.unknowns() {
            let _ = writeln!(out, "{}Unknown parameter '{}'.", prefix, unknown.offered);
        }
        out
    }

    /// One line per failed check of every stored value.
    ///
    /// `describe` turns a check error code into text; without it the code is
    /// printed in hex.
    pub fn invalid_to_string(&self, prefix: &str, describe: Option<&dyn Fn(u32) -> String>) -> String {
        let reason = |code: u32| match describe {
            Some(describe) => describe(code),
            None => format!("error 0x{:x}", code),
        };

        let mut out = String::new();
        for parameter in self.parameters() {
            let invalid = parameter
                .history()
                .filtered(None, PrioritySelector::Any)
                .filter(|v| !v.is_valid());
            for value in invalid {
                let from = value
                    .source()
                    .map(|s| format!(" (from {})", s))
                    .unwrap_or_default();
                for code in [value.format_status(), value.content_status()] {
                    if code == 0 {
                        continue;
                    }
                    let _ = writeln!(
                        out,
                        "{}{} '{}': {}.{}",
                        prefix,
                        parameter.print_name(),
                        value.text().unwrap_or_default(),
                        reason(code),
                        from
                    );
                }
            }
        }
        out
    }

    pub fn constraint_errors_to_string(&self, prefix: &str) -> String {
        let mut out = String::new();
        for parameter in self.parameters() {
            for violation in parameter.check_constraints() {
                let _ = match violation {
                    ConstraintViolation::DuplicateValues => writeln!(
                        out,
                        "{}Duplicate values are not allowed for '{}'.",
                        prefix,
                        parameter.print_name()
                    ),
                    ConstraintViolation::DuplicateValuesAtPriority(priority) => writeln!(
                        out,
                        "{}Duplicate values are not allowed for '{}' within priority level {}.",
                        prefix,
                        parameter.print_name(),
                        priority
                    ),
                };
            }
        }
        out
    }

    pub fn syntax_errors_to_string(&self, prefix: &str) -> String {
        let mut out = String::new();
        for error in self.syntax_errors() {
            let _ = writeln!(
                out,
                "{}Syntax error at line {} ('{}'): {}.",
                prefix, error.row, error.excerpt, error.message
            );
        }
        out
    }

    pub fn snapshot(&self) -> SetSnapshot {
        SetSnapshot {
            parameters: self
                .parameters()
                .iter()
                .map(|p| ParameterSnapshot {
                    name: p.name().to_string(),
                    alias: p.alias().map(str::to_string),
                    values: p.history().iter().cloned().collect(),
                })
                .collect(),
            typos: self.typos().to_vec(),
            unknowns: self.unknowns().to_vec(),
            syntax_errors: self.syntax_errors().to_vec(),
        }
    }
}
