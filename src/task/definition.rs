use std::fmt::{self, Write};

use crate::error::{ParamSetError, Result};
use crate::parameter::default_print_name;
use crate::set::{names, ParameterSet};

/// Mandatory, at-least-one, forbidden and ignorable parameter groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    id: u32,
    name: String,
    mandatory: Vec<String>,
    at_least_one: Vec<String>,
    forbidden: Vec<String>,
    ignore: Vec<String>,
}

fn atoms(list: &str) -> Result<Vec<String>> {
    if list.trim().is_empty() {
        Ok(Vec::new())
    } else {
        names::split_names(list)
    }
}

impl TaskDefinition {
    /// Groups are name lists (`"a,b"` or `"{a}{b}"`); an empty string is an
    /// empty group.
    pub fn new(
        id: u32,
        name: &str,
        mandatory: &str,
        at_least_one: &str,
        forbidden: &str,
        ignore: &str,
    ) -> Result<Self> {
        Self::from_groups(
            id,
            name,
            atoms(mandatory)?,
            atoms(at_least_one)?,
            atoms(forbidden)?,
            atoms(ignore)?,
        )
    }

    pub fn from_groups(
        id: u32,
        name: &str,
        mandatory: Vec<String>,
        at_least_one: Vec<String>,
        forbidden: Vec<String>,
        ignore: Vec<String>,
    ) -> Result<Self> {
        if mandatory.is_empty() && at_least_one.is_empty() {
            return Err(ParamSetError::InvalidArgument(format!(
                "task {} ('{}') has neither mandatory nor at-least-one atoms",
                id, name
            )));
        }

        Ok(Self {
            id,
            name: name.to_string(),
            mandatory,
            at_least_one,
            forbidden,
            ignore,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mandatory(&self) -> &[String] {
        &self.mandatory
    }

    pub fn at_least_one(&self) -> &[String] {
        &self.at_least_one
    }

    pub fn forbidden(&self) -> &[String] {
        &self.forbidden
    }

    pub fn ignore(&self) -> &[String] {
        &self.ignore
    }

    /// `(S_man + S_atl - S_forb, M + max(S_atl, 1) if the at-least-one group exists)`.
    fn tally(&self, set: &ParameterSet) -> (i64, i64) {
        let count = |group: &[String]| group.iter().filter(|a| set.is_set(a)).count() as i64;
        let set_mandatory = count(&self.mandatory);
        let set_at_least = count(&self.at_least_one);
        let set_forbidden = count(&self.forbidden);

        let at_least_denominator = if self.at_least_one.is_empty() {
            0
        } else {
            set_at_least.max(1)
        };
        (
            set_mandatory + set_at_least - set_forbidden,
            self.mandatory.len() as i64 + at_least_denominator,
        )
    }

    /// Consistency score; exactly `1.0` for a consistent task.
    pub fn consistency(&self, set: &ParameterSet) -> f64 {
        let (numerator, denominator) = self.tally(set);
        numerator as f64 / denominator as f64
    }

    pub fn is_consistent(&self, set: &ParameterSet) -> bool {
        let (numerator, denominator) = self.tally(set);
        numerator == denominator
    }

    /// Set mandatory and at-least-one atoms.
    fn satisfied(&self, set: &ParameterSet) -> usize {
        self.mandatory
            .iter()
            .chain(&self.at_least_one)
            .filter(|a| set.is_set(a))
            .count()
    }

    /// Hints for every unsatisfied group, one line each.
    pub fn how_to_repair(&self, set: &ParameterSet, prefix: &str) -> String {
        let mut out = String::new();

        let missing: Vec<&String> = self.mandatory.iter().filter(|a| !set.is_set(a)).collect();
        if !missing.is_empty() {
            let _ = writeln!(
                out,
                "{}You have to define flag(s) {}.",
                prefix,
                quoted_list(set, missing)
            );
        }

        if !self.at_least_one.is_empty() && !self.at_least_one.iter().any(|a| set.is_set(a)) {
            let _ = writeln!(
                out,
                "{}You have to define at least one of the flag(s) {}.",
                prefix,
                quoted_list(set, &self.at_least_one)
            );
        }

        let used: Vec<&String> = self.forbidden.iter().filter(|a| set.is_set(a)).collect();
        if !used.is_empty() {
            let _ = writeln!(
                out,
                "{}You must not use flag(s) {}.",
                prefix,
                quoted_list(set, used)
            );
        }

        out
    }

    /// Warning listing the ignorable atoms that are set; empty if none.
    pub fn ignored_to_string(&self, set: &ParameterSet, prefix: &str) -> String {
        let ignored: Vec<&String> = self.ignore.iter().filter(|a| set.is_set(a)).collect();
        if ignored.is_empty() {
            return String::new();
        }
        format!(
            "{}Ignoring following flag(s) {}.\n",
            prefix,
            quoted_list(set, ignored)
        )
    }
}

/// `'-a', '--bb'` using the set's print names where known.
fn quoted_list<'a, I>(set: &ParameterSet, atoms: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    atoms
        .into_iter()
        .map(|atom| {
            let print = set
                .print_name(atom)
                .unwrap_or_else(|_| default_print_name(atom));
            format!("'{}'", print)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for TaskDefinition {
    /// `-a -b one or more of (-x -y)`, newline terminated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mandatory: Vec<String> = self.mandatory.iter().map(|a| default_print_name(a)).collect();
        f.write_str(&mandatory.join(" "))?;

        if !self.at_least_one.is_empty() {
            let group: Vec<String> = self
                .at_least_one
                .iter()
                .map(|a| default_print_name(a))
                .collect();
            if !mandatory.is_empty() {
                f.write_char(' ')?;
            }
            write!(f, "one or more of ({})", group.join(" "))?;
        }
        f.write_char('\n')
    }
}

/// The better-matching of two tasks, or `None` when they are equally good.
///
/// Scores closer than `epsilon` are compared by the number of set
/// mandatory and at-least-one atoms instead.
pub fn more_consistent<'a>(
    a: &'a TaskDefinition,
    b: &'a TaskDefinition,
    set: &ParameterSet,
    epsilon: f64,
) -> Option<&'a TaskDefinition> {
    let score_a = a.consistency(set);
    let score_b = b.consistency(set);

    if (score_a - score_b).abs() >= epsilon {
        return Some(if score_a > score_b { a } else { b });
    }

    let satisfied_a = a.satisfied(set);
    let satisfied_b = b.satisfied(set);
    match satisfied_a.cmp(&satisfied_b) {
        std::cmp::Ordering::Greater => Some(a),
        std::cmp::Ordering::Less => Some(b),
        std::cmp::Ordering::Equal => None,
    }
}
