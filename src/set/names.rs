//! Parsing of set definition strings and name lists.

use crate::error::{ParamSetError, Result};
use crate::parameter::Constraint;

/// One `{name|alias}` entry of a definition string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub alias: Option<String>,
    pub constraint: Constraint,
}

/// Parses `"{h|help}{file}*{n}"`.
///
/// A trailing `*` makes the parameter unconstrained; otherwise it accepts a
/// single value per priority level.
pub fn parse_definition(definition: &str) -> Result<Vec<Definition>> {
    let mut out = Vec::new();
    let mut rest = definition.trim();

    while !rest.is_empty() {
        let (body, tail) = take_braced(rest, definition)?;
        let (name, alias) = match body.split_once('|') {
            Some((name, alias)) => (name.trim(), Some(alias.trim().to_string())),
            None => (body.trim(), None),
        };

        let (constraint, tail) = match tail.strip_prefix('*') {
            Some(tail) => (Constraint::Unconstrained, tail),
            None => (Constraint::SingleValuePerPriority, tail),
        };

        out.push(Definition {
            name: name.to_string(),
            alias,
            constraint,
        });
        rest = tail.trim_start();
    }

    Ok(out)
}

/// Splits a name list, either `"a,b,c"` or `"{a}{b}{c}"`.
pub fn split_names(list: &str) -> Result<Vec<String>> {
    let list = list.trim();
    if list.is_empty() {
        return Err(ParamSetError::InvalidArgument("empty name list".to_string()));
    }

    let mut names = Vec::new();
    if list.starts_with('{') {
        let mut rest = list;
        while !rest.is_empty() {
            let (body, tail) = take_braced(rest, list)?;
            names.push(body.trim().to_string());
            rest = tail.trim_start();
        }
    } else {
        names.extend(
            list.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }

    if names.iter().any(String::is_empty) {
        return Err(ParamSetError::InvalidFormat(format!("empty name in '{}'", list)));
    }
    Ok(names)
}

/// Returns the text inside the leading `{...}` and whatever follows it.
fn take_braced<'a>(text: &'a str, whole: &str) -> Result<(&'a str, &'a str)> {
    let malformed = || ParamSetError::InvalidFormat(format!("malformed name list '{}'", whole));
    let inner = text.strip_prefix('{').ok_or_else(malformed)?;
    let end = inner.find('}').ok_or_else(malformed)?;
    Ok((&inner[..end], &inner[end + 1..]))
}
