//! Command-line tokenizer.
//!
//! Turns `argv` into value insertions driven by each parameter's
//! [`ParseOptions`](crate::parameter::ParseOptions). Unrecognised tokens are
//! recorded as typos or unknowns and never stop the scan.

use crate::error::Result;
use crate::parameter::{Arity, LooseCollect};
use crate::set::ParameterSet;
use crate::value::{Value, PRIORITY_BASE};

/// Shape of a single argv token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// `--`
    EndOfArgs,
    /// `--name`, `---name`, ...
    Long(&'a str),
    /// `-x`, `-name` or a bunch `-abc`.
    Short(&'a str),
    /// Anything else, including a lone `-`.
    Bare,
}

fn token_kind(token: &str) -> Token<'_> {
    if token == "--" {
        return Token::EndOfArgs;
    }
    let name = token.trim_start_matches('-');
    let dashes = token.len() - name.len();
    match dashes {
        _ if name.is_empty() => Token::Bare,
        0 => Token::Bare,
        1 => Token::Short(name),
        _ => Token::Long(name),
    }
}

/// Where a flag activation sits relative to a `-abc` bunch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Alone,
    InBunch,
    LastInBunch,
}

/// Scan state shared by the helpers of one `parse_cmd` call.
struct Scan<'a, S> {
    tokens: &'a [S],
    next: usize,
    source: Option<&'a str>,
    priority: u32,
    loose_count: usize,
}

impl<S: AsRef<str>> Scan<'_, S> {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.next).map(|t| AsRef::<str>::as_ref(t))
    }
}

impl ParameterSet {
    /// Parses `argv` (program name first) into the set at `priority`.
    ///
    /// After the scan, parameters with wildcard expansion enabled have their
    /// newly added values expanded in place.
    pub fn parse_cmd<S: AsRef<str>>(
        &mut self,
        argv: &[S],
        source: Option<&str>,
        priority: u32,
    ) -> Result<()> {
        Value::new(None, source, priority)?;

        // Values stored by this scan are appended past these marks.
        let marks: Vec<usize> = self
            .parameters()
            .iter()
            .map(|p| p.history().len())
            .collect();

        let tokens = argv.get(1..).unwrap_or_default();
        let mut scan = Scan {
            tokens,
            next: 0,
            source,
            priority,
            loose_count: 0,
        };
        let mut after_end_of_args = false;

        while let Some(token) = scan.peek() {
            let token = token.to_string();
            scan.next += 1;

            if after_end_of_args {
                self.collect_loose(&token, &mut scan)?;
                continue;
            }

            match token_kind(&token) {
                Token::EndOfArgs => {
                    if self.collect_options().is_some_and(|c| c.after_end_of_args) {
                        tracing::trace!("end of arguments, collecting the rest");
                        after_end_of_args = true;
                    } else {
                        self.record_unknown(&token, None, source);
                    }
                }
                Token::Long(name) => match self.flag(name) {
                    Some(index) => self.activate(index, Position::Alone, &mut scan)?,
                    None => self.unrecognised_flag(&token, name, &mut scan)?,
                },
                Token::Short(name) => {
                    if let Some(index) = self.flag(name) {
                        self.activate(index, Position::Alone, &mut scan)?;
                    } else if let Some(bunch) = self.bunch(name) {
                        let last = bunch.len() - 1;
                        for (n, index) in bunch.into_iter().enumerate() {
                            let position = if n == last {
                                Position::LastInBunch
                            } else {
                                Position::InBunch
                            };
                            self.activate(index, position, &mut scan)?;
                        }
                    } else {
                        self.unrecognised_flag(&token, name, &mut scan)?;
                    }
                }
                Token::Bare => self.collect_loose(&token, &mut scan)?,
            }
        }

        self.expand_parsed_wildcards(&marks)
    }

    /// Index of a parameter that may be given as a flag under `name`.
    fn flag(&self, name: &str) -> Option<usize> {
        self.position(name)
            .filter(|&i| !self.parameters()[i].options().no_flag)
    }

    /// Whether `token` is a dash-prefixed spelling of a known flag,
    /// ignoring case.
    fn is_known_flag(&self, token: &str) -> bool {
        let name = token.trim_start_matches('-');
        if name.is_empty() || name.len() == token.len() {
            return false;
        }
        self.parameters().iter().any(|p| {
            !p.options().no_flag
                && (p.name().eq_ignore_ascii_case(name)
                    || p.alias().is_some_and(|a| a.eq_ignore_ascii_case(name)))
        })
    }

    /// Splits `-abc` into one-letter flags. Every letter but the last must
    /// be a flag that can go without a value.
    fn bunch(&self, letters: &str) -> Option<Vec<usize>> {
        let mut buf = [0u8; 4];
        let indexes: Vec<usize> = letters
            .chars()
            .map(|c| self.flag(c.encode_utf8(&mut buf)))
            .collect::<Option<_>>()?;

        let (_, init) = indexes.split_last()?;
        let valueless = init.iter().all(|&i| {
            matches!(
                self.parameters()[i].options().arity,
                Arity::NoValue | Arity::Default
            )
        });
        valueless.then_some(indexes)
    }

    /// Records one flag activation, consuming following tokens per arity.
    ///
    /// Inside a bunch only the last letter may consume, and only when it
    /// requires a value.
    fn activate<S: AsRef<str>>(
        &mut self,
        index: usize,
        position: Position,
        scan: &mut Scan<'_, S>,
    ) -> Result<()> {
        let options = self.parameters()[index].options().clone();
        let mut values: Vec<Option<String>> = Vec::new();

        match options.arity {
            Arity::NoValue => {}
            Arity::Default if position != Position::Alone => {}
            Arity::Default => {
                if let Some(next) = scan.peek().filter(|t| !t.starts_with('-')) {
                    values.push(Some(next.to_string()));
                    scan.next += 1;
                }
            }
            Arity::Value | Arity::Sequence if position == Position::InBunch => {}
            Arity::Value | Arity::Sequence => {
                while let Some(next) = scan.peek() {
                    if options.breaks_at(next, |t| self.is_known_flag(t)) {
                        break;
                    }
                    values.push(Some(next.to_string()));
                    scan.next += 1;
                    if options.arity == Arity::Value {
                        break;
                    }
                }
            }
        }

        if values.is_empty() {
            values.push(None);
        }

        let parameter = self.parameter_at_mut(index);
        tracing::trace!(parameter = %parameter.name(), values = values.len(), "flag activated");
        for value in values {
            parameter.add_value(value.as_deref(), scan.source, scan.priority)?;
        }
        Ok(())
    }

    /// A dash token that names no flag.
    fn unrecognised_flag<S: AsRef<str>>(
        &mut self,
        token: &str,
        name: &str,
        scan: &mut Scan<'_, S>,
    ) -> Result<()> {
        if self.collect_options().is_some_and(|c| c.dashes) {
            return self.collect_loose(token, scan);
        }
        self.record_unrecognised(name, None, scan.source);
        Ok(())
    }

    /// Hands a loose token to the collecting parameter, if there is one.
    fn collect_loose<S: AsRef<str>>(&mut self, token: &str, scan: &mut Scan<'_, S>) -> Result<()> {
        let (Some(index), Some(collect)) = (self.collector(), self.collect_options()) else {
            self.record_unknown(token, None, scan.source);
            return Ok(());
        };

        let level = if collect.lower_priority && scan.priority > PRIORITY_BASE {
            scan.priority - 1
        } else {
            scan.priority
        };

        let overflow = collect.limit.is_some_and(|limit| scan.loose_count >= limit);
        scan.loose_count += 1;
        let target = match overflow {
            false => Some(level),
            true if level > PRIORITY_BASE => Some(level - 1),
            true => None,
        };

        match target {
            Some(priority) => self
                .parameter_at_mut(index)
                .add_value(Some(token), scan.source, priority),
            None => {
                self.record_unknown(token, None, scan.source);
                Ok(())
            }
        }
    }

    fn collect_options(&self) -> Option<LooseCollect> {
        self.collector()
            .and_then(|i| self.parameters()[i].options().collect)
    }

    fn expand_parsed_wildcards(&mut self, marks: &[usize]) -> Result<()> {
        let pending: Vec<(usize, usize)> = marks
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, from)| self.parameters()[i].needs_expansion_from(from))
            .collect();

        for (index, from) in pending {
            self.parameter_at_mut(index).expand_wildcards_from(from)?;
        }
        Ok(())
    }
}
