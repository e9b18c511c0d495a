//! Configuration-file ingestion.
//!
//! One parameter per line:
//!
//! ```text
//! # comment
//! key value
//! key = value
//! key "quoted \"value\""
//! --long [value]
//! -i value
//! -vxn
//! ```
//!
//! A malformed line is recorded as a syntax error and reading goes on;
//! only I/O failures abort.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::Path;

use crate::error::{ParamSetError, Result};
use crate::set::{ParameterSet, SyntaxError};
use crate::value::Value;

/// Longest excerpt of a bad line kept in a syntax error.
const EXCERPT_LEN: usize = 32;

/// A line without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    /// 1-based line number.
    pub row: usize,
    /// Bytes consumed from the input, terminator included.
    pub bytes: usize,
}

/// Splits input into lines ending in `\n`, `\r\n` or `\r`.
pub struct LineReader<R> {
    inner: R,
    row: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, row: 0 }
    }

    pub fn next_line(&mut self) -> io::Result<Option<Line>> {
        let mut raw = Vec::new();
        let mut bytes = 0;

        loop {
            let buf = self.inner.fill_buf()?;
            let Some(&byte) = buf.first() else {
                break;
            };
            self.inner.consume(1);
            bytes += 1;

            match byte {
                b'\n' => break,
                b'\r' => {
                    if self.inner.fill_buf()?.first() == Some(&b'\n') {
                        self.inner.consume(1);
                        bytes += 1;
                    }
                    break;
                }
                _ => raw.push(byte),
            }
        }

        if bytes == 0 {
            return Ok(None);
        }

        self.row += 1;
        Ok(Some(Line {
            text: String::from_utf8_lossy(&raw).into_owned(),
            row: self.row,
            bytes,
        }))
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

/// Splits a line into key and optional value.
///
/// The value may be wrapped in double quotes; inside quotes `\"` and `\\`
/// are escapes.
pub fn parse_key_value(line: &str) -> std::result::Result<(String, Option<String>), String> {
    let line = line.trim();
    let key_end = line
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(line.len());
    let key = &line[..key_end];

    if key.is_empty() {
        return Err("missing key".to_string());
    }
    if key.contains('"') {
        return Err("quote in key".to_string());
    }

    let mut rest = line[key_end..].trim_start();
    if let Some(after) = rest.strip_prefix('=') {
        rest = after.trim_start();
        if rest.is_empty() {
            return Err("missing value after '='".to_string());
        }
    }

    if rest.is_empty() {
        return Ok((key.to_string(), None));
    }

    let Some(quoted) = rest.strip_prefix('"') else {
        return Ok((key.to_string(), Some(rest.to_string())));
    };

    let mut value = String::new();
    let mut chars = quoted.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped @ ('"' | '\\'))) => value.push(escaped),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => return Err("unterminated quote".to_string()),
            },
            '"' => {
                if !quoted[i + 1..].trim().is_empty() {
                    return Err("unexpected text after closing quote".to_string());
                }
                return Ok((key.to_string(), Some(value)));
            }
            _ => value.push(c),
        }
    }
    Err("unterminated quote".to_string())
}

fn excerpt(line: &str) -> String {
    let trimmed = line.trim();
    match trimmed.char_indices().nth(EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

impl ParameterSet {
    /// Reads a configuration file into the set.
    pub fn read_from_file(
        &mut self,
        path: impl AsRef<Path>,
        source: Option<&str>,
        priority: u32,
    ) -> Result<()> {
        let path = path.as_ref();
        let io_error = |source| ParamSetError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        tracing::debug!(path = %path.display(), "reading configuration file");
        self.read_lines(LineReader::new(BufReader::new(file)), source, priority)
            .map_err(|e| match e {
                ParamSetError::ReadText { source } => io_error(source),
                other => other,
            })
    }

    /// Reads configuration text into the set.
    pub fn read_from_str(&mut self, text: &str, source: Option<&str>, priority: u32) -> Result<()> {
        self.read_lines(LineReader::new(Cursor::new(text.as_bytes())), source, priority)
    }

    fn read_lines<R: BufRead>(
        &mut self,
        lines: LineReader<R>,
        source: Option<&str>,
        priority: u32,
    ) -> Result<()> {
        Value::new(None, source, priority)?;

        for line in lines {
            let line = line.map_err(|source| ParamSetError::ReadText { source })?;
            let text = line.text.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            match parse_key_value(text) {
                Ok((key, value)) => self.add_conf_entry(&key, value.as_deref(), source, priority)?,
                Err(message) => self.record_syntax_error(SyntaxError {
                    row: line.row,
                    excerpt: excerpt(text),
                    message,
                    source: source.map(str::to_string),
                }),
            }
        }
        Ok(())
    }

    /// Stores one `key [value]` entry; dash-prefixed keys follow flag rules.
    fn add_conf_entry(
        &mut self,
        key: &str,
        value: Option<&str>,
        source: Option<&str>,
        priority: u32,
    ) -> Result<()> {
        let name = key.trim_start_matches('-');
        let dashes = key.len() - name.len();
        if name.is_empty() {
            self.record_unknown(key, value, source);
            return Ok(());
        }

        if dashes == 1 && self.position(name).is_none() {
            let letters: Vec<String> = name.chars().map(String::from).collect();
            let all_known = letters.len() > 1 && letters.iter().all(|l| self.position(l).is_some());
            if all_known {
                let last = letters.len() - 1;
                for (i, letter) in letters.iter().enumerate() {
                    let letter_value = if i == last { value } else { None };
                    self.add(letter, letter_value, source, priority)?;
                }
                return Ok(());
            }
        }

        self.add(name, value, source, priority)?;
        Ok(())
    }
}
