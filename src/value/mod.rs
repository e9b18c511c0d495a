//! Values tagged with provenance, and the per-parameter history that stores them.
//!
//! A [`ValueHistory`] keeps values in insertion order. Every query first
//! filters by source and by a [`PrioritySelector`], then indexes into the
//! surviving values with [`At`]; nothing is ever re-sorted by priority.

mod history;
mod selector;

pub use history::ValueHistory;
pub use selector::{At, PrioritySelector};

use serde::Serialize;

use crate::error::{ParamSetError, Result};

/// Lowest legal priority.
pub const PRIORITY_BASE: u32 = 0;
/// Highest legal priority.
pub const PRIORITY_ROOF: u32 = 0xffff;

/// One recorded occurrence of a parameter.
///
/// `text == None` is a flag given without an argument. The check statuses are
/// `0` for a valid value, otherwise a caller-defined error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Value {
    text: Option<String>,
    source: Option<String>,
    priority: u32,
    format_status: u32,
    content_status: u32,
}

impl Value {
    /// Creates a value, rejecting priorities above [`PRIORITY_ROOF`].
    pub fn new(text: Option<&str>, source: Option<&str>, priority: u32) -> Result<Self> {
        if priority > PRIORITY_ROOF {
            return Err(ParamSetError::PriorityTooLarge {
                priority,
                max: PRIORITY_ROOF,
            });
        }

        Ok(Self {
            text: text.map(str::to_string),
            source: source.map(str::to_string),
            priority,
            format_status: 0,
            content_status: 0,
        })
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn format_status(&self) -> u32 {
        self.format_status
    }

    pub fn content_status(&self) -> u32 {
        self.content_status
    }

    /// True when neither the format nor the content check failed.
    pub fn is_valid(&self) -> bool {
        self.format_status == 0 && self.content_status == 0
    }

    pub fn set_format_status(&mut self, status: u32) {
        self.format_status = status;
    }

    pub fn set_content_status(&mut self, status: u32) {
        self.content_status = status;
    }

    /// A sibling value with different text and fresh statuses.
    pub(crate) fn with_text(&self, text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            source: self.source.clone(),
            priority: self.priority,
            format_status: 0,
            content_status: 0,
        }
    }

    /// `None` as the filter accepts every source.
    pub(crate) fn matches_source(&self, source: Option<&str>) -> bool {
        match source {
            None => true,
            Some(wanted) => self.source.as_deref() == Some(wanted),
        }
    }
}
