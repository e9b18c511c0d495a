//! Hooks applied to values when they are added or read.

use std::fmt;
use std::sync::Arc;

use crate::set::ParameterSet;

/// Check run on every added value; `Err(code)` marks the value invalid.
pub type CheckFn = Arc<dyn Fn(Option<&str>) -> Result<(), u32> + Send + Sync>;

/// Rewrites raw text before the checks. `Ok(None)` keeps the raw text,
/// `Err(message)` aborts the add.
pub type ConvertFn = Arc<dyn Fn(&str) -> Result<Option<String>, String> + Send + Sync>;

/// Insertion-time hooks of a parameter.
#[derive(Clone, Default)]
pub struct Controls {
    pub(crate) format: Option<CheckFn>,
    pub(crate) content: Option<CheckFn>,
    pub(crate) convert: Option<ConvertFn>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format<F>(mut self, check: F) -> Self
    where
        F: Fn(Option<&str>) -> Result<(), u32> + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(check));
        self
    }

    pub fn content<F>(mut self, check: F) -> Self
    where
        F: Fn(Option<&str>) -> Result<(), u32> + Send + Sync + 'static,
    {
        self.content = Some(Arc::new(check));
        self
    }

    pub fn convert<F>(mut self, convert: F) -> Self
    where
        F: Fn(&str) -> Result<Option<String>, String> + Send + Sync + 'static,
    {
        self.convert = Some(Arc::new(convert));
        self
    }

    /// Runs the checks, returning `(format_status, content_status)`.
    ///
    /// Content is checked even when the format check failed.
    pub(crate) fn statuses(&self, text: Option<&str>) -> (u32, u32) {
        let run = |check: &Option<CheckFn>| match check {
            Some(check) => check(text).err().unwrap_or(0),
            None => 0,
        };
        (run(&self.format), run(&self.content))
    }
}

impl fmt::Debug for Controls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controls")
            .field("format", &self.format.is_some())
            .field("content", &self.content.is_some())
            .field("convert", &self.convert.is_some())
            .finish()
    }
}

/// Builds a caller object out of a stored value at read time.
///
/// `C` is a caller context passed through unchanged. Closures of the shape
/// `Fn(&ParameterSet, &C, Option<&str>) -> Result<T, String>` implement it.
pub trait ObjectExtractor<C: ?Sized> {
    type Output;

    fn extract(&self, set: &ParameterSet, ctx: &C, value: Option<&str>)
        -> Result<Self::Output, String>;
}

impl<C, T, F> ObjectExtractor<C> for F
where
    C: ?Sized,
    F: Fn(&ParameterSet, &C, Option<&str>) -> Result<T, String>,
{
    type Output = T;

    fn extract(&self, set: &ParameterSet, ctx: &C, value: Option<&str>) -> Result<T, String> {
        self(set, ctx, value)
    }
}
