//! Wildcard expansion of parameter values.

use std::path::PathBuf;

/// Default characters treated as wildcards.
pub const DEFAULT_WILDCARD_CHARS: &str = "?*";

/// Turns a value containing wildcard characters into zero or more values.
pub trait WildcardExpander: Send + Sync {
    fn expand(&self, pattern: &str) -> Result<Vec<String>, String>;
}

impl<F> WildcardExpander for F
where
    F: Fn(&str) -> Result<Vec<String>, String> + Send + Sync,
{
    fn expand(&self, pattern: &str) -> Result<Vec<String>, String> {
        self(pattern)
    }
}

/// Matches values against the file system.
///
/// A pattern with no matches expands to nothing, so the pattern value is
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct GlobExpander {
    /// Relative patterns are resolved against this directory.
    pub base_dir: Option<PathBuf>,
}

impl GlobExpander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }
}

impl WildcardExpander for GlobExpander {
    fn expand(&self, pattern: &str) -> Result<Vec<String>, String> {
        let full = match &self.base_dir {
            Some(dir) if !PathBuf::from(pattern).is_absolute() => {
                dir.join(pattern).to_string_lossy().into_owned()
            }
            _ => pattern.to_string(),
        };

        let paths = glob::glob(&full).map_err(|e| e.to_string())?;
        let mut matches = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| e.to_string())?;
            matches.push(path.to_string_lossy().into_owned());
        }
        matches.sort();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_glob_expander_matches_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.txt", "b.txt", "c.log"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        let expander = GlobExpander::in_dir(dir.path());
        let found = expander.expand("*.txt").unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("a.txt"));
        assert!(found[1].ends_with("b.txt"));

        assert!(expander.expand("*.none").unwrap().is_empty());
    }

    #[test]
    fn test_glob_expander_rejects_bad_pattern() {
        let expander = GlobExpander::new();
        assert!(expander.expand("[").is_err());
    }
}
