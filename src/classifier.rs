//! Typo/unknown classification of unrecognised tokens.
//!
//! Every known name gets a difference score
//!
//! ```text
//! difference = 100 * levenshtein(token, name) / len(name)
//!              - 15 * (token is a substring of name)
//!              - 15 * (name starts with token)
//! ```
//!
//! A name is suggested when its score is below 90 and within 10 of the best
//! score. With no suggestion the token is unknown.

/// Outcome of classifying one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Likely misspelling of these names, in candidate order.
    Typo(Vec<String>),
    Unknown,
}

const TYPO_THRESHOLD: i64 = 90;
const TYPO_WINDOW: i64 = 10;
const SUBSTRING_BONUS: i64 = 15;

/// Edit distance between two strings, counted in characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut row = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        row[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            row[j] = (prev[j] + 1).min(row[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Difference score of `token` against the known `name`; lower is closer.
pub fn difference(token: &str, name: &str) -> i64 {
    let len = name.chars().count().max(1) as i64;
    let edit = levenshtein(token, name) as i64;
    let mut score = 100 * edit / len;
    if name.contains(token) {
        score -= SUBSTRING_BONUS;
    }
    if name.starts_with(token) {
        score -= SUBSTRING_BONUS;
    }
    score
}

/// Classifies `token` against the candidate names.
pub fn classify<'a, I>(token: &str, candidates: I) -> Classification
where
    I: IntoIterator<Item = &'a str>,
{
    let scored: Vec<(&str, i64)> = candidates
        .into_iter()
        .map(|name| (name, difference(token, name)))
        .collect();

    let Some(best) = scored.iter().map(|(_, d)| *d).min() else {
        return Classification::Unknown;
    };

    let suggestions: Vec<String> = scored
        .iter()
        .filter(|(_, d)| *d < TYPO_THRESHOLD && *d < best + TYPO_WINDOW)
        .map(|(name, _)| name.to_string())
        .collect();

    if suggestions.is_empty() {
        Classification::Unknown
    } else {
        Classification::Typo(suggestions)
    }
}
