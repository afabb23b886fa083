//! Candidate filtering for the dropdown.
//!
//! Two passes produce what the dropdown shows: [`candidates`] removes options
//! that are already selected, then [`fuzzy_filter`] narrows the rest by the
//! typed text using nucleo-matcher.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::model::SelectOption;

/// Result of a fuzzy filter operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMatch {
    /// Index of the matched item in the input list.
    pub index: usize,
    /// Match score (higher is better).
    pub score: u32,
}

/// Pool entries whose id is not selected, in pool order.
pub fn candidates(pool: &[SelectOption], selected: &[SelectOption]) -> Vec<SelectOption> {
    pool.iter()
        .filter(|option| !selected.iter().any(|s| s.id == option.id))
        .cloned()
        .collect()
}

/// Fuzzy filter over labels.
///
/// Returns matches sorted by score (highest first), ties in input order.
/// Empty query returns all items with score 0.
///
/// # Example
///
/// ```
/// use multiselect_lib::filter::fuzzy_filter;
///
/// let labels = vec!["apple".to_string(), "banana".to_string(), "apricot".to_string()];
/// let matches = fuzzy_filter("ap", &labels);
/// assert_eq!(matches.len(), 2);
/// ```
pub fn fuzzy_filter(query: &str, labels: &[String]) -> Vec<FilterMatch> {
    let query = query.trim();
    if query.is_empty() {
        return labels
            .iter()
            .enumerate()
            .map(|(index, _)| FilterMatch { index, score: 0 })
            .collect();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );

    let mut buf = Vec::new();
    let mut matches: Vec<FilterMatch> = labels
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            let haystack = Utf32Str::new(label, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| FilterMatch { index, score })
        })
        .collect();

    // Stable sort keeps pool order among equal scores
    matches.sort_by(|a, b| b.score.cmp(&a.score));

    matches
}

/// Options to show for `query`: fuzzy-matched, best first.
pub fn suggestions(options: &[SelectOption], query: &str) -> Vec<SelectOption> {
    let labels: Vec<String> = options.iter().map(|o| o.label.clone()).collect();
    fuzzy_filter(query, &labels)
        .into_iter()
        .filter_map(|m| options.get(m.index).cloned())
        .collect()
}
