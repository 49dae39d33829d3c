//! Candidate filtering.
//!
//! Case-insensitive prefix match, stable, no re-ranking.

use crate::candidate::{Candidate, HintEntry};

/// Whether `text` starts with `keyword`, ignoring case.
pub fn matches_prefix(text: &str, keyword: &str) -> bool {
    text.to_lowercase().starts_with(&keyword.to_lowercase())
}

/// Candidates whose text starts with `keyword`, in source order.
pub fn filter(keyword: &str, candidates: &[Candidate]) -> Vec<Candidate> {
    filter_indexed(keyword, candidates)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}

/// Like [`filter`], yielding each match with its index in `candidates`.
pub fn filter_indexed<'a>(
    keyword: &'a str,
    candidates: &'a [Candidate],
) -> impl Iterator<Item = (usize, &'a Candidate)> + 'a {
    candidates
        .iter()
        .enumerate()
        .filter(move |(_, c)| matches_prefix(&c.text, keyword))
}

/// Matches packaged as menu entries.
pub fn filter_entries(keyword: &str, candidates: &[Candidate]) -> Vec<HintEntry> {
    filter_indexed(keyword, candidates)
        .map(|(index, candidate)| HintEntry {
            index,
            candidate: candidate.clone(),
        })
        .collect()
}
