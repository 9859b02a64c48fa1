//! Advisory title relevance scoring.

use wardrobe_core::ProductRecord;

/// Query tokens this short or shorter are ignored.
const MIN_QUERY_TOKEN_CHARS: usize = 3;

/// Scores how well `title` matches `query`, in `[0, 100]`.
///
/// Each query token (lowercased, longer than two characters) that appears as a
/// whole title token counts as an exact match and a full combined match.
/// Otherwise a substring hit in either direction counts as half a combined
/// match. Score is `exact * 20 + combined * 10`, capped at 100.
///
/// The score does not gate inclusion; it is exposed so callers can filter.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn relevance_score(query: &str, title: &str) -> u8 {
    let title_tokens: Vec<String> = title.split_whitespace().map(str::to_lowercase).collect();

    let mut exact_matches = 0.0_f64;
    let mut combined_matches = 0.0_f64;

    for token in query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| t.chars().count() >= MIN_QUERY_TOKEN_CHARS)
    {
        if title_tokens.iter().any(|t| *t == token) {
            exact_matches += 1.0;
            combined_matches += 1.0;
        } else if title_tokens
            .iter()
            .any(|t| t.contains(token.as_str()) || token.contains(t.as_str()))
        {
            combined_matches += 0.5;
        }
    }

    let raw = (exact_matches * 20.0 + combined_matches * 10.0).round();
    // Clamped to [0, 100] before the cast.
    raw.clamp(0.0, 100.0) as u8
}

/// Keeps only records whose relevance is at least `threshold`.
#[must_use]
pub fn min_relevance(records: Vec<ProductRecord>, threshold: u8) -> Vec<ProductRecord> {
    records
        .into_iter()
        .filter(|r| r.relevance >= threshold)
        .collect()
}
