//! Converts a provider response into [`SearchCandidate`]s.
//!
//! Two passes, in order: structured citations, then URL-shaped substrings in
//! the answer text. Candidates are de-duplicated by exact URL across both
//! passes and keep their encounter order.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use wardrobe_core::SearchCandidate;

use crate::types::ProviderResponse;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'`()\[\]{}|\\^]+"#).expect("valid url regex")
});

/// Longest snippet-derived title, in characters.
const SNIPPET_TITLE_MAX_CHARS: usize = 100;

/// A candidate plus where its title came from.
#[derive(Debug, Clone)]
pub(crate) struct ExtractedCandidate {
    pub candidate: SearchCandidate,
    /// `true` when the provider gave no title and one was derived.
    pub title_derived: bool,
    /// 1-based position, used for numbered placeholder titles.
    pub position: usize,
}

/// Extracts candidates from `response`.
#[must_use]
pub fn extract_search_results(response: &ProviderResponse) -> Vec<SearchCandidate> {
    extract_with_provenance(response)
        .into_iter()
        .map(|e| e.candidate)
        .collect()
}

pub(crate) fn extract_with_provenance(response: &ProviderResponse) -> Vec<ExtractedCandidate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut extracted: Vec<ExtractedCandidate> = Vec::new();

    for entry in response.citation_entries() {
        let url = entry.url.trim().to_owned();
        if url.is_empty() || !seen.insert(url.clone()) {
            continue;
        }
        let position = extracted.len() + 1;
        let snippet = entry.snippet.unwrap_or_default().trim().to_owned();
        let provided = entry
            .title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty());
        let title_derived = provided.is_none();
        let title = provided.unwrap_or_else(|| derive_title(&url, &snippet, position));
        extracted.push(ExtractedCandidate {
            candidate: SearchCandidate {
                title,
                url,
                snippet,
                date: entry.date,
            },
            title_derived,
            position,
        });
    }

    let from_citations = extracted.len();

    for url in extract_urls(response.content()) {
        if !seen.insert(url.clone()) {
            continue;
        }
        let position = extracted.len() + 1;
        let title = derive_title(&url, "", position);
        extracted.push(ExtractedCandidate {
            candidate: SearchCandidate {
                title,
                url,
                snippet: String::new(),
                date: None,
            },
            title_derived: true,
            position,
        });
    }

    tracing::debug!(
        from_citations,
        from_text = extracted.len() - from_citations,
        "extracted search candidates"
    );

    extracted
}

/// Returns every URL-shaped substring of `text` with trailing sentence
/// punctuation removed.
#[must_use]
pub(crate) fn extract_urls(text: &str) -> Vec<String> {
    URL_RE
        .find_iter(text)
        .map(|m| {
            m.as_str()
                .trim_end_matches(['.', ',', ';', ':', '!', '?', '*', '\''])
                .to_owned()
        })
        .filter(|u| u.len() > "https://".len())
        .collect()
}

/// Title fallback chain: URL slug, then the snippet's first sentence, then a
/// numbered placeholder.
#[must_use]
pub(crate) fn derive_title(url: &str, snippet: &str, position: usize) -> String {
    title_from_url(url)
        .or_else(|| title_from_snippet(snippet))
        .unwrap_or_else(|| format!("Product {position}"))
}

/// Title-cases the last path segment that looks like a descriptive slug,
/// e.g. `/p/black-wrap-dress/A-123` → `"Black Wrap Dress"`.
fn title_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.collect();

    segments.iter().rev().find_map(|segment| {
        let decoded = percent_encoding::percent_decode_str(segment).decode_utf8_lossy();
        let stem = decoded
            .rsplit_once('.')
            .map_or(decoded.as_ref(), |(stem, _ext)| stem);
        if !stem.contains(['-', '_']) {
            return None;
        }
        let words: Vec<String> = stem
            .split(['-', '_'])
            .filter(|w| !w.is_empty() && !w.chars().any(|c| c.is_ascii_digit()))
            .map(title_case_word)
            .collect();
        let has_real_word = words
            .iter()
            .any(|w| w.chars().filter(|c| c.is_alphabetic()).count() >= 3);
        has_real_word.then(|| words.join(" "))
    })
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn title_from_snippet(snippet: &str) -> Option<String> {
    let trimmed = snippet.trim();
    if trimmed.is_empty() {
        return None;
    }
    let sentence_end = trimmed
        .char_indices()
        .find(|&(i, c)| {
            matches!(c, '.' | '!' | '?')
                && trimmed[i + c.len_utf8()..]
                    .chars()
                    .next()
                    .is_none_or(char::is_whitespace)
        })
        .map_or(trimmed.len(), |(i, _)| i);
    let sentence: String = trimmed[..sentence_end]
        .chars()
        .take(SNIPPET_TITLE_MAX_CHARS)
        .collect();
    let sentence = sentence.trim();
    (!sentence.is_empty()).then(|| sentence.to_owned())
}
