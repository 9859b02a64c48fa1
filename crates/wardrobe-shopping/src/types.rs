//! Search-provider response types for the OpenAI-compatible chat completion
//! endpoint with web search (`POST /chat/completions`).
//!
//! ## Observed shape
//!
//! ### `citations`
//! Usually a JSON array of plain URL strings. Some model versions return
//! objects `{url, title, snippet, date}` instead, so each entry is modelled as
//! an untagged enum and both shapes are accepted.
//!
//! ### `search_results`
//! Newer responses carry a parallel `search_results` array of objects with
//! `title`, `url`, `date` and occasionally `snippet`. When present it is the
//! richer source and is merged ahead of bare citation strings.
//!
//! ### `choices[0].message.content`
//! The model's free-form answer. Product URLs often appear inline, either bare
//! or inside markdown links, and are scanned by the result extractor.
//!
//! Every field is `#[serde(default)]`: the shape is not contractually
//! guaranteed and a missing section must not fail the whole response.

use serde::{Deserialize, Serialize};

/// Top-level response from `POST /chat/completions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,

    #[serde(default)]
    pub citations: Vec<Citation>,

    #[serde(default)]
    pub search_results: Vec<CitationEntry>,
}

impl ProviderResponse {
    /// The first choice's answer text, or `""` when absent.
    #[must_use]
    pub fn content(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or("")
    }

    /// Structured citations with `search_results` entries first, then
    /// `citations` in provider order.
    #[must_use]
    pub fn citation_entries(&self) -> Vec<CitationEntry> {
        self.search_results
            .iter()
            .cloned()
            .chain(self.citations.iter().map(Citation::to_entry))
            .collect()
    }

    /// Returns `true` when the response carries neither text nor citations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content().trim().is_empty()
            && self.citations.is_empty()
            && self.search_results.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// One citation as the provider sends it: a bare URL or an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Citation {
    Url(String),
    Entry(CitationEntry),
}

impl Citation {
    fn to_entry(&self) -> CitationEntry {
        match self {
            Citation::Url(url) => CitationEntry {
                url: url.clone(),
                ..CitationEntry::default()
            },
            Citation::Entry(entry) => entry.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationEntry {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_domain_filter: Vec<String>,
    pub return_citations: bool,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}
