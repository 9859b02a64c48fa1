use serde::{Deserialize, Serialize};

/// A raw search hit before validation: one provider citation or one URL
/// lifted from the provider's free-form answer text.
///
/// Identity is the `url`; candidates are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub date: Option<String>,
}

/// Where a record's price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    /// Scraped from the candidate's title or snippet.
    Listed,
    /// Synthesized from keyword heuristics. Never a real price.
    Estimated,
    /// No price could be found and estimation was disabled.
    Unknown,
}

/// How much a heuristically derived field can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Backed by an explicit phrase or pattern in the text.
    High,
    /// An optimistic default with no textual evidence.
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// A validated single-product page.
    Product,
    /// A "search on <store>" deep link generated when nothing survived curation.
    SearchLink,
}

/// A curated shopping result handed to UI callers.
///
/// Serialized with camelCase keys to match the client contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Locally generated; not stable across runs.
    pub id: String,
    pub title: String,
    pub url: String,
    pub store: String,
    /// Display price, e.g. `"$42"`, `"$39.99"`, `"Varies"`.
    pub price: String,
    /// Pre-sale price. Only set alongside a listed current price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    /// Percentage string such as `"40% off"`. Only set when the original price
    /// is strictly greater than the current price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    /// Star rating in `[0.0, 5.0]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    pub in_stock: bool,
    /// Coarse garment type: `dress`, `top`, `bottom`, `skirt`, `outerwear`,
    /// `shoes` or `clothing`.
    pub category: String,
    /// Numeric price used for budget comparison and sorting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_value: Option<f64>,
    pub price_source: PriceSource,
    pub stock_confidence: Confidence,
    /// Advisory 0-100 title match against the query.
    pub relevance: u8,
    pub kind: ResultKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub snippet: String,
}

impl ProductRecord {
    /// Returns `true` when the record's price is known and within `budget_max`.
    ///
    /// Records with no numeric price are treated as in budget: they cannot be
    /// shown to exceed it.
    #[must_use]
    pub fn within_budget(&self, budget_max: Option<f64>) -> bool {
        match (budget_max, self.price_value) {
            (Some(max), Some(price)) => price <= max,
            _ => true,
        }
    }
}

/// Call-time options for a shopping search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub query: String,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    /// Store names (as they appear in the catalog) to prioritize and to issue
    /// dedicated domain-filtered queries for.
    #[serde(default)]
    pub prefer_stores: Vec<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Opt in to keyword-based synthetic prices when no listed price is found.
    #[serde(default)]
    pub estimate_missing_prices: bool,
    /// Product records scoring below this relevance are dropped before
    /// ranking. Fallback search links are exempt.
    #[serde(default)]
    pub min_relevance: Option<u8>,
}

impl SearchOptions {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            budget_min: None,
            budget_max: None,
            prefer_stores: Vec::new(),
            size: None,
            color: None,
            max_results: default_max_results(),
            estimate_missing_prices: false,
            min_relevance: None,
        }
    }
}

fn default_max_results() -> usize {
    10
}
