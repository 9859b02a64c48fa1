//! Prompt construction for the web-search provider.

use std::fmt::Write as _;

use wardrobe_core::{SearchOptions, StoreCatalog, StoreEntry};

use crate::types::ChatMessage;

const SYSTEM_PROMPT: &str = "You are a fashion shopping assistant with live web search. \
Return direct links to individual product pages at online retailers. \
Never link to category, collection or search-result pages, social media, videos, \
or affiliate and link-shortener redirects. \
For every product give its name, current price, the store, and the full product page URL.";

/// One provider request: a prompt plus an optional domain restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Human-readable branch label for logs and errors, e.g.
    /// `"black midi dress"` or `"black midi dress @ Target"`.
    pub label: String,
    pub messages: Vec<ChatMessage>,
    /// Domains the provider should restrict its search to. Empty = unrestricted.
    pub domain_filter: Vec<String>,
}

/// Builds the user prompt for `options`, optionally scoped to one store.
#[must_use]
pub fn build_search_prompt(options: &SearchOptions, store: Option<&StoreEntry>) -> String {
    let mut prompt = format!("Find {} to buy online", options.query.trim());

    if let Some(size) = options.size.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let _ = write!(prompt, " in size {size}");
    }
    if let Some(color) = options.color.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        let _ = write!(prompt, " in {color}");
    }
    match (options.budget_min, options.budget_max) {
        (Some(min), Some(max)) => {
            let _ = write!(prompt, " priced between ${min:.0} and ${max:.0}");
        }
        (None, Some(max)) => {
            let _ = write!(prompt, " priced under ${max:.0}");
        }
        (Some(min), None) => {
            let _ = write!(prompt, " priced over ${min:.0}");
        }
        (None, None) => {}
    }
    if let Some(store) = store {
        let _ = write!(prompt, " from {}", store.name);
    }
    let _ = write!(
        prompt,
        ". List up to {} products, each with its product page URL and price.",
        options.max_results
    );
    prompt
}

/// Maps store names to the catalog domains of those stores, in order and
/// without duplicates. Names not in `catalog` contribute nothing.
#[must_use]
pub fn store_domain_filter(stores: &[String], catalog: &StoreCatalog) -> Vec<String> {
    let mut domains: Vec<String> = Vec::new();
    for store in stores.iter().filter_map(|name| catalog.store_by_name(name)) {
        for domain in &store.domains {
            if !domains.contains(domain) {
                domains.push(domain.clone());
            }
        }
    }
    domains
}

/// The unrestricted query for `options`.
#[must_use]
pub fn general_request(options: &SearchOptions) -> SearchRequest {
    SearchRequest {
        label: options.query.trim().to_owned(),
        messages: messages(build_search_prompt(options, None)),
        domain_filter: Vec::new(),
    }
}

/// Builds the general query plus one store-scoped query per preferred store
/// found in `catalog`. Unknown store names are logged and skipped.
#[must_use]
pub fn plan_requests(options: &SearchOptions, catalog: &StoreCatalog) -> Vec<SearchRequest> {
    let query = options.query.trim();
    let mut requests = vec![general_request(options)];

    for name in &options.prefer_stores {
        let Some(store) = catalog.store_by_name(name) else {
            tracing::warn!(store = %name, "preferred store not in catalog; skipping its query");
            continue;
        };
        let label = format!("{query} @ {}", store.name);
        if requests.iter().any(|r| r.label == label) {
            continue;
        }
        requests.push(SearchRequest {
            label,
            messages: messages(build_search_prompt(options, Some(store))),
            domain_filter: store_domain_filter(std::slice::from_ref(&store.name), catalog),
        });
    }

    requests
}

fn messages(user_prompt: String) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT.to_owned(),
        },
        ChatMessage {
            role: "user",
            content: user_prompt,
        },
    ]
}
