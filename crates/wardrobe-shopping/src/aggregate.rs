//! Merging, de-duplication and ordering of curated records.

use std::cmp::Ordering;
use std::collections::HashSet;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use wardrobe_core::stores::QUERY_PLACEHOLDER;
use wardrobe_core::{
    Confidence, PriceSource, ProductRecord, ResultKind, SearchOptions, StoreCatalog,
};

use crate::parse::categorize;
use crate::relevance::{min_relevance, relevance_score};

/// Stores boosted when the caller names none.
pub const DEFAULT_PRIORITY_STORES: &[&str] = &["Amazon"];

/// At most this many records from priority stores are moved to the front.
pub const PRIORITY_QUOTA: usize = 3;

/// Display price of a deep-link fallback record.
pub const FALLBACK_PRICE: &str = "Varies";

/// De-duplicates, orders and caps `products`.
///
/// 1. Drops records below `options.min_relevance`, then repeats by URL, then
///    by normalized title.
/// 2. Keeps the first record per store (case-insensitive).
/// 3. Stable-sorts: up to [`PRIORITY_QUOTA`] priority-store records first,
///    then in-budget before over-budget, then rating descending, then price
///    ascending among in-budget records.
/// 4. Truncates to `options.max_results` (at least one).
///
/// When nothing survives and the query is non-empty, one deep link per
/// searchable catalog store is returned instead, so callers always have a
/// next step.
#[must_use]
pub fn aggregate(
    products: Vec<ProductRecord>,
    options: &SearchOptions,
    catalog: &StoreCatalog,
) -> Vec<ProductRecord> {
    let input = products.len();
    let products = match options.min_relevance {
        Some(threshold) => min_relevance(products, threshold),
        None => products,
    };
    let unique = dedupe_by_url_and_title(products);
    let per_store = dedupe_by_store(unique);
    let cap = options.max_results.max(1);

    let priority = priority_flags(&per_store, &options.prefer_stores);
    let mut flagged: Vec<(bool, ProductRecord)> = priority.into_iter().zip(per_store).collect();
    flagged.sort_by(|(a_priority, a), (b_priority, b)| {
        b_priority
            .cmp(a_priority)
            .then_with(|| compare_records(a, b, options.budget_max))
    });

    let mut ranked: Vec<ProductRecord> = flagged.into_iter().map(|(_, r)| r).collect();
    ranked.truncate(cap);

    tracing::debug!(input, kept = ranked.len(), "aggregated shopping results");

    if ranked.is_empty() && !options.query.trim().is_empty() {
        let mut links = fallback_search_links(&options.query, catalog);
        links.truncate(cap);
        tracing::info!(
            query = %options.query,
            links = links.len(),
            "no product pages survived curation; returning store search links"
        );
        return links;
    }

    ranked
}

/// One "search on <store>" record per catalog store that has a search URL.
#[must_use]
pub fn fallback_search_links(query: &str, catalog: &StoreCatalog) -> Vec<ProductRecord> {
    let query = query.trim();
    let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
    let category = categorize(query);

    catalog
        .deep_link_stores()
        .filter_map(|store| {
            let template = store.search_url.as_deref()?;
            let title = format!("Search \"{query}\" on {}", store.name);
            Some(ProductRecord {
                id: uuid::Uuid::new_v4().to_string(),
                relevance: relevance_score(query, &title),
                title,
                url: template.replace(QUERY_PLACEHOLDER, &encoded),
                store: store.name.clone(),
                price: FALLBACK_PRICE.to_owned(),
                original_price: None,
                discount: None,
                rating: None,
                in_stock: true,
                category: category.to_owned(),
                price_value: None,
                price_source: PriceSource::Unknown,
                stock_confidence: Confidence::Low,
                kind: ResultKind::SearchLink,
                snippet: String::new(),
            })
        })
        .collect()
}

fn dedupe_by_url_and_title(products: Vec<ProductRecord>) -> Vec<ProductRecord> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_titles: HashSet<String> = HashSet::new();
    products
        .into_iter()
        .filter(|p| {
            let title = normalize_title(&p.title);
            let new_url = seen_urls.insert(p.url.clone());
            let new_title = title.is_empty() || seen_titles.insert(title);
            new_url && new_title
        })
        .collect()
}

fn dedupe_by_store(products: Vec<ProductRecord>) -> Vec<ProductRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    products
        .into_iter()
        .filter(|p| seen.insert(p.store.to_lowercase()))
        .collect()
}

/// Lowercased alphanumeric words joined by single spaces.
fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Marks the first [`PRIORITY_QUOTA`] records whose store is a priority store.
fn priority_flags(products: &[ProductRecord], prefer_stores: &[String]) -> Vec<bool> {
    let priority: Vec<String> = if prefer_stores.is_empty() {
        DEFAULT_PRIORITY_STORES.iter().map(|s| s.to_lowercase()).collect()
    } else {
        prefer_stores.iter().map(|s| s.trim().to_lowercase()).collect()
    };

    let mut remaining = PRIORITY_QUOTA;
    products
        .iter()
        .map(|p| {
            let is_priority = remaining > 0 && priority.contains(&p.store.to_lowercase());
            if is_priority {
                remaining -= 1;
            }
            is_priority
        })
        .collect()
}

/// In-budget first, then rating descending, then price ascending when both
/// are in budget. Everything else keeps input order.
fn compare_records(a: &ProductRecord, b: &ProductRecord, budget_max: Option<f64>) -> Ordering {
    let a_in = a.within_budget(budget_max);
    let b_in = b.within_budget(budget_max);

    b_in.cmp(&a_in)
        .then_with(|| compare_rating_desc(a.rating, b.rating))
        .then_with(|| {
            if a_in && b_in {
                compare_price_asc(a.price_value, b.price_value)
            } else {
                Ordering::Equal
            }
        })
}

fn compare_rating_desc(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Known prices ascending; unknown prices after known ones.
fn compare_price_asc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
