use reqwest::Url;
use wardrobe_core::{
    PriceSource, ProductRecord, ResultKind, SearchCandidate, SearchOptions, StoreCatalog,
};

use crate::classify::normalized_host;
use crate::error::ShoppingError;
use crate::parse::{
    categorize, discount_percent, estimate_price, format_price, format_unknown_store,
    parse_listed_price, parse_original_price, parse_rating, parse_stock,
};
use crate::relevance::relevance_score;

/// Display price for records with neither a listed nor an estimated price.
pub const PRICE_UNAVAILABLE: &str = "Price unavailable";

/// Converts a validated [`SearchCandidate`] into a [`ProductRecord`].
///
/// Field heuristics run over the title and snippet together. The store name
/// comes from the catalog entry owning the URL's host, or is derived from the
/// host itself for soft-accepted shopping domains.
///
/// When no listed price is found and `options.estimate_missing_prices` is set,
/// a keyword-based estimate is used and flagged as [`PriceSource::Estimated`].
/// Otherwise the price is [`PRICE_UNAVAILABLE`] with no numeric value.
///
/// # Errors
///
/// Returns [`ShoppingError::InvalidUrl`] if the candidate URL does not parse or
/// has no host.
pub fn parse_product(
    candidate: &SearchCandidate,
    options: &SearchOptions,
    catalog: &StoreCatalog,
) -> Result<ProductRecord, ShoppingError> {
    let url = Url::parse(candidate.url.trim()).map_err(|e| ShoppingError::InvalidUrl {
        url: candidate.url.clone(),
        reason: e.to_string(),
    })?;
    let host = normalized_host(&url).ok_or_else(|| ShoppingError::InvalidUrl {
        url: candidate.url.clone(),
        reason: "URL has no host".to_owned(),
    })?;

    let store = catalog
        .store_for_host(&host)
        .map_or_else(|| format_unknown_store(&host), |s| s.name.clone());

    let text = if candidate.snippet.is_empty() {
        candidate.title.clone()
    } else {
        format!("{} {}", candidate.title, candidate.snippet)
    };

    let listed = parse_listed_price(&text);
    let (price, price_value, price_source) = match listed {
        Some(value) => (format_price(value), Some(value), PriceSource::Listed),
        None if options.estimate_missing_prices => {
            let value = estimate_price(&text);
            (format_price(value), Some(value), PriceSource::Estimated)
        }
        None => (PRICE_UNAVAILABLE.to_owned(), None, PriceSource::Unknown),
    };

    // An original price is only shown next to a listed current price.
    let original_value = listed.and(parse_original_price(&text));
    let discount = match (original_value, listed) {
        (Some(original), Some(current)) => {
            discount_percent(original, current).map(|pct| format!("{pct}% off"))
        }
        _ => None,
    };

    let (in_stock, stock_confidence) = parse_stock(&text);

    Ok(ProductRecord {
        id: uuid::Uuid::new_v4().to_string(),
        title: candidate.title.clone(),
        url: candidate.url.trim().to_owned(),
        store,
        price,
        original_price: original_value.map(format_price),
        discount,
        rating: parse_rating(&text),
        in_stock,
        category: categorize(&candidate.title).to_owned(),
        price_value,
        price_source,
        stock_confidence,
        relevance: relevance_score(&options.query, &candidate.title),
        kind: ResultKind::Product,
        snippet: candidate.snippet.clone(),
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
