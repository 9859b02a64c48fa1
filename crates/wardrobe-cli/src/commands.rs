//! Command handlers. Results go to stdout as pretty JSON; logs go to stderr.

use std::path::Path;

use anyhow::Context;
use serde_json::json;
use wardrobe_core::{load_app_config, load_store_catalog, SearchOptions, StoreCatalog};
use wardrobe_shopping::{
    classify_url, curate_response, unwrap_affiliate_url, ProviderResponse, ShoppingSearch,
};

use crate::Filters;

/// Loads the YAML catalog at `path`, or clones the built-in one.
pub(crate) fn load_catalog(path: Option<&Path>) -> anyhow::Result<StoreCatalog> {
    match path {
        Some(path) => load_store_catalog(path)
            .with_context(|| format!("failed to load store catalog {}", path.display())),
        None => Ok(StoreCatalog::builtin().clone()),
    }
}

/// Builds call-time search options from CLI filters.
pub(crate) fn build_options(query: &str, filters: &Filters, default_max: usize) -> SearchOptions {
    SearchOptions {
        query: query.trim().to_owned(),
        budget_min: filters.budget_min,
        budget_max: filters.budget_max,
        prefer_stores: filters.prefer_stores.clone(),
        size: filters.size.clone(),
        color: filters.color.clone(),
        max_results: filters.max_results.unwrap_or(default_max),
        estimate_missing_prices: filters.estimate_prices,
        min_relevance: filters.min_relevance,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_search(stores: Option<&Path>) -> anyhow::Result<(ShoppingSearch, usize)> {
    let config = load_app_config().context("failed to load configuration")?;
    tracing::debug!(env = %config.env, model = %config.search_model, "loaded configuration");
    let catalog = load_catalog(stores.or(config.stores_path.as_deref()))?;
    let search = ShoppingSearch::from_config(&config, catalog)
        .context("failed to build search client")?;
    Ok((search, config.max_results))
}

pub(crate) async fn run_search(
    query: &str,
    filters: &Filters,
    stores: Option<&Path>,
) -> anyhow::Result<()> {
    let (search, default_max) = build_search(stores)?;
    let options = build_options(query, filters, default_max);

    let records = search
        .search_products(&options)
        .await
        .with_context(|| format!("search for \"{}\" failed", options.query))?;

    tracing::info!(query = %options.query, results = records.len(), "search complete");
    print_json(&records)
}

pub(crate) async fn run_outfit(
    pieces: &[String],
    filters: &Filters,
    stores: Option<&Path>,
) -> anyhow::Result<()> {
    let (search, default_max) = build_search(stores)?;
    let options = build_options(&pieces.join(", "), filters, default_max);

    let results = search
        .search_outfit(pieces, &options)
        .await
        .context("outfit search failed")?;

    print_json(&results)
}

pub(crate) fn run_classify(urls: &[String], stores: Option<&Path>) -> anyhow::Result<()> {
    let catalog = load_catalog(stores)?;

    let verdicts: Vec<serde_json::Value> = urls
        .iter()
        .map(|url| {
            let resolved = unwrap_affiliate_url(url);
            let verdict = classify_url(&catalog, &resolved);
            json!({
                "url": url,
                "resolvedUrl": resolved,
                "accepted": verdict.is_accepted(),
                "result": verdict,
            })
        })
        .collect();

    print_json(&verdicts)
}

pub(crate) fn run_curate(
    file: &Path,
    query: &str,
    filters: &Filters,
    stores: Option<&Path>,
) -> anyhow::Result<()> {
    let catalog = load_catalog(stores)?;
    let body = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let response: ProviderResponse = serde_json::from_str(&body)
        .with_context(|| format!("{} is not a provider response", file.display()))?;

    let options = build_options(query, filters, SearchOptions::new(query).max_results);
    let records = curate_response(&response, &options, &catalog);

    print_json(&records)
}
