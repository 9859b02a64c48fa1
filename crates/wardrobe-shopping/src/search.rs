//! Search orchestration: provider branches in, curated records out.
//!
//! [`curate_response`] is the synchronous pipeline over one provider answer:
//! extract → unwrap → classify → parse/score → aggregate. [`ShoppingSearch`]
//! fans a search out into concurrent provider branches (general query, one
//! per preferred store, or one per outfit piece) and merges their curated
//! records at the aggregation step.

use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use wardrobe_core::{AppConfig, ProductRecord, SearchOptions, StoreCatalog};

use crate::affiliate::unwrap_affiliate_url;
use crate::aggregate::aggregate;
use crate::classify::classify_url;
use crate::client::SearchClient;
use crate::error::ShoppingError;
use crate::extract::{derive_title, extract_with_provenance};
use crate::normalize::parse_product;
use crate::query::{general_request, plan_requests, SearchRequest};
use crate::types::ProviderResponse;

/// Curated results for one piece of an outfit search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitPieceResults {
    pub piece: String,
    pub products: Vec<ProductRecord>,
}

/// Runs the full curation pipeline over one provider response.
#[must_use]
pub fn curate_response(
    response: &ProviderResponse,
    options: &SearchOptions,
    catalog: &StoreCatalog,
) -> Vec<ProductRecord> {
    aggregate(curate_candidates(response, options, catalog), options, catalog)
}

/// Everything before aggregation: the validated records from one response,
/// in provider order.
fn curate_candidates(
    response: &ProviderResponse,
    options: &SearchOptions,
    catalog: &StoreCatalog,
) -> Vec<ProductRecord> {
    if response.is_empty() {
        tracing::debug!("provider answer has no text and no citations");
        return Vec::new();
    }
    let extracted = extract_with_provenance(response);
    let total = extracted.len();
    let mut records = Vec::with_capacity(total);

    for item in extracted {
        let mut candidate = item.candidate;
        let unwrapped = unwrap_affiliate_url(&candidate.url);
        if unwrapped != candidate.url {
            tracing::debug!(from = %candidate.url, to = %unwrapped, "unwrapped affiliate link");
            if item.title_derived {
                candidate.title = derive_title(&unwrapped, &candidate.snippet, item.position);
            }
            candidate.url = unwrapped;
        }

        let verdict = classify_url(catalog, &candidate.url);
        if !verdict.is_accepted() {
            tracing::debug!(
                url = %candidate.url,
                verdict = verdict.label(),
                "dropping non-product URL"
            );
            continue;
        }

        match parse_product(&candidate, options, catalog) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(url = %candidate.url, error = %e, "dropping unparseable candidate");
            }
        }
    }

    tracing::debug!(candidates = total, kept = records.len(), "curated provider response");
    records
}

/// Fans searches out to the provider and curates the answers.
#[derive(Debug)]
pub struct ShoppingSearch {
    client: SearchClient,
    catalog: StoreCatalog,
    branch_timeout: Duration,
}

impl ShoppingSearch {
    #[must_use]
    pub fn new(client: SearchClient, catalog: StoreCatalog, branch_timeout: Duration) -> Self {
        Self {
            client,
            catalog,
            branch_timeout,
        }
    }

    /// Builds the client and branch timeout from `config`.
    ///
    /// # Errors
    ///
    /// Propagates [`SearchClient::from_config`] failures.
    pub fn from_config(config: &AppConfig, catalog: StoreCatalog) -> Result<Self, ShoppingError> {
        Ok(Self::new(
            SearchClient::from_config(config)?,
            catalog,
            Duration::from_secs(config.search_branch_timeout_secs),
        ))
    }

    #[must_use]
    pub fn catalog(&self) -> &StoreCatalog {
        &self.catalog
    }

    /// Searches for `options.query`: one general branch plus one
    /// domain-filtered branch per preferred store, all issued concurrently.
    ///
    /// A branch that fails or times out contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns the last branch error when every branch failed. With no
    /// preferred stores there is a single branch, so its error propagates.
    pub async fn search_products(
        &self,
        options: &SearchOptions,
    ) -> Result<Vec<ProductRecord>, ShoppingError> {
        let requests = plan_requests(options, &self.catalog);
        let outcomes = self.run_branches(&requests).await;

        let mut merged: Vec<ProductRecord> = Vec::new();
        let mut last_err: Option<ShoppingError> = None;
        let mut failed = 0usize;

        for (request, outcome) in requests.iter().zip(outcomes) {
            match outcome {
                Ok(response) => {
                    merged.extend(curate_candidates(&response, options, &self.catalog));
                }
                Err(e) => {
                    tracing::warn!(branch = %request.label, error = %e, "search branch failed");
                    failed += 1;
                    last_err = Some(e);
                }
            }
        }

        if failed == requests.len() {
            if let Some(err) = last_err {
                return Err(err);
            }
        }
        if failed > 0 {
            tracing::warn!(
                failed,
                total = requests.len(),
                "some search branches failed; continuing with partial results"
            );
        }

        Ok(aggregate(merged, options, &self.catalog))
    }

    /// Searches each outfit piece as its own concurrent branch, sharing the
    /// filters in `options`. Results are curated and aggregated per piece.
    ///
    /// A piece whose branch failed gets the store search-link fallback.
    ///
    /// # Errors
    ///
    /// Returns the last branch error when every piece failed.
    pub async fn search_outfit(
        &self,
        pieces: &[String],
        options: &SearchOptions,
    ) -> Result<Vec<OutfitPieceResults>, ShoppingError> {
        let piece_options: Vec<SearchOptions> = pieces
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|piece| SearchOptions {
                query: piece.to_owned(),
                ..options.clone()
            })
            .collect();
        if piece_options.is_empty() {
            return Ok(Vec::new());
        }

        let requests: Vec<SearchRequest> = piece_options.iter().map(general_request).collect();
        let outcomes = self.run_branches(&requests).await;

        let mut results = Vec::with_capacity(piece_options.len());
        let mut last_err: Option<ShoppingError> = None;
        let mut failed = 0usize;

        for (opts, outcome) in piece_options.iter().zip(outcomes) {
            let curated = match outcome {
                Ok(response) => curate_candidates(&response, opts, &self.catalog),
                Err(e) => {
                    tracing::warn!(piece = %opts.query, error = %e, "outfit piece search failed");
                    failed += 1;
                    last_err = Some(e);
                    Vec::new()
                }
            };
            results.push(OutfitPieceResults {
                piece: opts.query.clone(),
                products: aggregate(curated, opts, &self.catalog),
            });
        }

        if failed == piece_options.len() {
            if let Some(err) = last_err {
                return Err(err);
            }
        }

        Ok(results)
    }

    /// Issues every request at once and waits for all of them. Outcomes are
    /// returned in request order.
    async fn run_branches(
        &self,
        requests: &[SearchRequest],
    ) -> Vec<Result<ProviderResponse, ShoppingError>> {
        join_all(requests.iter().map(|r| self.run_branch(r))).await
    }

    async fn run_branch(&self, request: &SearchRequest) -> Result<ProviderResponse, ShoppingError> {
        tokio::time::timeout(self.branch_timeout, self.client.search(request))
            .await
            .map_err(|_| ShoppingError::Timeout {
                query: request.label.clone(),
                timeout_secs: self.branch_timeout.as_secs(),
            })?
    }
}
