//! Shopping result curation: turns a web-search provider's answer into a
//! ranked list of validated single-product pages.

pub(crate) mod affiliate;
pub mod aggregate;
pub mod classify;
pub mod client;
pub mod error;
pub mod extract;
pub mod normalize;
pub(crate) mod parse;
pub mod query;
pub(crate) mod rate_limit;
pub mod relevance;
pub mod search;
pub mod types;

pub use affiliate::{is_affiliate_url, unwrap_affiliate_url};
pub use aggregate::{aggregate, fallback_search_links};
pub use classify::{classify_url, is_product_page, UrlVerdict};
pub use client::SearchClient;
pub use error::ShoppingError;
pub use extract::extract_search_results;
pub use normalize::{parse_product, PRICE_UNAVAILABLE};
pub use query::{build_search_prompt, plan_requests, store_domain_filter, SearchRequest};
pub use relevance::{min_relevance, relevance_score};
pub use search::{curate_response, OutfitPieceResults, ShoppingSearch};
pub use types::ProviderResponse;
