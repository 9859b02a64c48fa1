//! Product-page URL classification.
//!
//! Decides whether a URL is a genuine single-product page on a known retailer
//! rather than a collection, search, social-media or affiliate-redirect page.
//! Ban checks always run before allow checks: an affiliate host that proxies
//! through a product-looking path must be rejected before pattern matching
//! could accept it.

use reqwest::Url;
use serde::Serialize;
use wardrobe_core::StoreCatalog;

use crate::affiliate::AFFILIATE_NETWORKS;

/// Social-media, video and link-shortener hosts that never lead to a product
/// page. Matched as substrings of the normalized host.
pub(crate) const BANNED_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "facebook.com",
    "instagram.com",
    "tiktok.com",
    "pinterest.com",
    "twitter.com",
    "reddit.com",
    "linkedin.com",
    "snapchat.com",
    "tumblr.com",
    "threads.net",
    "amzn.to",
    "bit.ly",
    "tinyurl.com",
];

/// Lowercased path substrings that mark listing, search or editorial pages.
pub(crate) const BANNED_PATH_PATTERNS: &[&str] = &[
    "/collections",
    "/collection/",
    "/category",
    "/categories",
    "/search",
    "/browse/category",
    "/c/",
    "/b/",
    "/shop-all",
    "/brands/",
    "/blog",
    "/stores/",
    "/gift-guide",
    "/lookbook",
    "/wishlist",
    "/cart",
    "/sale/",
];

/// Outcome of classifying one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum UrlVerdict {
    /// Known store and the path matches one of its product patterns.
    Product { store: String },
    /// Whitelisted shopping domain with no pattern entry.
    SoftAccepted { host: String },
    /// Not an absolute http(s) URL with a host.
    Malformed,
    /// Host is a social, shortener or affiliate-network domain.
    BannedDomain { host: String, rule: &'static str },
    /// Path looks like a listing, search or editorial page.
    BannedPath { host: String, rule: &'static str },
    /// Known store, but the path is not one of its product shapes.
    NotProductPath { store: String },
    /// Host is neither an allowlisted store nor a whitelisted shopping domain.
    UnknownHost { host: String },
}

impl UrlVerdict {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            UrlVerdict::Product { .. } | UrlVerdict::SoftAccepted { .. }
        )
    }

    /// Short machine-readable label, used by logs and the CLI.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            UrlVerdict::Product { .. } => "product",
            UrlVerdict::SoftAccepted { .. } => "soft_accepted",
            UrlVerdict::Malformed => "malformed",
            UrlVerdict::BannedDomain { .. } => "banned_domain",
            UrlVerdict::BannedPath { .. } => "banned_path",
            UrlVerdict::NotProductPath { .. } => "not_product_path",
            UrlVerdict::UnknownHost { .. } => "unknown_host",
        }
    }
}

/// Returns the lowercased host of `url` with a leading `www.` removed.
#[must_use]
pub(crate) fn normalized_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").map(str::to_owned).unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Classifies `url` against `catalog`.
///
/// Malformed input fails closed as [`UrlVerdict::Malformed`].
#[must_use]
pub fn classify_url(catalog: &StoreCatalog, url: &str) -> UrlVerdict {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return UrlVerdict::Malformed;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return UrlVerdict::Malformed;
    }
    let Some(host) = normalized_host(&parsed) else {
        return UrlVerdict::Malformed;
    };

    if let Some(rule) = BANNED_DOMAINS
        .iter()
        .chain(AFFILIATE_NETWORKS.iter().map(|n| &n.domain))
        .copied()
        .find(|banned| host.contains(*banned))
    {
        return UrlVerdict::BannedDomain { host, rule };
    }

    let path = parsed.path().to_lowercase();
    if let Some(rule) = BANNED_PATH_PATTERNS
        .iter()
        .copied()
        .find(|pattern| path.contains(*pattern))
    {
        return UrlVerdict::BannedPath { host, rule };
    }

    if let Some(store) = catalog.store_for_host(&host) {
        let accepted = store.product_patterns.is_empty()
            || store
                .product_patterns
                .iter()
                .any(|p| path.contains(&p.to_lowercase()));
        return if accepted {
            UrlVerdict::Product {
                store: store.name.clone(),
            }
        } else {
            UrlVerdict::NotProductPath {
                store: store.name.clone(),
            }
        };
    }

    if catalog.is_shopping_domain(&host) {
        tracing::debug!(
            url,
            host = %host,
            "soft-accepting whitelisted shopping domain without product pattern"
        );
        return UrlVerdict::SoftAccepted { host };
    }

    UrlVerdict::UnknownHost { host }
}

/// Returns `true` if `url` is a purchasable single-product page according to
/// the built-in store catalog.
#[must_use]
pub fn is_product_page(url: &str) -> bool {
    classify_url(StoreCatalog::builtin(), url).is_accepted()
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
