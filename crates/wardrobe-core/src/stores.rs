//! Store catalog: the allowlist of retailers whose product-page URL shapes are
//! known, the general shopping-domain whitelist, and the deep-link templates
//! used when a search comes back empty.
//!
//! The built-in catalog covers the major US fashion retailers. A YAML file of
//! the same shape can replace it at startup (see [`load_store_catalog`]). Once
//! built, a catalog is never mutated.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Placeholder substituted with the URL-encoded query in `search_url`.
pub const QUERY_PLACEHOLDER: &str = "{query}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEntry {
    /// Display name, e.g. `"Amazon"`.
    pub name: String,
    /// Registrable domains without `www.`, e.g. `["amazon.com"]`.
    pub domains: Vec<String>,
    /// Path substrings that mark a single purchasable item, e.g. `"/dp/"`.
    /// An empty list means any non-banned path is accepted.
    #[serde(default)]
    pub product_patterns: Vec<String>,
    /// Store search URL template containing `{query}`.
    #[serde(default)]
    pub search_url: Option<String>,
}

impl StoreEntry {
    /// Returns the longest of this store's domains that `host` falls under.
    fn matching_domain(&self, host: &str) -> Option<&str> {
        self.domains
            .iter()
            .filter(|d| host_matches(host, d))
            .map(String::as_str)
            .max_by_key(|d| d.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCatalog {
    pub stores: Vec<StoreEntry>,
    /// Shopping domains with no pattern entry. URLs on these hosts are
    /// soft-accepted when they clear the ban checks.
    #[serde(default)]
    pub shopping_domains: Vec<String>,
}

static BUILTIN: LazyLock<StoreCatalog> = LazyLock::new(build_builtin);

impl StoreCatalog {
    /// The compiled-in catalog.
    #[must_use]
    pub fn builtin() -> &'static StoreCatalog {
        &BUILTIN
    }

    /// Finds the store owning `host`, preferring the most specific domain so
    /// that `oldnavy.gap.com` resolves to Old Navy rather than Gap.
    ///
    /// `host` should already be lowercased with any `www.` prefix removed.
    #[must_use]
    pub fn store_for_host(&self, host: &str) -> Option<&StoreEntry> {
        self.stores
            .iter()
            .filter_map(|s| s.matching_domain(host).map(|d| (d.len(), s)))
            .max_by_key(|(len, _)| *len)
            .map(|(_, s)| s)
    }

    /// Returns `true` if `host` is under one of the general shopping domains.
    #[must_use]
    pub fn is_shopping_domain(&self, host: &str) -> bool {
        self.shopping_domains.iter().any(|d| host_matches(host, d))
    }

    /// Case-insensitive lookup by display name.
    #[must_use]
    pub fn store_by_name(&self, name: &str) -> Option<&StoreEntry> {
        let wanted = name.trim();
        self.stores
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(wanted))
    }

    /// Stores that can produce a search deep link, in catalog order.
    pub fn deep_link_stores(&self) -> impl Iterator<Item = &StoreEntry> {
        self.stores.iter().filter(|s| s.search_url.is_some())
    }
}

/// Returns `true` when `host` equals `domain` or is a subdomain of it.
#[must_use]
pub fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Load and validate a store catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_store_catalog(path: &Path) -> Result<StoreCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut catalog: StoreCatalog =
        serde_yaml::from_str(&content).map_err(ConfigError::StoresFileParse)?;

    normalize_domains(&mut catalog);
    validate_catalog(&catalog)?;

    Ok(catalog)
}

/// Lookups compare against lowercased hosts, so stored domains must be too.
fn normalize_domains(catalog: &mut StoreCatalog) {
    let domains = catalog
        .stores
        .iter_mut()
        .flat_map(|s| s.domains.iter_mut())
        .chain(catalog.shopping_domains.iter_mut());
    for domain in domains {
        *domain = domain.trim().to_lowercase();
    }
}

fn validate_domain(domain: &str, owner: &str) -> Result<(), ConfigError> {
    if domain.is_empty()
        || domain.starts_with("www.")
        || domain != domain.trim()
        || domain.chars().any(char::is_uppercase)
    {
        return Err(ConfigError::Validation(format!(
            "{owner} has invalid domain '{domain}'; use the lowercase bare host without www."
        )));
    }
    Ok(())
}

fn validate_catalog(catalog: &StoreCatalog) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut domain_owner: HashMap<String, &str> = HashMap::new();

    for store in &catalog.stores {
        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(store.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store name: '{}'",
                store.name
            )));
        }

        if store.domains.is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has no domains",
                store.name
            )));
        }

        for domain in &store.domains {
            validate_domain(domain, &format!("store '{}'", store.name))?;
            if let Some(owner) = domain_owner.insert(domain.clone(), &store.name) {
                return Err(ConfigError::Validation(format!(
                    "domain '{domain}' is claimed by both '{owner}' and '{}'",
                    store.name
                )));
            }
        }

        if let Some(template) = &store.search_url {
            if !template.contains(QUERY_PLACEHOLDER) {
                return Err(ConfigError::Validation(format!(
                    "store '{}' search_url must contain {QUERY_PLACEHOLDER}",
                    store.name
                )));
            }
        }
    }

    for domain in &catalog.shopping_domains {
        validate_domain(domain, "shopping_domains")?;
    }

    Ok(())
}

/// `(name, domains, product patterns, search url)`
type StoreRow = (
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
    Option<&'static str>,
);

const BUILTIN_STORES: &[StoreRow] = &[
    (
        "Amazon",
        &["amazon.com"],
        &["/dp/", "/gp/product/"],
        Some("https://www.amazon.com/s?k={query}"),
    ),
    (
        "Target",
        &["target.com"],
        &["/p/"],
        Some("https://www.target.com/s?searchTerm={query}"),
    ),
    (
        "Nordstrom",
        &["nordstrom.com"],
        &["/s/"],
        Some("https://www.nordstrom.com/sr?keyword={query}"),
    ),
    (
        "ASOS",
        &["asos.com"],
        &["/prd/"],
        Some("https://www.asos.com/us/search/?q={query}"),
    ),
    ("Walmart", &["walmart.com"], &["/ip/"], None),
    ("Macy's", &["macys.com"], &["/shop/product/"], None),
    ("Bloomingdale's", &["bloomingdales.com"], &["/shop/product/"], None),
    (
        "Zara",
        &["zara.com"],
        &["-p0", "-p1", "-p2", "-p3", "-p4", "-p5", "-p6", "-p7", "-p8", "-p9"],
        None,
    ),
    ("H&M", &["hm.com"], &["/productpage."], None),
    ("Uniqlo", &["uniqlo.com"], &["/products/"], None),
    ("Gap", &["gap.com"], &["/browse/product.do"], None),
    ("Old Navy", &["oldnavy.gap.com", "oldnavy.com"], &["/browse/product.do"], None),
    (
        "Banana Republic",
        &["bananarepublic.gap.com", "bananarepublic.com"],
        &["/browse/product.do"],
        None,
    ),
    ("Revolve", &["revolve.com"], &["/dp/"], None),
    ("Shopbop", &["shopbop.com"], &["/vp/"], None),
    ("SSENSE", &["ssense.com"], &["/product/"], None),
    ("Farfetch", &["farfetch.com"], &["-item-"], None),
    ("NET-A-PORTER", &["net-a-porter.com"], &["/product/"], None),
    ("Saks Fifth Avenue", &["saksfifthavenue.com"], &["/product/"], None),
    ("Neiman Marcus", &["neimanmarcus.com"], &["/p/"], None),
    ("Anthropologie", &["anthropologie.com"], &["/shop/"], None),
    ("Urban Outfitters", &["urbanoutfitters.com"], &["/shop/"], None),
    ("Free People", &["freepeople.com"], &["/shop/"], None),
    ("Madewell", &["madewell.com"], &["/p/"], None),
    ("J.Crew", &["jcrew.com"], &["/p/"], None),
    ("Everlane", &["everlane.com"], &["/products/"], None),
    ("Lulus", &["lulus.com"], &["/products/"], None),
    ("Nike", &["nike.com"], &["/t/"], None),
    ("Kohl's", &["kohls.com"], &["/product/prd-"], None),
    ("Etsy", &["etsy.com"], &["/listing/"], None),
    ("eBay", &["ebay.com"], &["/itm/"], None),
];

const BUILTIN_SHOPPING_DOMAINS: &[&str] = &[
    "abercrombie.com",
    "adidas.com",
    "ae.com",
    "aritzia.com",
    "boohoo.com",
    "express.com",
    "fashionnova.com",
    "hollisterco.com",
    "loft.com",
    "mango.com",
    "prettylittlething.com",
    "quince.com",
    "thereformation.com",
    "shein.com",
    "torrid.com",
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn build_builtin() -> StoreCatalog {
    StoreCatalog {
        stores: BUILTIN_STORES
            .iter()
            .map(|(name, domains, patterns, search_url)| StoreEntry {
                name: (*name).to_string(),
                domains: to_strings(domains),
                product_patterns: to_strings(patterns),
                search_url: search_url.map(str::to_string),
            })
            .collect(),
        shopping_domains: to_strings(BUILTIN_SHOPPING_DOMAINS),
    }
}

#[cfg(test)]
#[path = "stores_test.rs"]
mod tests;
