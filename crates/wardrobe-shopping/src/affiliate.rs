//! Affiliate-redirect unwrapping.
//!
//! Commission-tracking networks wrap the retailer URL in a query parameter.
//! Unwrapping must run before classification: the classifier's banned-domain
//! check only sees affiliate hosts that could not be unwrapped, while
//! unwrapped URLs are validated against their real destination.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use reqwest::Url;

use crate::classify::normalized_host;

/// A known affiliate network and the query parameter it carries the
/// destination in.
#[derive(Debug)]
pub(crate) struct AffiliateNetwork {
    /// Matched as a substring of the normalized host.
    pub domain: &'static str,
    pub param: &'static str,
}

pub(crate) const AFFILIATE_NETWORKS: &[AffiliateNetwork] = &[
    AffiliateNetwork { domain: "rakuten.com", param: "u" },
    AffiliateNetwork { domain: "linksynergy.com", param: "murl" },
    AffiliateNetwork { domain: "shareasale.com", param: "urllink" },
    AffiliateNetwork { domain: "awin1.com", param: "ued" },
    AffiliateNetwork { domain: "skimresources.com", param: "url" },
    AffiliateNetwork { domain: "redirectingat.com", param: "url" },
    AffiliateNetwork { domain: "viglink.com", param: "u" },
    AffiliateNetwork { domain: "anrdoezrs.net", param: "url" },
    AffiliateNetwork { domain: "jdoqocy.com", param: "url" },
    AffiliateNetwork { domain: "tkqlhce.com", param: "url" },
    AffiliateNetwork { domain: "dpbolvw.net", param: "url" },
    AffiliateNetwork { domain: "kqzyfj.com", param: "url" },
    AffiliateNetwork { domain: "shopstyle.com", param: "url" },
    AffiliateNetwork { domain: "rstyle.me", param: "url" },
    AffiliateNetwork { domain: "howl.me", param: "url" },
    AffiliateNetwork { domain: "pntra.com", param: "url" },
    AffiliateNetwork { domain: "sovrn.com", param: "u" },
    AffiliateNetwork { domain: "narrativ.com", param: "url" },
    AffiliateNetwork { domain: "avantlink.com", param: "url" },
    AffiliateNetwork { domain: "sjv.io", param: "u" },
];

/// Common redirect parameter names tried after the network-specific one.
const GENERIC_REDIRECT_PARAMS: &[&str] = &["url", "u", "link", "target", "goto", "redirect"];

/// Nested redirects deeper than this are left wrapped.
const MAX_UNWRAP_DEPTH: usize = 4;

/// Returns the destination URL if `url` is a recognizable affiliate redirect,
/// otherwise `url` unchanged.
///
/// Nested redirects are followed until a non-affiliate URL is reached, which
/// makes the operation idempotent. The unwrapper never fabricates a URL: when
/// no destination can be extracted, or the chain is deeper than
/// `MAX_UNWRAP_DEPTH`, the input is returned as-is and classification rejects
/// it via the banned-domain check.
#[must_use]
pub fn unwrap_affiliate_url(url: &str) -> String {
    let mut current = url.to_owned();
    for _ in 0..=MAX_UNWRAP_DEPTH {
        match unwrap_once(&current) {
            Some(next) => current = next,
            None => return current,
        }
    }
    tracing::debug!(
        url,
        max_depth = MAX_UNWRAP_DEPTH,
        "affiliate redirect chain too deep; leaving wrapped"
    );
    url.to_owned()
}

/// Returns `true` if `url`'s host belongs to a known affiliate network.
#[must_use]
pub fn is_affiliate_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| normalized_host(&u))
        .is_some_and(|host| network_for_host(&host).is_some())
}

fn network_for_host(host: &str) -> Option<&'static AffiliateNetwork> {
    AFFILIATE_NETWORKS.iter().find(|n| host.contains(n.domain))
}

/// Strips a single affiliate layer. `None` when `url` is not an affiliate
/// redirect or carries no usable destination.
fn unwrap_once(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = normalized_host(&parsed)?;
    let network = network_for_host(&host)?;

    let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();

    std::iter::once(network.param)
        .chain(GENERIC_REDIRECT_PARAMS.iter().copied())
        .filter_map(|name| {
            pairs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
        .find_map(decode_destination)
}

/// Accepts a parameter value as a destination only if it decodes to an
/// absolute http(s) URL with a host.
fn decode_destination(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.get(..4)?.eq_ignore_ascii_case("http") {
        return None;
    }

    // `query_pairs` already decoded one layer; some networks double-encode.
    let lower_prefix = trimmed.get(..8).unwrap_or(trimmed).to_ascii_lowercase();
    let decoded: Cow<'_, str> =
        if lower_prefix.starts_with("http%3a") || lower_prefix.starts_with("https%3a") {
            percent_decode_str(trimmed).decode_utf8().ok()?
        } else {
            Cow::Borrowed(trimmed)
        };

    let destination = Url::parse(&decoded).ok()?;
    if !matches!(destination.scheme(), "http" | "https") || destination.host_str().is_none() {
        return None;
    }
    Some(decoded.into_owned())
}
