//! Heuristic field extraction from a candidate's title and snippet.
//!
//! Each heuristic is an independent function returning `Option` (or an
//! explicit confidence) so callers can tell scraped values from defaults.
//! See [`crate::normalize`] for how they compose into a [`ProductRecord`].
//!
//! [`ProductRecord`]: wardrobe_core::ProductRecord

use std::sync::LazyLock;

use regex::Regex;
use wardrobe_core::Confidence;

/// A price number: `1,299.99`, `42`, `39.5`.
const NUM: &str = r"(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)";

/// Listed-price patterns, tried in order.
static PRICE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"\$\s?{NUM}"),
        format!(r"(?i)\b{NUM}\s?USD\b"),
        format!(r"(?i)\bprice:\s*\$?\s?{NUM}"),
        format!(r"(?i)\b{NUM}\s+dollars\b"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid price regex"))
    .collect()
});

/// "was $X" / "originally $X" / "MSRP $X" and close variants.
static ORIGINAL_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:was|originally|orig\.?|msrp:?|reg\.?|list price:?)\s*\$\s?{NUM}"
    ))
    .expect("valid original price regex")
});

/// Rating patterns, tried in order.
static RATING_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(\d+(?:\.\d+)?)\s*/\s*5\s*stars?\b",
        r"(?i)\b(\d+(?:\.\d+)?)\s+out\s+of\s+5\b",
        r"(?i)\brating:\s*(\d+(?:\.\d+)?)",
        r"(?i)\b(\d+(?:\.\d+)?)\s*stars?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid rating regex"))
    .collect()
});

const OUT_OF_STOCK_PHRASES: &[&str] = &[
    "out of stock",
    "sold out",
    "unavailable",
    "discontinued",
    "not available",
];

const IN_STOCK_PHRASES: &[&str] = &["in stock", "available now", "ships today"];

const LUXURY_KEYWORDS: &[&str] = &["luxury", "designer"];
const BUDGET_KEYWORDS: &[&str] = &["budget", "cheap", "affordable"];

/// Synthetic price points used only when estimation is enabled.
const ESTIMATE_LUXURY: f64 = 250.0;
const ESTIMATE_BUDGET: f64 = 25.0;
const ESTIMATE_DEFAULT: f64 = 65.0;

/// `(category, title keywords)`, checked in order.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("dress", &["dress", "dresses", "gown", "gowns", "romper"]),
    (
        "top",
        &[
            "top", "tops", "shirt", "shirts", "blouse", "blouses", "tee", "tees", "sweater",
            "sweaters", "tank", "cardigan", "camisole", "bodysuit", "hoodie",
        ],
    ),
    (
        "bottom",
        &[
            "pants", "jeans", "trousers", "shorts", "leggings", "joggers", "chinos",
        ],
    ),
    ("skirt", &["skirt", "skirts"]),
    (
        "outerwear",
        &[
            "jacket", "jackets", "coat", "coats", "blazer", "blazers", "parka", "trench",
            "puffer", "vest",
        ],
    ),
    (
        "shoes",
        &[
            "shoe", "shoes", "sneaker", "sneakers", "boot", "boots", "heel", "heels", "sandal",
            "sandals", "loafer", "loafers", "flats", "pumps", "mules",
        ],
    ),
];

pub(crate) const DEFAULT_CATEGORY: &str = "clothing";

/// Parses the current listed price. Original-price phrases ("was $80") are
/// removed first so they are not mistaken for the current price.
#[must_use]
pub(crate) fn parse_listed_price(text: &str) -> Option<f64> {
    let without_original = ORIGINAL_PRICE_RE.replace_all(text, " ");
    PRICE_RES.iter().find_map(|re| {
        re.captures(&without_original)
            .and_then(|c| c.get(1))
            .and_then(|m| parse_number(m.as_str()))
    })
}

/// Parses a pre-sale price from "was $X" / "originally $X" / "MSRP $X".
#[must_use]
pub(crate) fn parse_original_price(text: &str) -> Option<f64> {
    ORIGINAL_PRICE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_number(m.as_str()))
}

/// Keyword-based synthetic price. Not a real price; callers must flag it.
#[must_use]
pub(crate) fn estimate_price(text: &str) -> f64 {
    let lower = text.to_lowercase();
    if LUXURY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ESTIMATE_LUXURY
    } else if BUDGET_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ESTIMATE_BUDGET
    } else {
        ESTIMATE_DEFAULT
    }
}

/// Whole-number discount percentage, only when `original > current` and the
/// rounded result is at least 1%.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn discount_percent(original: f64, current: f64) -> Option<u32> {
    if !(original > current && original > 0.0 && current >= 0.0) {
        return None;
    }
    let pct = ((original - current) / original * 100.0).round();
    // pct is in [0, 100] here.
    (pct >= 1.0).then_some(pct as u32)
}

/// Stock status. An out-of-stock phrase is definitive; otherwise the item is
/// assumed in stock, with high confidence only when an in-stock phrase exists.
#[must_use]
pub(crate) fn parse_stock(text: &str) -> (bool, Confidence) {
    let lower = text.to_lowercase();
    if OUT_OF_STOCK_PHRASES.iter().any(|p| lower.contains(p)) {
        (false, Confidence::High)
    } else if IN_STOCK_PHRASES.iter().any(|p| lower.contains(p)) {
        (true, Confidence::High)
    } else {
        (true, Confidence::Low)
    }
}

/// Star rating in `[0.0, 5.0]`. Out-of-range matches are ignored.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn parse_rating(text: &str) -> Option<f32> {
    RATING_RES.iter().find_map(|re| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|n| (0.0..=5.0).contains(n))
            .map(|n| n as f32)
    })
}

/// Coarse garment type from title keywords.
#[must_use]
pub(crate) fn categorize(title: &str) -> &'static str {
    let lower = title.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| tokens.iter().any(|t| keywords.contains(t)))
        .map_or(DEFAULT_CATEGORY, |(category, _)| *category)
}

/// `"$42"` for whole amounts, `"$39.99"` otherwise.
#[must_use]
pub(crate) fn format_price(value: f64) -> String {
    if (value - value.round()).abs() < 0.005 {
        format!("${value:.0}")
    } else {
        format!("${value:.2}")
    }
}

/// Display name for a host with no catalog entry:
/// `shop.cool-threads.co.uk` → `"Shop Cool Threads"`.
#[must_use]
pub(crate) fn format_unknown_store(host: &str) -> String {
    let mut labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() > 1 {
        labels.pop();
    }
    if labels.len() > 1
        && labels
            .last()
            .is_some_and(|l| matches!(*l, "co" | "com" | "org" | "net"))
    {
        labels.pop();
    }
    labels
        .iter()
        .flat_map(|l| l.split('-'))
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
