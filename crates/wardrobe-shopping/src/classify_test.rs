use super::*;
use wardrobe_core::StoreEntry;

fn builtin() -> &'static StoreCatalog {
    StoreCatalog::builtin()
}

// -----------------------------------------------------------------------
// is_product_page: rejections
// -----------------------------------------------------------------------

#[test]
fn social_and_shortener_urls_are_rejected() {
    let urls = [
        "https://www.youtube.com/watch?v=abc123",
        "https://youtu.be/abc123",
        "https://www.facebook.com/somebrand/posts/1",
        "https://www.instagram.com/p/CxYz/",
        "https://www.tiktok.com/@stylist/video/123",
        "https://www.pinterest.com/pin/12345/",
        "https://twitter.com/brand/status/1",
        "https://www.reddit.com/r/femalefashionadvice/comments/x",
        "https://amzn.to/3abcDEF",
        "https://bit.ly/dress",
        "https://tinyurl.com/y2abc",
    ];
    for url in urls {
        assert!(!is_product_page(url), "{url} should be rejected");
    }
}

#[test]
fn affiliate_redirects_are_rejected_when_left_wrapped() {
    let urls = [
        "https://rakuten.com/r/?id=42",
        "https://click.linksynergy.com/deeplink?id=abc",
        "https://www.shareasale.com/r.cfm?b=1",
        "https://www.awin1.com/cread.php?awinmid=1",
        "https://go.skimresources.com/?id=1",
        "https://go.redirectingat.com/?id=1",
        "https://redirect.viglink.com/?key=1",
        "https://www.anrdoezrs.net/click-1-2",
        "https://rstyle.me/n/abc/dp/B000123",
        "https://shopstyle.it.shopstyle.com/action/loadRetailerProductPage?id=1",
    ];
    for url in urls {
        assert!(!is_product_page(url), "{url} should be rejected");
    }
}

#[test]
fn affiliate_ban_beats_product_looking_path() {
    let verdict = classify_url(builtin(), "https://rstyle.me/n/abc/dp/B000123");
    assert_eq!(
        verdict,
        UrlVerdict::BannedDomain {
            host: "rstyle.me".to_owned(),
            rule: "rstyle.me",
        }
    );
}

#[test]
fn listing_and_search_paths_are_rejected() {
    let urls = [
        "https://store.com/collections/dresses",
        "https://www.shein.com/collections/dresses",
        "https://www.amazon.com/s/search?k=dress",
        "https://www.target.com/c/dresses-women/-/N-5xtcg",
        "https://www.nordstrom.com/browse/category/women/dresses",
        "https://www.asos.com/us/women/dresses/cat/?cid=8799&category=dresses",
        "https://www.everlane.com/collections/womens-dresses",
        "https://www.revolve.com/blog/spring-edit",
    ];
    for url in urls {
        assert!(!is_product_page(url), "{url} should be rejected");
    }
}

#[test]
fn banned_path_reports_the_matching_rule() {
    assert_eq!(
        classify_url(builtin(), "https://www.shein.com/collections/dresses"),
        UrlVerdict::BannedPath {
            host: "shein.com".to_owned(),
            rule: "/collections",
        }
    );
}

#[test]
fn malformed_input_fails_closed() {
    for url in ["", "not a url", "/dp/B000123", "mailto:shop@amazon.com", "ftp://amazon.com/dp/B1"] {
        assert_eq!(classify_url(builtin(), url), UrlVerdict::Malformed, "{url}");
        assert!(!is_product_page(url));
    }
}

#[test]
fn unknown_host_is_rejected() {
    assert_eq!(
        classify_url(builtin(), "https://www.random-boutique.example/item/123"),
        UrlVerdict::UnknownHost {
            host: "random-boutique.example".to_owned()
        }
    );
}

#[test]
fn known_store_without_product_shape_is_rejected() {
    assert_eq!(
        classify_url(builtin(), "https://www.amazon.com/gift-cards"),
        UrlVerdict::NotProductPath {
            store: "Amazon".to_owned()
        }
    );
}

// -----------------------------------------------------------------------
// is_product_page: acceptances
// -----------------------------------------------------------------------

#[test]
fn one_product_url_per_allowlisted_store_is_accepted() {
    let cases = [
        ("Amazon", "https://www.amazon.com/Wrap-Dress/dp/B08XYZ1234"),
        ("Target", "https://www.target.com/p/women-s-midi-dress/-/A-87654321"),
        ("Nordstrom", "https://www.nordstrom.com/s/satin-slip-dress/7123456"),
        ("ASOS", "https://www.asos.com/us/asos-design/satin-midi-dress/prd/203456"),
        ("Walmart", "https://www.walmart.com/ip/Time-and-Tru-Dress/123456"),
        ("Macy's", "https://www.macys.com/shop/product/calvin-klein-dress?ID=1"),
        ("Bloomingdale's", "https://www.bloomingdales.com/shop/product/aqua-dress?ID=2"),
        ("Zara", "https://www.zara.com/us/en/satin-midi-dress-p02731169.html"),
        ("H&M", "https://www2.hm.com/en_us/productpage.1234567001.html"),
        ("Uniqlo", "https://www.uniqlo.com/us/en/products/E455786-000"),
        ("Gap", "https://www.gap.com/browse/product.do?pid=123"),
        ("Old Navy", "https://oldnavy.gap.com/browse/product.do?pid=456"),
        ("Banana Republic", "https://bananarepublic.gap.com/browse/product.do?pid=789"),
        ("Revolve", "https://www.revolve.com/lpa-dress/dp/LPAR-WD123/"),
        ("Shopbop", "https://www.shopbop.com/midi-dress/vp/v=1/1234.htm"),
        ("SSENSE", "https://www.ssense.com/en-us/women/product/totokaelo/dress/123"),
        ("Farfetch", "https://www.farfetch.com/shopping/women/dress-item-12345.aspx"),
        ("NET-A-PORTER", "https://www.net-a-porter.com/en-us/shop/product/khaite/dress/123"),
        ("Saks Fifth Avenue", "https://www.saksfifthavenue.com/product/theory-dress-0400.html"),
        ("Neiman Marcus", "https://www.neimanmarcus.com/p/milly-dress-prod123"),
        ("Anthropologie", "https://www.anthropologie.com/shop/the-somerset-maxi-dress"),
        ("Urban Outfitters", "https://www.urbanoutfitters.com/shop/uo-slip-dress"),
        ("Free People", "https://www.freepeople.com/shop/adella-slip"),
        ("Madewell", "https://www.madewell.com/p/womens/clothing/dresses/tiered-dress/NL123/"),
        ("J.Crew", "https://www.jcrew.com/p/womens/slip-dress/BE123"),
        ("Everlane", "https://www.everlane.com/products/womens-linen-dress"),
        ("Lulus", "https://www.lulus.com/products/black-midi-dress/123.html"),
        ("Nike", "https://www.nike.com/t/dri-fit-dress-AbC123"),
        ("Kohl's", "https://www.kohls.com/product/prd-5512345/womens-dress.jsp"),
        ("Etsy", "https://www.etsy.com/listing/123456/linen-dress"),
        ("eBay", "https://www.ebay.com/itm/123456789"),
    ];
    for (store, url) in cases {
        assert_eq!(
            classify_url(builtin(), url),
            UrlVerdict::Product {
                store: store.to_owned()
            },
            "{url}"
        );
        assert!(is_product_page(url), "{url} should be accepted");
    }
}

#[test]
fn every_builtin_store_has_an_acceptance_case() {
    // Add an acceptance case above for every new store.
    assert_eq!(builtin().stores.len(), 31);
}

#[test]
fn whitelisted_shopping_domain_is_soft_accepted() {
    let verdict = classify_url(builtin(), "https://www.aritzia.com/us/en/product/effortless-pant/80012");
    assert_eq!(
        verdict,
        UrlVerdict::SoftAccepted {
            host: "aritzia.com".to_owned()
        }
    );
    assert!(verdict.is_accepted());
}

#[test]
fn host_matching_is_case_insensitive() {
    assert!(is_product_page("https://WWW.AMAZON.COM/dp/B000123"));
}

// -----------------------------------------------------------------------
// classify_url: custom catalogs
// -----------------------------------------------------------------------

#[test]
fn store_with_no_patterns_accepts_any_clean_path() {
    let catalog = StoreCatalog {
        stores: vec![StoreEntry {
            name: "Tiny Shop".to_owned(),
            domains: vec!["tinyshop.example".to_owned()],
            product_patterns: vec![],
            search_url: None,
        }],
        shopping_domains: vec![],
    };

    assert_eq!(
        classify_url(&catalog, "https://tinyshop.example/linen-top"),
        UrlVerdict::Product {
            store: "Tiny Shop".to_owned()
        }
    );
    assert_eq!(
        classify_url(&catalog, "https://tinyshop.example/collections/all").label(),
        "banned_path"
    );
    // Not in this catalog, so builtin stores are unknown here.
    assert_eq!(
        classify_url(&catalog, "https://www.amazon.com/dp/B000123").label(),
        "unknown_host"
    );
}

#[test]
fn labels_are_stable() {
    assert_eq!(UrlVerdict::Malformed.label(), "malformed");
    assert_eq!(
        UrlVerdict::SoftAccepted {
            host: "x".to_owned()
        }
        .label(),
        "soft_accepted"
    );
}

#[test]
fn verdict_serializes_with_label_tag() {
    let json = serde_json::to_value(UrlVerdict::BannedPath {
        host: "shein.com".to_owned(),
        rule: "/collections",
    })
    .unwrap();
    assert_eq!(json["verdict"], "banned_path");
    assert_eq!(json["host"], "shein.com");
    assert_eq!(json["rule"], "/collections");
}
