use super::*;

#[test]
fn parses_search_with_filters() {
    let cli = Cli::try_parse_from([
        "wardrobe",
        "search",
        "black midi dress",
        "--budget-max",
        "80",
        "--store",
        "Target",
        "--store",
        "ASOS",
        "--size",
        "M",
        "--estimate-prices",
    ])
    .expect("expected valid cli args");

    let Commands::Search { query, filters } = cli.command else {
        panic!("expected search command");
    };
    assert_eq!(query, "black midi dress");
    assert_eq!(filters.budget_max, Some(80.0));
    assert_eq!(filters.prefer_stores, vec!["Target", "ASOS"]);
    assert_eq!(filters.size.as_deref(), Some("M"));
    assert!(filters.estimate_prices);
    assert_eq!(filters.max_results, None);
}

#[test]
fn search_requires_query() {
    assert!(Cli::try_parse_from(["wardrobe", "search"]).is_err());
}

#[test]
fn parses_outfit_pieces() {
    let cli = Cli::try_parse_from([
        "wardrobe",
        "outfit",
        "--piece",
        "white linen shirt",
        "--piece",
        "wide leg jeans",
        "--max-results",
        "3",
    ])
    .expect("expected valid cli args");

    let Commands::Outfit { pieces, filters } = cli.command else {
        panic!("expected outfit command");
    };
    assert_eq!(pieces, vec!["white linen shirt", "wide leg jeans"]);
    assert_eq!(filters.max_results, Some(3));
}

#[test]
fn outfit_requires_a_piece() {
    assert!(Cli::try_parse_from(["wardrobe", "outfit"]).is_err());
}

#[test]
fn parses_classify_urls() {
    let cli = Cli::try_parse_from([
        "wardrobe",
        "classify",
        "https://www.amazon.com/dp/B1",
        "https://youtu.be/x",
    ])
    .expect("expected valid cli args");

    assert!(matches!(cli.command, Commands::Classify { ref urls } if urls.len() == 2));
}

#[test]
fn parses_curate_with_global_stores_flag() {
    let cli = Cli::try_parse_from([
        "wardrobe",
        "curate",
        "--file",
        "answer.json",
        "--query",
        "slip dress",
        "--stores",
        "config/stores.yaml",
        "--min-relevance",
        "20",
    ])
    .expect("expected valid cli args");

    assert_eq!(cli.stores, Some(PathBuf::from("config/stores.yaml")));
    let Commands::Curate {
        file,
        query,
        filters,
    } = cli.command
    else {
        panic!("expected curate command");
    };
    assert_eq!(file, PathBuf::from("answer.json"));
    assert_eq!(query, "slip dress");
    assert_eq!(filters.min_relevance, Some(20));
}

#[test]
fn min_relevance_above_100_is_rejected() {
    let result = Cli::try_parse_from([
        "wardrobe",
        "curate",
        "--file",
        "a.json",
        "--query",
        "q",
        "--min-relevance",
        "101",
    ]);
    assert!(result.is_err());
}

#[test]
fn build_options_uses_default_max_when_unset() {
    let filters = Filters {
        prefer_stores: vec!["Amazon".to_owned()],
        ..Filters::default()
    };
    let options = commands::build_options("  jeans ", &filters, 7);
    assert_eq!(options.query, "jeans");
    assert_eq!(options.max_results, 7);
    assert_eq!(options.prefer_stores, vec!["Amazon"]);
    assert!(!options.estimate_missing_prices);
}

#[test]
fn strict_min_relevance_curates_to_search_links_not_empty() {
    let filters = Filters {
        min_relevance: Some(100),
        ..Filters::default()
    };
    let options = commands::build_options("black wrap dress", &filters, 10);
    assert_eq!(options.min_relevance, Some(100));

    let response: wardrobe_shopping::ProviderResponse = serde_json::from_str(
        r#"{"citations": [{"url": "https://www.amazon.com/dp/B1", "title": "Phone Case"}]}"#,
    )
    .expect("valid provider response");
    let records = wardrobe_shopping::curate_response(
        &response,
        &options,
        wardrobe_core::StoreCatalog::builtin(),
    );

    assert!(!records.is_empty());
    assert!(records
        .iter()
        .all(|r| r.kind == wardrobe_core::ResultKind::SearchLink));
}

#[test]
fn load_catalog_defaults_to_builtin() {
    let catalog = commands::load_catalog(None).expect("builtin catalog");
    assert_eq!(&catalog, wardrobe_core::StoreCatalog::builtin());
}

#[test]
fn load_catalog_reports_missing_file() {
    let err = commands::load_catalog(Some(std::path::Path::new("/nonexistent/stores.yaml")))
        .unwrap_err();
    assert!(format!("{err:#}").contains("failed to load store catalog"));
}
