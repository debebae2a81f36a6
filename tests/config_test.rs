//! Config loading, validation, and registry behavior.

use article_extractor::{ConfigRegistry, Error, ParserConfig, SelectorKind};

#[test]
fn selector_syntax_error_names_field_and_expression() {
    let err = ParserConfig::from_json(
        r#"{
            "domain": "example.com",
            "content": {"selector": "article"},
            "tags": {"selector": ["a[rel='tag']", "//a[@rel="], "all": true}
        }"#,
    )
    .unwrap_err();

    match err {
        Error::SelectorSyntax { field, expression, kind, .. } => {
            assert_eq!(field, "tags");
            assert_eq!(expression, "//a[@rel=");
            assert_eq!(kind, SelectorKind::XPath);
        }
        other => panic!("expected SelectorSyntax, got {other:?}"),
    }
}

#[test]
fn cleanup_rules_are_validated_too() {
    let err = ParserConfig::from_json(
        r#"{
            "domain": "example.com",
            "content": {"selector": "article"},
            "cleanup": ["div[bad"]
        }"#,
    )
    .unwrap_err();

    assert!(matches!(err, Error::SelectorSyntax { .. }));
}

#[test]
fn explicit_selector_type_overrides_auto_detection() {
    // a query not starting with `/` can still be forced to XPath
    let config = ParserConfig::from_json(
        r#"{
            "domain": "example.com",
            "content": {"selector": [{"query": ".//article", "selector_type": "xpath"}]}
        }"#,
    )
    .unwrap();

    assert_eq!(config.content.candidates[0].kind, SelectorKind::XPath);
}

#[test]
fn config_round_trips_through_json() {
    let original = ParserConfig::from_json(
        r#"{
            "domain": "example.com",
            "lang": "vi",
            "type": "blog",
            "title": {"selector": ["h1.title", "//h1"]},
            "content": {"selector": ".body", "type": "html", "cleanup": [".ads"]},
            "tags": {"selector": "a[rel='tag']", "all": true},
            "cleanup": [".newsletter"]
        }"#,
    )
    .unwrap();

    let json = serde_json::to_string(&original).unwrap();
    let reloaded = ParserConfig::from_json(&json).unwrap();
    assert_eq!(original, reloaded);
}

#[test]
fn registry_loads_nested_config_tree() {
    let dir = tempfile::tempdir().unwrap();
    for (rel, domain) in [("en/e/example.com.json", "example.com"), ("vi/n/news.vn.json", "news.vn")]
    {
        let path = dir.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            format!(r#"{{"domain": "{domain}", "content": {{"selector": "article"}}}}"#),
        )
        .unwrap();
    }

    let registry = ConfigRegistry::load_dir(dir.path()).unwrap();
    assert_eq!(registry.len(), 2);
    assert!(registry.get("example.com").is_some());
    assert!(registry.get("news.vn").is_some());

    let mut domains: Vec<_> = registry.domains().collect();
    domains.sort_unstable();
    assert_eq!(domains, ["example.com", "news.vn"]);
}

#[test]
fn registry_configs_are_shared_not_copied_per_call() {
    let mut registry = ConfigRegistry::new();
    registry
        .insert(
            ParserConfig::from_json(
                r#"{"domain": "example.com", "content": {"selector": "article"}}"#,
            )
            .unwrap(),
        )
        .unwrap();

    let first = registry.get("example.com").unwrap();
    let second = registry.get("example.com").unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn registry_generic_fallback_is_usable_end_to_end() {
    let registry = ConfigRegistry::new();
    let config = registry.get_or_generic("unconfigured.example");

    let html = r#"<html><body><article><h1>T</h1>Some body text.</article></body></html>"#;
    let result = article_extractor::extract(html, &config).unwrap();
    assert!(result.get("content").unwrap().contains("Some body text."));
}

#[test]
fn parser_config_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ParserConfig>();
    assert_send_sync::<std::sync::Arc<ParserConfig>>();
}
