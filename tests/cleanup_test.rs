//! Ordering and scoping guarantees of the three cleanup passes.

use article_extractor::{extract, ParserConfig};

fn config(json: &str) -> ParserConfig {
    ParserConfig::from_json(json).unwrap()
}

#[test]
fn global_rule_nodes_are_gone_before_field_resolution() {
    // the content selector matches the promo div itself; after global
    // cleanup the chain must fall through to the article body
    let config = config(
        r#"{
            "domain": "t",
            "content": {"selector": [".promo", "article"]},
            "cleanup": [".promo"]
        }"#,
    );
    let html = r#"<html><body><div class="promo">AD</div><article>body text</article></body></html>"#;

    let result = extract(html, &config).unwrap();
    assert_eq!(result.get("content"), Some("body text"));
}

#[test]
fn builtin_noise_tags_never_reach_field_values() {
    let config = config(r#"{"domain": "t", "content": {"selector": "article"}}"#);
    let html = r#"
        <html><body><article>
            visible
            <script>var hidden = "SCRIPT_TEXT";</script>
            <style>.x { color: red }</style>
            <iframe src="/embed">IFRAME_TEXT</iframe>
        </article></body></html>
    "#;

    let content = extract(html, &config).unwrap().get("content").unwrap().to_string();
    assert!(content.contains("visible"));
    assert!(!content.contains("SCRIPT_TEXT"));
    assert!(!content.contains("color: red"));
    assert!(!content.contains("IFRAME_TEXT"));
}

#[test]
fn field_rules_apply_only_to_their_own_field() {
    let config = config(
        r#"{
            "domain": "t",
            "content": {"selector": "article", "cleanup": [".caption"]},
            "description": {"selector": ".caption"}
        }"#,
    );
    let html = r#"<html><body><article>text<span class="caption">photo credit</span></article></body></html>"#;

    let result = extract(html, &config).unwrap();
    assert!(!result.get("content").unwrap().contains("photo credit"));
    assert_eq!(result.get("description"), Some("photo credit"));
}

#[test]
fn field_rules_accept_xpath_expressions() {
    let config = config(
        r#"{
            "domain": "t",
            "content": {"selector": "article", "cleanup": ["//div[@class='related']"]}
        }"#,
    );
    let html = r#"<html><body><article>keep<div class="related">drop</div></article></body></html>"#;

    let result = extract(html, &config).unwrap();
    let content = result.get("content").unwrap();
    assert!(content.contains("keep"));
    assert!(!content.contains("drop"));
}

#[test]
fn safety_preset_applies_with_minimal_config() {
    // no global rules, no field rules: the fixed preset still removes
    // known noise patterns
    let config = config(r#"{"domain": "t", "content": {"selector": "article"}}"#);
    let html = r#"
        <html><body><article>
            article text
            <div class="google-auto-placed">INJECTED_AD</div>
            <div class="popup">SUBSCRIBE_POPUP</div>
            <div class="related">RELATED_LINKS</div>
        </article></body></html>
    "#;

    let content = extract(html, &config).unwrap().get("content").unwrap().to_string();
    assert!(content.contains("article text"));
    assert!(!content.contains("INJECTED_AD"));
    assert!(!content.contains("SUBSCRIBE_POPUP"));
    assert!(!content.contains("RELATED_LINKS"));
}

#[test]
fn rule_matching_removed_subtree_is_a_noop() {
    // the global rule removes the wrapper; the field rule then targets a
    // node inside the removed subtree and must not fail the extraction
    let config = config(
        r#"{
            "domain": "t",
            "content": {"selector": "article", "cleanup": [".inner"]},
            "cleanup": [".wrapper"]
        }"#,
    );
    let html = r#"<html><body><article>ok<div class="wrapper"><div class="inner">x</div></div></article></body></html>"#;

    let result = extract(html, &config).unwrap();
    assert_eq!(result.get("content"), Some("ok"));
}

#[test]
fn cleanup_rules_do_not_touch_other_branches() {
    let config = config(
        r#"{
            "domain": "t",
            "content": {"selector": "article"},
            "cleanup": ["article .social-share"]
        }"#,
    );
    let html = r#"
        <html><body>
            <article>body<div class="social-share">SHARE</div></article>
            <footer><div class="social-share">footer share kept out of scope</div></footer>
        </body></html>
    "#;

    let result = extract(html, &config).unwrap();
    assert!(!result.get("content").unwrap().contains("SHARE"));
}
