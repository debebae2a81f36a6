//! DOM adapter over the dom_query crate.
//!
//! One parsed document serves both query languages: CSS runs through
//! dom_query matchers, XPath through the in-crate subset engine walking the
//! same node tree. Configs mixing both styles for a single field therefore
//! never pay a second parse, and cleanup deletions are visible to every
//! subsequent query regardless of language.

use dom_query::Matcher;

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};
pub use tendril::StrTendril;

use crate::config::{SelectorKind, SelectorQuery};
use crate::error::{Error, Result};
use crate::xpath::{XPath, XPathValue};

/// Result of running one [`SelectorQuery`]: element nodes, or strings when
/// an XPath expression ends in a value step (`/@attr`, `/text()`).
#[derive(Debug)]
pub enum QueryResult<'a> {
    /// Matched element nodes in document order.
    Nodes(Vec<NodeRef<'a>>),
    /// Pre-extracted values; no node left to inspect.
    Values(Vec<String>),
}

impl QueryResult<'_> {
    /// True when the query matched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            QueryResult::Nodes(nodes) => nodes.is_empty(),
            QueryResult::Values(values) => values.is_empty(),
        }
    }
}

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Clone a document by re-serializing it; used to give each field its own
/// working copy when field-scoped cleanup must not affect sibling fields.
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}

/// Run a single query against the document, optionally scoped to a node.
///
/// CSS and XPath are dispatched against the same tree. Scoped queries never
/// match outside the scope subtree, whichever language they are written in.
pub fn query<'a>(
    doc: &'a Document,
    field: &str,
    selector: &SelectorQuery,
    scope: Option<NodeRef<'a>>,
) -> Result<QueryResult<'a>> {
    match selector.kind.resolve(&selector.query) {
        SelectorKind::Css => {
            let matcher = compile_css(field, &selector.query)?;
            let selection = match scope {
                Some(node) => Selection::from(node).select_matcher(&matcher),
                None => doc.select_matcher(&matcher),
            };
            Ok(QueryResult::Nodes(selection.nodes().to_vec()))
        }
        SelectorKind::XPath | SelectorKind::Auto => {
            let xpath = XPath::parse(&selector.query).map_err(|err| {
                Error::selector_syntax(field, &selector.query, SelectorKind::XPath, err)
            })?;
            let context = scope.unwrap_or_else(|| doc.root());
            Ok(match xpath.evaluate(context) {
                XPathValue::Nodes(nodes) => QueryResult::Nodes(nodes),
                XPathValue::Strings(values) => QueryResult::Values(values),
            })
        }
    }
}

/// Compile a CSS selector, mapping parse failures to `SelectorSyntax`.
pub(crate) fn compile_css(field: &str, query: &str) -> Result<Matcher> {
    Matcher::new(query)
        .map_err(|err| Error::selector_syntax(field, query, SelectorKind::Css, format!("{err:?}")))
}

/// Validate a CSS selector without running it; used at config load.
pub fn validate_css(field: &str, query: &str) -> Result<()> {
    compile_css(field, query).map(|_| ())
}

// === Node helpers ===

/// Get an attribute value off a raw node.
#[must_use]
pub(crate) fn node_attr(node: &NodeRef<'_>, name: &str) -> Option<String> {
    node.attrs()
        .iter()
        .find(|attr| (*attr.name.local).eq_ignore_ascii_case(name))
        .map(|attr| attr.value.to_string())
}

/// Text content of a node and its descendants.
#[inline]
#[must_use]
pub(crate) fn node_text(node: &NodeRef<'_>) -> StrTendril {
    Selection::from(*node).text()
}

/// Serialized inner markup of a node.
#[inline]
#[must_use]
pub(crate) fn node_inner_html(node: &NodeRef<'_>) -> StrTendril {
    Selection::from(*node).inner_html()
}

/// Detach a node (and its subtree) from the tree. Detaching an
/// already-removed node is a no-op.
#[inline]
pub(crate) fn remove_node(node: &NodeRef<'_>) {
    Selection::from(*node).remove();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(query: &str) -> SelectorQuery {
        SelectorQuery::new(query.to_string())
    }

    #[test]
    fn test_css_and_xpath_hit_the_same_tree() {
        let doc = parse(r#"<div id="main"><p class="x">one</p><p>two</p></div>"#);

        let via_css = query(&doc, "t", &sq("p.x"), None).unwrap();
        let via_xpath = query(&doc, "t", &sq("//p[@class='x']"), None).unwrap();

        match (via_css, via_xpath) {
            (QueryResult::Nodes(a), QueryResult::Nodes(b)) => {
                assert_eq!(a.len(), 1);
                assert_eq!(b.len(), 1);
                assert_eq!(a[0].id, b[0].id);
            }
            _ => panic!("expected node results"),
        }
    }

    #[test]
    fn test_removal_is_visible_to_both_languages() {
        let doc = parse(r#"<div><span class="ad">ad</span><p>content</p></div>"#);
        doc.select(".ad").remove();

        assert!(query(&doc, "t", &sq("span.ad"), None).unwrap().is_empty());
        assert!(query(&doc, "t", &sq("//span[@class='ad']"), None).unwrap().is_empty());
    }

    #[test]
    fn test_scoped_css_query_stays_inside_scope() {
        let doc = parse(
            r#"<nav><a href="/nav">nav</a></nav><div class="byline"><a href="/a">A</a></div>"#,
        );
        let byline = match query(&doc, "t", &sq(".byline"), None).unwrap() {
            QueryResult::Nodes(nodes) => nodes[0],
            QueryResult::Values(_) => panic!("expected nodes"),
        };

        match query(&doc, "t", &sq("a"), Some(byline)).unwrap() {
            QueryResult::Nodes(nodes) => {
                assert_eq!(nodes.len(), 1);
                assert_eq!(node_attr(&nodes[0], "href").as_deref(), Some("/a"));
            }
            QueryResult::Values(_) => panic!("expected nodes"),
        }
    }

    #[test]
    fn test_attribute_tail_produces_values() {
        let doc = parse(r#"<time datetime="2024-01-01">Jan 1</time>"#);
        match query(&doc, "t", &sq("//time/@datetime"), None).unwrap() {
            QueryResult::Values(values) => assert_eq!(values, vec!["2024-01-01"]),
            QueryResult::Nodes(_) => panic!("expected values"),
        }
    }

    #[test]
    fn test_invalid_css_names_the_field() {
        let err = query(&parse("<p></p>"), "title", &sq("p[unclosed"), None).unwrap_err();
        match err {
            Error::SelectorSyntax { field, kind, .. } => {
                assert_eq!(field, "title");
                assert_eq!(kind, SelectorKind::Css);
            }
            other => panic!("expected SelectorSyntax, got {other:?}"),
        }
    }

    #[test]
    fn test_clone_document_is_independent() {
        let doc = parse(r#"<div id="original">content</div>"#);
        let cloned = clone_document(&doc);

        cloned.select("#original").remove();
        assert!(doc.select("#original").exists());
        assert!(!cloned.select("#original").exists());
    }
}
