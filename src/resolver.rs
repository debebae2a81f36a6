//! Fallback-chain selector resolution.
//!
//! Candidates are tried strictly in declaration order; the first one that
//! yields a non-empty value wins and resolution stops immediately. Values
//! are never merged across candidates. Exhaustion is a normal terminal
//! state recorded in the trace, not an error -- whether an exhausted field
//! is fatal is the caller's decision.

use tracing::{debug, trace};

use crate::config::{ExtractMode, FieldSelector, SelectorQuery};
use crate::dom::{self, Document, NodeRef, QueryResult};
use crate::error::Result;
use crate::result::{FieldValue, Resolution};
use crate::text::normalize_whitespace;

/// Resolve one field against a cleaned document.
pub(crate) fn resolve(
    doc: &Document,
    field: &str,
    selector: &FieldSelector,
) -> Result<(Option<FieldValue>, Resolution)> {
    for (index, candidate) in selector.candidates.iter().enumerate() {
        // Parent scoping: the parent query always narrows to a single node.
        // Zero parent matches skips the candidate; it is not a hard failure.
        let scope = match &candidate.parent {
            Some(parent) => match dom::query(doc, field, parent, None)? {
                QueryResult::Nodes(nodes) => match nodes.first() {
                    Some(node) => Some(*node),
                    None => {
                        trace!(field, candidate = index, "parent scope matched nothing");
                        continue;
                    }
                },
                // a value-producing parent query cannot scope anything
                QueryResult::Values(_) => continue,
            },
            None => None,
        };

        let values = match dom::query(doc, field, candidate, scope)? {
            // XPath value steps (`/@attr`, `/text()`) arrive pre-extracted
            QueryResult::Values(raw) => raw
                .into_iter()
                .map(|value| normalize_whitespace(&value))
                .filter(|value| !value.is_empty())
                .collect(),
            QueryResult::Nodes(nodes) => extract_from_nodes(selector, candidate, &nodes),
        };

        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            continue;
        };

        debug!(field, candidate = index, kind = %candidate.kind, "field resolved");
        let value = if selector.multi {
            FieldValue::Many(std::iter::once(first).chain(values).collect())
        } else {
            FieldValue::Single(first)
        };
        return Ok((Some(value), Resolution::Matched { candidate: index, kind: candidate.kind }));
    }

    debug!(field, candidates = selector.candidates.len(), "fallback chain exhausted");
    Ok((None, Resolution::Exhausted))
}

/// Pull values out of matched nodes according to the effective extraction
/// mode. A present attribute name (candidate-level first, then field-level
/// default) always means attribute extraction, whatever `type` says; nodes
/// missing the attribute are skipped so the chain can continue.
fn extract_from_nodes(
    selector: &FieldSelector,
    candidate: &SelectorQuery,
    nodes: &[NodeRef<'_>],
) -> Vec<String> {
    let attribute = candidate.attribute.as_deref().or(selector.attribute.as_deref());
    let mut values = Vec::new();

    for node in nodes {
        let value = if let Some(name) = attribute {
            match dom::node_attr(node, name) {
                Some(raw) => normalize_whitespace(&raw),
                None => continue,
            }
        } else {
            match selector.extract_as {
                ExtractMode::Text => normalize_whitespace(&dom::node_text(node)),
                ExtractMode::Html => dom::node_inner_html(node).trim().to_string(),
                // load-time validation guarantees an attribute name exists
                ExtractMode::Attribute => continue,
            }
        };
        if value.is_empty() {
            continue;
        }
        values.push(value);
        if !selector.multi {
            break;
        }
    }
    values
}
