//! Document cleanup pipeline.
//!
//! Three passes run in a fixed, significant order before field resolution:
//!
//! 1. **Global**: built-in noise tags plus the config's global rules,
//!    applied once to the working copy of the document.
//! 2. **Field**: a field's own rules, applied to that field's private copy
//!    immediately before it resolves, so sibling fields still see the
//!    original (globally-cleaned) tree.
//! 3. **Safety**: a fixed preset applied last as a backstop, guaranteeing a
//!    minimum noise bar even for configs that declare no rules at all.
//!
//! Removing a node that an earlier pass already removed (for example via an
//! ancestor) is a no-op.

use tracing::debug;

use crate::config::SelectorQuery;
use crate::dom::{self, Document, QueryResult};
use crate::error::Result;
use crate::presets::SAFETY_CLEANUP_SELECTORS;

/// Noise elements stripped from every document regardless of config.
const NOISE_TAG_SELECTOR: &str = "script, style, noscript, iframe, template, embed, object";

/// Pass 1: built-in noise tags plus the config's global rules.
pub fn apply_global(doc: &Document, rules: &[SelectorQuery]) -> Result<()> {
    doc.select(NOISE_TAG_SELECTOR).remove();
    let removed = apply_rules(doc, "cleanup", rules)?;
    debug!(rules = rules.len(), removed, "global cleanup applied");
    Ok(())
}

/// Pass 2: a field's own rules against its private working copy.
pub fn apply_field(doc: &Document, field: &str, rules: &[SelectorQuery]) -> Result<()> {
    let removed = apply_rules(doc, field, rules)?;
    debug!(field, rules = rules.len(), removed, "field cleanup applied");
    Ok(())
}

/// Pass 3: the fixed safety preset. Always runs last.
pub fn apply_safety(doc: &Document) {
    for selector in SAFETY_CLEANUP_SELECTORS {
        doc.select(selector).remove();
    }
}

/// Remove every node matched by the given rules; returns how many matched.
fn apply_rules(doc: &Document, scope: &str, rules: &[SelectorQuery]) -> Result<usize> {
    let mut removed = 0;
    for rule in rules {
        match dom::query(doc, scope, rule, None)? {
            QueryResult::Nodes(nodes) => {
                removed += nodes.len();
                for node in &nodes {
                    dom::remove_node(node);
                }
            }
            // a value-producing rule (e.g. `//x/@y`) selects no removable node
            QueryResult::Values(_) => {}
        }
    }
    Ok(removed)
}
