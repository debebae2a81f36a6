//! Content extraction orchestration.
//!
//! Ties the pipeline together for one document: parse once, run global
//! cleanup once, then resolve each declared field against a tree that has
//! seen that field's own cleanup rules (on a private copy, so sibling
//! fields are unaffected) and the safety backstop.
//!
//! The caller-supplied HTML and `ParserConfig` are never mutated; all
//! deletions happen on working copies owned by this call.

use std::collections::HashMap;

use tracing::debug;

use crate::cleanup;
use crate::config::{ParserConfig, CONTENT_FIELD};
use crate::dom::{self, Document};
use crate::error::{Error, Result};
use crate::resolver;
use crate::result::ExtractionResult;

/// Extract every declared field of `config` from `html`.
///
/// Fails with [`Error::EmptyDocument`] for empty input and
/// [`Error::NoContent`] when the mandatory content field exhausts its
/// fallback chain. Optional-field exhaustion is recorded in the trace only.
pub(crate) fn extract_fields(html: &str, config: &ParserConfig) -> Result<ExtractionResult> {
    if html.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }

    let base = dom::parse(html);
    cleanup::apply_global(&base, &config.cleanup)?;

    // Fields with their own rules get a private copy of the globally-cleaned
    // tree, taken before the safety pass so their pass order stays
    // global -> field -> safety.
    let mut private_trees: HashMap<&str, Document> = HashMap::new();
    for (name, field) in config.fields() {
        if !field.cleanup.is_empty() {
            private_trees.insert(name, dom::clone_document(&base));
        }
    }
    cleanup::apply_safety(&base);

    let mut result = ExtractionResult::default();
    for (name, field) in config.fields() {
        let (value, trace) = match private_trees.get(name) {
            Some(tree) => {
                cleanup::apply_field(tree, name, &field.cleanup)?;
                cleanup::apply_safety(tree);
                resolver::resolve(tree, name, field)?
            }
            None => resolver::resolve(&base, name, field)?,
        };

        if name == CONTENT_FIELD && value.is_none() {
            return Err(Error::NoContent);
        }
        result.record(name, value, trace);
    }

    debug!(
        domain = %config.domain,
        resolved = result.fields.len(),
        declared = result.trace.len(),
        "extraction complete"
    );
    Ok(result)
}
