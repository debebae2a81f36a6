//! # article-extractor
//!
//! Configuration-driven article extraction and chunking for retrieval
//! pipelines.
//!
//! Instead of guessing where the content lives, extraction is driven by a
//! per-domain [`ParserConfig`]: a declarative JSON document listing, for
//! each article field, an ordered fallback chain of CSS selectors and XPath
//! expressions, plus cleanup rules for the noise to delete first. The
//! cleaned article text can then be split into bounded, overlapping chunks
//! sized by characters or by an estimated token budget.
//!
//! ## Quick Start
//!
//! ```rust
//! use article_extractor::{extract, ParserConfig};
//!
//! let config = ParserConfig::from_json(r#"{
//!     "domain": "example.com",
//!     "title": {"selector": ["h1.headline", "h1"]},
//!     "content": {"selector": ".article-body"}
//! }"#)?;
//!
//! let html = r#"<html><body>
//!     <h1>My Article</h1>
//!     <div class="article-body">Main content here.</div>
//! </body></html>"#;
//!
//! let result = extract(html, &config)?;
//! assert_eq!(result.get("title"), Some("My Article"));
//! assert_eq!(result.get("content"), Some("Main content here."));
//! # Ok::<(), article_extractor::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Fallback chains**: per-field candidate lists tried in order, CSS and
//!   XPath freely mixed, first non-empty match wins
//! - **Parent scoping**: restrict a selector to the subtree under a
//!   previously resolved node
//! - **Three-pass cleanup**: global rules, field-scoped rules, and a fixed
//!   safety preset, all removed before resolution
//! - **Chunking**: character windows or sentence-aware token-estimate
//!   windows, both with configurable overlap
//!
//! Configs are validated at load time: a malformed selector surfaces as
//! [`Error::SelectorSyntax`] naming the field and expression, never as a
//! runtime surprise on a live document.

mod error;
mod extract;
mod resolver;

/// Article assembly: normalized records, fingerprints, RAG documents.
pub mod article;

/// Chunk model and the two chunking strategies.
pub mod chunk;

/// Three-pass document cleanup pipeline.
pub mod cleanup;

/// Declarative parser configuration model.
pub mod config;

/// Lenient datetime parsing for extracted date strings.
pub mod dates;

/// DOM adapter dispatching CSS and XPath against one parsed tree.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Preset cleanup selectors and the generic fallback config.
pub mod presets;

/// Domain-keyed registry of parser configs.
pub mod registry;

/// Extraction output types.
pub mod result;

/// Word counting, token estimation, sentence splitting.
pub mod text;

/// XPath subset engine over the dom_query node tree.
pub mod xpath;

// Public API - re-exports
pub use article::{Article, RagDocument};
pub use chunk::Chunk;
pub use config::{ExtractMode, FieldSelector, ParserConfig, SelectorKind, SelectorQuery};
pub use error::{Error, Result};
pub use registry::ConfigRegistry;
pub use result::{ExtractionResult, FieldValue, Resolution};

/// Extract every field declared in `config` from an HTML document.
///
/// Runs the full pipeline: global cleanup, per-field cleanup, fallback-chain
/// resolution. Returns the field map plus a per-field trace of which
/// candidate matched.
///
/// # Errors
///
/// [`Error::EmptyDocument`] when `html` is empty; [`Error::NoContent`] when
/// the mandatory content field exhausts its fallback chain. Exhaustion of
/// any other field is recorded in the trace and is not an error.
pub fn extract(html: &str, config: &ParserConfig) -> Result<ExtractionResult> {
    extract::extract_fields(html, config)
}

/// Extract from raw bytes, detecting the character encoding first.
///
/// Looks for a `<meta charset>` declaration (or the `http-equiv` form) in
/// the document head and transcodes to UTF-8 before extraction, replacing
/// invalid sequences with `\u{FFFD}` rather than failing.
pub fn extract_bytes(html: &[u8], config: &ParserConfig) -> Result<ExtractionResult> {
    let html = encoding::transcode_to_utf8(html);
    extract(&html, config)
}
