//! Error types for article-extractor.
//!
//! This module defines the error types returned by configuration loading
//! and extraction operations.

use crate::config::SelectorKind;

/// Error type for configuration and extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A CSS or XPath expression in a parser config failed to parse.
    ///
    /// This is a configuration authoring bug, not a document issue, and is
    /// surfaced when the config is loaded/validated rather than on first use.
    #[error("invalid {kind} selector `{expression}` for `{field}`: {message}")]
    SelectorSyntax {
        /// Field (or cleanup scope) the selector was declared for.
        field: String,
        /// The offending expression, verbatim.
        expression: String,
        /// Whether the expression was parsed as CSS or XPath.
        kind: SelectorKind,
        /// Parser diagnostic.
        message: String,
    },

    /// Parser config is structurally invalid (bad JSON, missing fields,
    /// incoherent settings such as `type: attribute` with no attribute name).
    #[error("invalid parser config: {0}")]
    Config(String),

    /// Input HTML was empty or could not be parsed into a document.
    #[error("empty or unparsable HTML input")]
    EmptyDocument,

    /// The mandatory content field exhausted its fallback chain.
    #[error("content selectors exhausted with no match")]
    NoContent,

    /// I/O failure while loading configs from disk.
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a `SelectorSyntax` error for the given scope and expression.
    pub(crate) fn selector_syntax(
        field: &str,
        expression: &str,
        kind: SelectorKind,
        message: impl Into<String>,
    ) -> Self {
        Self::SelectorSyntax {
            field: field.to_string(),
            expression: expression.to_string(),
            kind,
            message: message.into(),
        }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
