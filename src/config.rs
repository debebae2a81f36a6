//! Declarative parser configuration model.
//!
//! A [`ParserConfig`] describes, per domain, how to pull structured article
//! fields out of raw HTML: which selectors to try for each field (CSS and
//! XPath freely mixed in one fallback chain), what to extract from a match
//! (text, inner HTML, or an attribute), and which elements to delete before
//! resolution runs.
//!
//! Configs are stored as JSON, one file per domain. The `selector` field of
//! each entry accepts a bare string, an array of strings, or an array mixing
//! strings with structured objects; everything is normalized into
//! [`SelectorQuery`] values at load time so downstream code never sees the
//! raw JSON shapes.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{dom, xpath};

/// Query language of a selector.
///
/// `Auto` detects based on query syntax: queries starting with `/` or `//`
/// are treated as XPath, everything else as CSS. Detection happens once, at
/// config load time, never per document. The heuristic is deliberately kept
/// as-is even though a CSS selector could in principle start with `/` --
/// existing configs are authored against this exact rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    /// Standard CSS selector, e.g. `div.content`, `#main > p`.
    Css,
    /// XPath expression, e.g. `//div[@class='content']`.
    XPath,
    /// Detect from query syntax at load time.
    Auto,
}

impl SelectorKind {
    /// Resolve `Auto` against a query string; `Css` and `XPath` pass through.
    #[must_use]
    pub fn resolve(self, query: &str) -> SelectorKind {
        match self {
            SelectorKind::Auto => {
                if query.starts_with('/') {
                    SelectorKind::XPath
                } else {
                    SelectorKind::Css
                }
            }
            other => other,
        }
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorKind::Css => write!(f, "css"),
            SelectorKind::XPath => write!(f, "xpath"),
            SelectorKind::Auto => write!(f, "auto"),
        }
    }
}

/// A single selector candidate in a fallback chain.
///
/// In JSON this is either a bare string (`"h1.title"`, `"//h1"`) or an
/// object: `{"query": "a", "selector_type": "css", "attribute": "href",
/// "parent": ".byline"}`. The `parent` itself accepts the same
/// string-or-object shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectorQueryRepr")]
pub struct SelectorQuery {
    /// The CSS or XPath expression.
    pub query: String,
    /// Query language; never `Auto` after load.
    #[serde(rename = "selector_type")]
    pub kind: SelectorKind,
    /// Attribute to extract for this candidate, overriding the field default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Scope query resolved first; the candidate then searches only inside
    /// the first node the parent query matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<SelectorQuery>>,
}

impl SelectorQuery {
    /// Plain query with auto-detected kind, no attribute, no parent scope.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        let kind = SelectorKind::Auto.resolve(&query);
        Self { query, kind, attribute: None, parent: None }
    }

    fn resolve_auto(&mut self) {
        self.kind = self.kind.resolve(&self.query);
        if let Some(parent) = self.parent.as_mut() {
            parent.resolve_auto();
        }
    }

    fn validate(&self, scope: &str) -> Result<()> {
        match self.kind {
            SelectorKind::Css => dom::validate_css(scope, &self.query)?,
            SelectorKind::XPath => {
                xpath::XPath::parse(&self.query).map_err(|err| {
                    Error::selector_syntax(scope, &self.query, SelectorKind::XPath, err)
                })?;
            }
            // unreachable after resolve_auto, but a direct struct literal
            // could still carry it
            SelectorKind::Auto => {
                return Err(Error::selector_syntax(
                    scope,
                    &self.query,
                    SelectorKind::Auto,
                    "kind not resolved; load configs through into_validated",
                ));
            }
        }
        if let Some(parent) = &self.parent {
            parent.validate(scope)?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectorQueryRepr {
    Bare(String),
    Full {
        query: String,
        #[serde(default = "auto_kind")]
        selector_type: SelectorKind,
        #[serde(default)]
        attribute: Option<String>,
        #[serde(default)]
        parent: Option<Box<SelectorQueryRepr>>,
    },
}

fn auto_kind() -> SelectorKind {
    SelectorKind::Auto
}

impl From<SelectorQueryRepr> for SelectorQuery {
    fn from(repr: SelectorQueryRepr) -> Self {
        match repr {
            SelectorQueryRepr::Bare(query) => SelectorQuery::new(query),
            SelectorQueryRepr::Full { query, selector_type, attribute, parent } => {
                let kind = selector_type.resolve(&query);
                SelectorQuery {
                    query,
                    kind,
                    attribute,
                    parent: parent.map(|p| Box::new(SelectorQuery::from(*p))),
                }
            }
        }
    }
}

/// What to extract from a matched node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Concatenated, whitespace-normalized text content.
    #[default]
    Text,
    /// Serialized inner markup, for fields re-parsed downstream.
    Html,
    /// Value of the configured attribute.
    Attribute,
}

/// Extraction recipe for one article field.
///
/// `candidates` is the fallback chain: tried in declaration order, the first
/// candidate yielding at least one non-empty value wins and resolution stops.
/// Values are never merged across candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FieldSelectorRepr")]
pub struct FieldSelector {
    /// Ordered fallback chain; JSON field `selector`.
    #[serde(rename = "selector")]
    pub candidates: Vec<SelectorQuery>,
    /// Extraction mode; JSON field `type`, defaults to `text`.
    #[serde(rename = "type")]
    pub extract_as: ExtractMode,
    /// Field-level default attribute, overridable per candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Collect every match of the winning candidate instead of the first.
    /// JSON field `all`.
    #[serde(rename = "all")]
    pub multi: bool,
    /// Field-scoped cleanup rules, applied to a private copy of the document
    /// immediately before this field resolves.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cleanup: Vec<SelectorQuery>,
}

impl FieldSelector {
    /// Single-candidate text selector; the common case in tests and presets.
    #[must_use]
    pub fn css(query: impl Into<String>) -> Self {
        Self::chain(vec![SelectorQuery::new(query)])
    }

    /// Build a fallback chain from pre-built candidates.
    #[must_use]
    pub fn chain(candidates: Vec<SelectorQuery>) -> Self {
        Self {
            candidates,
            extract_as: ExtractMode::Text,
            attribute: None,
            multi: false,
            cleanup: Vec::new(),
        }
    }

    /// Chain of plain string selectors with auto-detected kinds.
    #[must_use]
    pub fn fallbacks<S: Into<String>>(queries: impl IntoIterator<Item = S>) -> Self {
        Self::chain(queries.into_iter().map(SelectorQuery::new).collect())
    }

    /// Same chain, collecting all matches of the winning candidate.
    #[must_use]
    pub fn all(mut self) -> Self {
        self.multi = true;
        self
    }

    /// Same chain, extracting inner HTML instead of text.
    #[must_use]
    pub fn as_html(mut self) -> Self {
        self.extract_as = ExtractMode::Html;
        self
    }

    fn resolve_auto(&mut self) {
        for candidate in &mut self.candidates {
            candidate.resolve_auto();
        }
        for rule in &mut self.cleanup {
            rule.resolve_auto();
        }
    }

    fn validate(&self, field: &str) -> Result<()> {
        for candidate in &self.candidates {
            candidate.validate(field)?;
        }
        for rule in &self.cleanup {
            rule.validate(field)?;
        }
        if self.extract_as == ExtractMode::Attribute && self.attribute.is_none() {
            // an XPath candidate ending in `/@attr` names its own attribute
            let unnamed = self
                .candidates
                .iter()
                .any(|c| c.attribute.is_none() && !c.query.contains("/@"));
            if unnamed {
                return Err(Error::Config(format!(
                    "field `{field}` extracts an attribute but no attribute name is set"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct FieldSelectorRepr {
    selector: SelectorListRepr,
    #[serde(rename = "type", default)]
    extract_as: ExtractMode,
    #[serde(default)]
    attribute: Option<String>,
    #[serde(rename = "all", default)]
    multi: bool,
    #[serde(default)]
    cleanup: Vec<SelectorQueryRepr>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectorListRepr {
    One(SelectorQueryRepr),
    Many(Vec<SelectorQueryRepr>),
}

impl From<FieldSelectorRepr> for FieldSelector {
    fn from(repr: FieldSelectorRepr) -> Self {
        let candidates = match repr.selector {
            SelectorListRepr::One(one) => vec![SelectorQuery::from(one)],
            SelectorListRepr::Many(many) => many.into_iter().map(SelectorQuery::from).collect(),
        };
        FieldSelector {
            candidates,
            extract_as: repr.extract_as,
            attribute: repr.attribute,
            multi: repr.multi,
            cleanup: repr.cleanup.into_iter().map(SelectorQuery::from).collect(),
        }
    }
}

/// Complete extraction configuration for one domain.
///
/// Loaded once, validated, then shared read-only (typically behind an `Arc`)
/// across every extraction for that domain. There is no mutating method;
/// programmatic construction finishes through [`ParserConfig::into_validated`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Domain this config applies to, e.g. `example.com`.
    pub domain: String,
    /// Language code, e.g. `en`, `vi`.
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Content type label, e.g. `article`, `blog`.
    #[serde(rename = "type", default = "default_content_type")]
    pub content_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<FieldSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<FieldSelector>,
    /// Main article body; the only mandatory field.
    pub content: FieldSelector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<FieldSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<FieldSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<FieldSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<FieldSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<FieldSelector>,

    /// Global cleanup rules, removed from the whole document once per
    /// extraction before any field resolves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cleanup: Vec<SelectorQuery>,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_content_type() -> String {
    "article".to_string()
}

/// Field name of the mandatory content selector.
pub const CONTENT_FIELD: &str = "content";

impl ParserConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ParserConfig =
            serde_json::from_str(json).map_err(|err| Error::Config(err.to_string()))?;
        config.into_validated()
    }

    /// Read, parse, and validate a config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Resolve all `Auto` selector kinds and validate every expression.
    ///
    /// Selector syntax errors surface here, at load time, so a malformed
    /// config never reaches document processing.
    pub fn into_validated(mut self) -> Result<Self> {
        for (_, field) in self.fields_mut() {
            field.resolve_auto();
        }
        for rule in &mut self.cleanup {
            rule.resolve_auto();
        }

        if self.domain.trim().is_empty() {
            return Err(Error::Config("`domain` must not be empty".to_string()));
        }
        if self.content.candidates.is_empty() {
            return Err(Error::Config(
                "`content` requires at least one selector candidate".to_string(),
            ));
        }
        for (name, field) in self.fields() {
            field.validate(name)?;
        }
        for rule in &self.cleanup {
            rule.validate("cleanup")?;
        }
        Ok(self)
    }

    /// Declared fields in resolution order, the content field first.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldSelector)> {
        [
            (CONTENT_FIELD, Some(&self.content)),
            ("title", self.title.as_ref()),
            ("description", self.description.as_ref()),
            ("authors", self.authors.as_ref()),
            ("date_published", self.date_published.as_ref()),
            ("date_modified", self.date_modified.as_ref()),
            ("tags", self.tags.as_ref()),
            ("topics", self.topics.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, field)| field.map(|f| (name, f)))
    }

    fn fields_mut(&mut self) -> impl Iterator<Item = (&'static str, &mut FieldSelector)> {
        [
            (CONTENT_FIELD, Some(&mut self.content)),
            ("title", self.title.as_mut()),
            ("description", self.description.as_mut()),
            ("authors", self.authors.as_mut()),
            ("date_published", self.date_published.as_mut()),
            ("date_modified", self.date_modified.as_mut()),
            ("tags", self.tags.as_mut()),
            ("topics", self.topics.as_mut()),
        ]
        .into_iter()
        .filter_map(|(name, field)| field.map(|f| (name, f)))
    }
}
