//! Article assembly from extraction output.
//!
//! Turns a raw field map into a normalized article record: cleaned body
//! text, parsed timestamps, derived counts, a stable content fingerprint,
//! and the chunk list consumed by embedding pipelines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::chunk::{self, Chunk};
use crate::config::{ExtractMode, ParserConfig};
use crate::dates;
use crate::dom;
use crate::error::Result;
use crate::result::ExtractionResult;
use crate::text::{count_words, estimate_tokens, normalize_whitespace};

/// Reading speed for the reading-time estimate, words per minute.
const READING_WPM: f64 = 220.0;

/// Characters of content mixed into the id fingerprint.
const FINGERPRINT_CONTENT_CHARS: usize = 512;

/// A fully assembled article, ready for storage or chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Stable id: hash of source URL plus a content prefix, so the same
    /// snapshot gets the same id across runs.
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Cleaned article text, all markup stripped.
    pub content: String,
    /// Raw inner markup of the content field, kept when the config extracts
    /// it as HTML for downstream re-parsing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub topics: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    /// Canonical source URL, when the caller supplied one.
    pub url: Option<String>,
    /// Root domain, from the URL or the config.
    pub domain: String,
    pub lang: String,
    pub word_count: usize,
    pub token_estimate: usize,
    pub reading_time_minutes: f64,
    pub chunks: Vec<Chunk>,
}

impl Article {
    /// Extract and assemble an article in one step.
    ///
    /// Runs the full pipeline (cleanup, resolution) with `config`, then
    /// normalizes the field map into an article record. Fails exactly where
    /// extraction fails: empty input or an exhausted content chain.
    pub fn from_html(html: &str, config: &ParserConfig, url: Option<&str>) -> Result<Self> {
        let extraction = crate::extract::extract_fields(html, config)?;
        Ok(Self::from_extraction(&extraction, config, url))
    }

    /// Assemble an article from an existing extraction result.
    #[must_use]
    pub fn from_extraction(
        extraction: &ExtractionResult,
        config: &ParserConfig,
        url: Option<&str>,
    ) -> Self {
        let raw_content = extraction.get("content").unwrap_or_default();
        let (content, content_html) = if config.content.extract_as == ExtractMode::Html {
            (html_to_text(raw_content), Some(raw_content.to_string()))
        } else {
            (normalize_whitespace(raw_content), None)
        };

        let domain = url
            .and_then(|u| Url::parse(u).ok())
            .and_then(|u| u.host_str().map(ToString::to_string))
            .unwrap_or_else(|| config.domain.clone());

        let word_count = count_words(&content);
        let mut article = Self {
            id: fingerprint(url, &content),
            title: extraction.get("title").map(ToString::to_string),
            description: extraction.get("description").map(ToString::to_string),
            content,
            content_html,
            authors: list_field(extraction, "authors"),
            tags: list_field(extraction, "tags"),
            topics: list_field(extraction, "topics"),
            published_at: extraction.get("date_published").and_then(dates::parse_datetime),
            modified_at: extraction.get("date_modified").and_then(dates::parse_datetime),
            url: url.map(ToString::to_string),
            domain,
            lang: config.lang.clone(),
            word_count,
            token_estimate: 0,
            reading_time_minutes: 0.0,
            chunks: Vec::new(),
        };
        article.token_estimate = estimate_tokens(&article.content);
        article.reading_time_minutes = (word_count as f64 / READING_WPM * 100.0).round() / 100.0;
        article
    }

    /// Chunk the body into character windows, replacing `self.chunks`.
    ///
    /// With `strip_title`, a body that opens with the article title drops
    /// that duplicate prefix before windowing.
    pub fn chunk_by_char(
        &mut self,
        max_chars: usize,
        overlap_chars: usize,
        strip_title: bool,
    ) -> &[Chunk] {
        let body = self.body_for_chunking(strip_title);
        self.chunks = chunk::chunk_by_char(&body, max_chars, overlap_chars);
        &self.chunks
    }

    /// Chunk the body into token-estimate windows, replacing `self.chunks`.
    pub fn chunk_by_token_estimate(
        &mut self,
        max_tokens: usize,
        overlap_tokens: usize,
        sentence_split: bool,
    ) -> &[Chunk] {
        let body = self.body_for_chunking(false);
        self.chunks = chunk::chunk_by_token_estimate(&body, max_tokens, overlap_tokens, sentence_split);
        &self.chunks
    }

    fn body_for_chunking(&self, strip_title: bool) -> String {
        let body = self.content.trim();
        if strip_title {
            if let Some(title) = self.title.as_deref() {
                if !title.is_empty() && body.starts_with(title) {
                    return body[title.len()..].trim().to_string();
                }
            }
        }
        body.to_string()
    }

    /// Convert chunks into per-chunk documents for a vector store.
    #[must_use]
    pub fn to_rag_documents(&self) -> Vec<RagDocument> {
        self.chunks
            .iter()
            .map(|chunk| RagDocument {
                id: format!("{}-chunk-{}", self.id, chunk.index),
                text: chunk.content.clone(),
                meta: RagMeta {
                    article_id: self.id.clone(),
                    title: self.title.clone(),
                    source_url: self.url.clone(),
                    index: chunk.index,
                    domain: self.domain.clone(),
                },
            })
            .collect()
    }
}

/// One chunk prepared for vector-store insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagDocument {
    /// `{article_id}-chunk-{index}`.
    pub id: String,
    pub text: String,
    pub meta: RagMeta,
}

/// Minimal metadata carried alongside each chunk document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagMeta {
    pub article_id: String,
    pub title: Option<String>,
    pub source_url: Option<String>,
    pub index: usize,
    pub domain: String,
}

/// Stable id from the source URL and a content prefix.
fn fingerprint(url: Option<&str>, content: &str) -> String {
    let prefix: String = content.chars().take(FINGERPRINT_CONTENT_CHARS).collect();
    let seed = format!("{}|{prefix}", url.unwrap_or_default());
    hex::encode(blake3::hash(seed.as_bytes()).as_bytes())
}

/// Flatten a multi-valued field into a list, deduplicating exact repeats.
fn list_field(extraction: &ExtractionResult, field: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for value in extraction.get_all(field).unwrap_or_default() {
        if !seen.contains(value) {
            seen.push(value.clone());
        }
    }
    seen
}

/// Strip markup from an HTML fragment by re-parsing it on its own.
fn html_to_text(fragment: &str) -> String {
    let doc = dom::parse(fragment);
    normalize_whitespace(&doc.select("body").text())
}
