//! Preset selectors and the generic fallback configuration.
//!
//! The safety list is the fixed backstop applied by the cleanup pipeline
//! after global and field rules; the generic config is a prioritized ladder
//! of selectors common across news sites and blog engines, used when no
//! domain-specific config exists.

#![allow(clippy::expect_used)]

use std::sync::{Arc, LazyLock};

use crate::config::{FieldSelector, ParserConfig};

/// Selectors for boilerplate that should never survive into extracted
/// fields, whatever the per-domain config declares.
pub static SAFETY_CLEANUP_SELECTORS: &[&str] = &[
    // Advertisements and popups
    ".ads-center",
    ".ads_middle",
    ".adscontent",
    ".adv",
    ".ap_container",
    ".google-ads",
    ".google-auto-placed",
    ".popup",
    ".popup-detail-content",
    // Social sharing, related articles, and other clutter
    ".related",
    ".social-bar",
    ".sponsor",
    ".table-of-contents",
    ".toc-plus",
    ".toc-subnav",
    ".tts-player",
    ".youtube-video",
    // Common nuisance classes
    ".print-link",
    ".comment-links",
    "figure.wp-block-embed",
];

/// Title selector ladder, most specific first.
static TITLE_SELECTORS: &[&str] = &[
    "h1.article-title",
    "h1.article__title",
    "h1.post-title",
    "h1.entry-title",
    "h1.main-title",
    "h1.detail-title",
    "h1.news-title",
    "h1.single-page-title",
    ".tdb-title-text",
    "h1",
];

/// Content selector ladder ending in generic containers.
static CONTENT_SELECTORS: &[&str] = &[
    ".article-content",
    ".article__body",
    ".post-content",
    ".entry-content",
    ".detail-content",
    ".single-post-content",
    ".tdb_single_content",
    "[itemprop='articleBody']",
    "article",
    "main",
];

static AUTHOR_SELECTORS: &[&str] = &[
    ".article__author",
    ".author-name",
    ".author-info",
    ".content-author",
    ".detail__author",
    ".author",
    ".authors",
    "[rel='author']",
];

static DATE_PUBLISHED_SELECTORS: &[&str] = &[
    "time[itemprop='datePublished']",
    "time[property='article:published_time']",
    "meta[property='article:published_time']",
    "time",
    ".detail-time",
    ".post-time",
];

static DATE_MODIFIED_SELECTORS: &[&str] =
    &["time[itemprop='dateModified']", "meta[property='article:modified_time']"];

static TAGS_SELECTORS: &[&str] = &["a[rel='tag']", ".tdb-tags a", ".tags a", ".tag a"];

static GENERIC: LazyLock<Arc<ParserConfig>> = LazyLock::new(|| {
    let config = ParserConfig {
        domain: "*".to_string(),
        lang: "en".to_string(),
        content_type: "article".to_string(),
        title: Some(FieldSelector::fallbacks(TITLE_SELECTORS.iter().copied())),
        description: None,
        content: FieldSelector::fallbacks(CONTENT_SELECTORS.iter().copied()),
        authors: Some(FieldSelector::fallbacks(AUTHOR_SELECTORS.iter().copied())),
        date_published: Some(
            FieldSelector::fallbacks(DATE_PUBLISHED_SELECTORS.iter().copied()),
        ),
        date_modified: Some(FieldSelector::fallbacks(DATE_MODIFIED_SELECTORS.iter().copied())),
        tags: Some(FieldSelector::fallbacks(TAGS_SELECTORS.iter().copied()).all()),
        topics: None,
        cleanup: Vec::new(),
    };
    Arc::new(config.into_validated().expect("generic preset config is valid"))
});

/// Generic, domain-agnostic fallback configuration trying common selector
/// ladders; the extraction-level analog of a readability fallback.
#[must_use]
pub fn generic_config() -> Arc<ParserConfig> {
    Arc::clone(&GENERIC)
}
