//! Text analysis helpers shared by the resolver, chunker, and article model.
//!
//! Word counting and token estimation use a unicode-aware word pattern; the
//! token estimate is a cheap words-to-tokens heuristic, not a tokenizer.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Average tokens per word for subword tokenizers; used by
/// [`estimate_tokens`] and for sizing chunk overlap buffers.
pub const AVG_TOKENS_PER_WORD: f64 = 1.33;

/// Unicode-aware word pattern.
pub static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("WORD_RE"));

/// Matches runs of whitespace for normalization.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RE"));

/// Matches a sentence terminator followed by whitespace. A boundary is only
/// accepted when the following character is upper-case, a digit, or a quote
/// (checked separately, since the regex crate has no lookahead).
static SENTENCE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.?!]\s+").expect("SENTENCE_BREAK_RE"));

/// Collapse all whitespace runs (including NBSP) to single spaces and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let replaced = text.replace('\u{a0}', " ");
    WHITESPACE_RE.replace_all(replaced.trim(), " ").into_owned()
}

/// Count words using the unicode word pattern.
#[must_use]
pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

/// Heuristic token estimate: `ceil(words * 1.33)`.
///
/// Approximates subword tokenization cost without loading a tokenizer;
/// replaceable downstream by a real tokenizer when exact budgets matter.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    let words = count_words(text) as f64;
    (words * AVG_TOKENS_PER_WORD).ceil() as usize
}

/// Split text into sentence units.
///
/// A boundary is a terminal `.`, `?` or `!` followed by whitespace and an
/// upper-case letter, digit, or quote character. The terminator stays with
/// the preceding sentence; the whitespace separator is dropped.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BREAK_RE.find_iter(text) {
        if !starts_like_sentence(&text[m.end()..]) {
            continue;
        }
        // keep the single-byte terminator, drop the whitespace run
        let end = m.start() + 1;
        if end > start {
            units.push(&text[start..end]);
        }
        start = m.end();
    }

    if start < text.len() {
        units.push(&text[start..]);
    }
    units
}

fn starts_like_sentence(rest: &str) -> bool {
    rest.chars().next().is_some_and(|c| {
        c.is_uppercase()
            || c.is_ascii_digit()
            || matches!(c, '"' | '\'' | '\u{201c}' | '\u{2018}')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("  a \n\t b\u{a0}c  "), "a b c");
    }

    #[test]
    fn test_count_words_unicode() {
        assert_eq!(count_words("Hello world"), 2);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("état déjà vu"), 3);
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        // 2 words * 1.33 = 2.66 -> 3
        assert_eq!(estimate_tokens("Hello world"), 3);
        // 9 words * 1.33 = 11.97 -> 12
        assert_eq!(estimate_tokens("The quick brown fox jumps over the lazy dog"), 12);
    }

    #[test]
    fn test_split_sentences_basic() {
        let units = split_sentences("First sentence. Second one! Third?");
        assert_eq!(units, vec!["First sentence.", "Second one!", "Third?"]);
    }

    #[test]
    fn test_split_sentences_requires_capital_or_digit() {
        // "e.g. lower" must not split: the follower is lower-case
        let units = split_sentences("This is e.g. lowercase text. Next sentence.");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0], "This is e.g. lowercase text.");
    }

    #[test]
    fn test_split_sentences_accepts_quote_follower() {
        let units = split_sentences("He left. \"Why?\" she asked.");
        assert_eq!(units[0], "He left.");
    }

    #[test]
    fn test_split_sentences_no_boundary() {
        assert_eq!(split_sentences("no terminator here"), vec!["no terminator here"]);
        assert!(split_sentences("").is_empty());
    }
}
