//! Text chunking for retrieval pipelines.
//!
//! Two interchangeable strategies split normalized article text into
//! bounded, overlapping windows: a fixed character window, and a
//! token-estimate window that accumulates sentence (or word) units. Both
//! produce a contiguous, gap-free, increasing-index sequence; empty input
//! yields zero chunks, never an error.

use serde::{Deserialize, Serialize};

use crate::text::{count_words, estimate_tokens, split_sentences, AVG_TOKENS_PER_WORD};

/// One bounded window of article text, ready for embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Zero-based position; contiguous within one chunking call.
    pub index: usize,
    /// The chunk text.
    pub content: String,
    /// Length of `content` in characters.
    pub char_length: usize,
    /// Unicode-aware word count of `content`.
    pub word_count: usize,
    /// Heuristic token estimate for `content`.
    pub token_estimate: usize,
}

impl Chunk {
    /// Build a chunk from text, deriving all counts.
    #[must_use]
    pub fn from_text(index: usize, text: &str) -> Self {
        Self {
            index,
            content: text.to_string(),
            char_length: text.chars().count(),
            word_count: count_words(text),
            token_estimate: estimate_tokens(text),
        }
    }
}

/// Split text into fixed character windows with overlap.
///
/// Walks the text in steps of `max_chars - overlap_chars`; each chunk spans
/// up to `max_chars` characters. The walk stops once a chunk reaches the end
/// of the text, so the final characters appear exactly once as the tail of
/// the last chunk. An overlap as large as the window degrades to
/// back-to-back windows rather than looping.
#[must_use]
pub fn chunk_by_char(text: &str, max_chars: usize, overlap_chars: usize) -> Vec<Chunk> {
    let text = text.trim();
    if text.is_empty() || max_chars == 0 {
        return Vec::new();
    }

    // character-boundary offsets, so windows never split a code point
    let offsets: Vec<usize> = text.char_indices().map(|(at, _)| at).collect();
    let total = offsets.len();
    let byte_at = |char_pos: usize| offsets.get(char_pos).copied().unwrap_or(text.len());

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut index = 0;

    while start < total {
        let end = total.min(start + max_chars);
        let window = text[byte_at(start)..byte_at(end)].trim();
        if !window.is_empty() {
            chunks.push(Chunk::from_text(index, window));
            index += 1;
        }
        if end == total {
            break;
        }
        let next_start = end.saturating_sub(overlap_chars);
        start = if next_start <= start { end } else { next_start };
    }
    chunks
}

/// Split text into token-estimate windows built from sentence or word units.
///
/// Units accumulate into the current chunk until adding the next one would
/// exceed `max_tokens`; the chunk is then closed and the next one starts
/// seeded with the trailing `overlap_tokens`-worth of words. A single unit
/// whose own estimate exceeds `max_tokens` is emitted as its own chunk
/// rather than dropped.
#[must_use]
pub fn chunk_by_token_estimate(
    text: &str,
    max_tokens: usize,
    overlap_tokens: usize,
    sentence_split: bool,
) -> Vec<Chunk> {
    let text = text.trim();
    if text.is_empty() || max_tokens == 0 {
        return Vec::new();
    }

    let units: Vec<&str> = if sentence_split {
        split_sentences(text)
    } else {
        text.split_whitespace().collect()
    };

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    let mut buffer_tokens = 0usize;
    let mut index = 0usize;

    let flush = |buffer: &[String], index: &mut usize, chunks: &mut Vec<Chunk>| {
        let content = buffer.join(" ");
        let content = content.trim();
        if !content.is_empty() {
            chunks.push(Chunk::from_text(*index, content));
            *index += 1;
        }
    };

    for unit in units {
        let unit_tokens = estimate_tokens(unit);

        // oversized unit: close the running chunk, emit the unit alone
        if unit_tokens > max_tokens {
            flush(&buffer, &mut index, &mut chunks);
            buffer.clear();
            buffer_tokens = 0;
            chunks.push(Chunk::from_text(index, unit.trim()));
            index += 1;
            continue;
        }

        if buffer_tokens + unit_tokens > max_tokens && !buffer.is_empty() {
            flush(&buffer, &mut index, &mut chunks);

            if overlap_tokens > 0 {
                let overlap_words = (overlap_tokens as f64 / AVG_TOKENS_PER_WORD) as usize;
                let joined = buffer.join(" ");
                let words: Vec<&str> = joined.split_whitespace().collect();
                let keep = words.len().saturating_sub(overlap_words);
                buffer = words[keep..].iter().map(ToString::to_string).collect();
                buffer_tokens = estimate_tokens(&buffer.join(" "));
            } else {
                buffer.clear();
                buffer_tokens = 0;
            }
        }

        buffer.push(unit.to_string());
        buffer_tokens += unit_tokens;
    }

    flush(&buffer, &mut index, &mut chunks);
    chunks
}
