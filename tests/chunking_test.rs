//! Chunk builder guarantees: windows, overlap, coverage, determinism.

use article_extractor::chunk::{chunk_by_char, chunk_by_token_estimate};

#[test]
fn char_window_scenario_2500_2000_200() {
    // 2,500 chars with max_chars=2000, overlap_chars=200 must produce
    // exactly two chunks: [0, 2000) and [1800, 2500)
    let text: String = (0..2500).map(|i| char::from(b'a' + (i % 23) as u8)).collect();
    let chunks = chunk_by_char(&text, 2000, 200);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].index, 0);
    assert_eq!(chunks[0].char_length, 2000);
    assert_eq!(chunks[1].index, 1);
    assert_eq!(chunks[1].char_length, 700);

    let expected_second: String = text.chars().skip(1800).collect();
    assert_eq!(chunks[1].content, expected_second);
}

#[test]
fn char_chunking_is_idempotent() {
    // re-chunking the overlap-removed concatenation reproduces the text
    let text: String = (0..4321).map(|i| char::from(b'a' + (i % 19) as u8)).collect();
    let max_chars = 1000;
    let overlap = 100;
    let chunks = chunk_by_char(&text, max_chars, overlap);

    let mut rebuilt = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            rebuilt.push_str(&chunk.content);
        } else {
            rebuilt.extend(chunk.content.chars().skip(overlap));
        }
    }
    assert_eq!(rebuilt, text);

    let rechunked = chunk_by_char(&rebuilt, max_chars, overlap);
    assert_eq!(rechunked, chunks);
}

#[test]
fn char_chunk_counts_are_derived_from_content() {
    let chunks = chunk_by_char("one two three. four five.", 100, 0);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].word_count, 5);
    assert_eq!(chunks[0].char_length, 25);
    assert!(chunks[0].token_estimate >= chunks[0].word_count);
}

#[test]
fn empty_and_blank_input_yield_zero_chunks() {
    assert!(chunk_by_char("", 2000, 200).is_empty());
    assert!(chunk_by_char("   \n ", 2000, 200).is_empty());
    assert!(chunk_by_token_estimate("", 800, 64, true).is_empty());
    assert!(chunk_by_token_estimate(" \t ", 800, 64, false).is_empty());
}

#[test]
fn token_chunks_respect_sentence_boundaries() {
    let text = "Rust ships without a runtime. Memory safety is checked at compile time. \
                Fearless concurrency is the slogan. Zero-cost abstractions are the promise. \
                The borrow checker enforces it all. Lifetimes describe reference validity.";
    let chunks = chunk_by_token_estimate(text, 20, 0, true);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(
            chunk.content.ends_with('.'),
            "chunk ended mid-sentence: {:?}",
            chunk.content
        );
    }

    // nothing dropped: every sentence appears in some chunk
    for sentence in text.split(". ") {
        let sentence = sentence.trim_end_matches('.');
        assert!(
            chunks.iter().any(|c| c.content.contains(sentence)),
            "missing sentence: {sentence}"
        );
    }
}

#[test]
fn token_chunks_with_overlap_share_boundary_words() {
    let text = "Alpha one two three four five six seven. \
                Beta one two three four five six seven. \
                Gamma one two three four five six seven. \
                Delta one two three four five six seven."
        .to_string();
    let chunks = chunk_by_token_estimate(&text, 25, 10, true);

    assert!(chunks.len() > 1);
    for pair in chunks.windows(2) {
        let prev_words: Vec<&str> = pair[0].content.split_whitespace().collect();
        let next_words: Vec<&str> = pair[1].content.split_whitespace().collect();
        // the next chunk opens with words drawn from the previous chunk's tail
        assert!(
            prev_words.ends_with(&next_words[..1]) || prev_words.contains(&next_words[0]),
            "no shared overlap between {:?} and {:?}",
            pair[0].content,
            pair[1].content
        );
    }
}

#[test]
fn oversized_sentence_is_emitted_not_dropped() {
    let oversized = format!("Start {} finish.", "filler ".repeat(150).trim());
    let text = format!("Lead sentence here. {oversized} Trailing sentence here.");
    let chunks = chunk_by_token_estimate(&text, 40, 0, true);

    // the giant sentence exists as a chunk of its own, over budget
    assert!(chunks.iter().any(|c| c.token_estimate > 40 && c.content.contains("filler")));
    // and the trailing sentence still made it into a later chunk
    assert!(chunks.iter().any(|c| c.content.contains("Trailing sentence here.")));
}

#[test]
fn word_mode_ignores_sentence_boundaries() {
    let text = "one two three four five six seven eight nine ten eleven twelve";
    let chunks = chunk_by_token_estimate(text, 10, 0, false);

    assert!(chunks.len() > 1);
    let total: usize = chunks.iter().map(|c| c.word_count).sum();
    assert_eq!(total, 12);
}

#[test]
fn indices_are_contiguous_and_zero_based() {
    let text = "Sentence number one right here. Sentence number two right here. \
                Sentence number three right here. Sentence number four right here.";
    let by_char = chunk_by_char(&"q".repeat(1500), 400, 50);
    let by_token = chunk_by_token_estimate(text, 10, 0, true);

    for chunks in [by_char, by_token] {
        assert!(!chunks.is_empty());
        for (expected, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, expected);
        }
    }
}

#[test]
fn char_overlap_larger_than_window_still_terminates() {
    let text = "m".repeat(300);
    let chunks = chunk_by_char(&text, 100, 150);

    // stride degrades to back-to-back windows instead of looping forever
    assert_eq!(chunks.len(), 3);
    let total: usize = chunks.iter().map(|c| c.char_length).sum();
    assert_eq!(total, 300);
}
