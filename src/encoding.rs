//! Character encoding detection and transcoding.
//!
//! Fetched pages arrive as bytes in whatever charset the site declares;
//! this module finds the declaration in the document head and converts to
//! UTF-8 before extraction, replacing invalid sequences rather than failing.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Bytes of the head examined for a charset declaration.
const DETECTION_WINDOW: usize = 1024;

/// Match `<meta charset="...">`.
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("CHARSET_META_RE")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">`.
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#,
    )
    .expect("CONTENT_TYPE_CHARSET_RE")
});

/// Detect the declared character encoding of an HTML document.
///
/// Checks `<meta charset>` first, then the `http-equiv` form, and defaults
/// to UTF-8 when nothing is declared. Only the first kilobyte is examined.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(DETECTION_WINDOW)];
    let head = String::from_utf8_lossy(head);

    for pattern in [&CHARSET_META_RE, &CONTENT_TYPE_CHARSET_RE] {
        if let Some(label) = pattern.captures(&head).and_then(|c| c.get(1)) {
            if let Some(encoding) = Encoding::for_label(label.as_str().as_bytes()) {
                return encoding;
            }
        }
    }
    UTF_8
}

/// Transcode HTML bytes to a UTF-8 string, lossily.
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }
    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_meta_charset() {
        let html = b"<html><head><meta charset=\"ISO-8859-1\"></head></html>";
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn test_detects_http_equiv_charset() {
        let html =
            b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\">";
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn test_defaults_to_utf8() {
        assert_eq!(detect_encoding(b"<html><body>plain</body></html>"), UTF_8);
    }

    #[test]
    fn test_transcodes_latin1_bytes() {
        let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xe9</body></html>";
        assert!(transcode_to_utf8(html).contains("Caf\u{e9}"));
    }

    #[test]
    fn test_unknown_label_falls_back_to_utf8() {
        let html = b"<meta charset=\"not-a-charset\"><body>ok</body>";
        assert_eq!(detect_encoding(html), UTF_8);
    }
}
