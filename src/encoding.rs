//! Text canonicalization tolerant of mixed source encodings.
//!
//! Questions and textual settings can arrive from shells, web forms or config
//! files with inconsistent encodings and line conventions. Everything that
//! crosses into the pipeline goes through one of the two functions here so
//! the rest of the crate only ever sees one canonical representation.

use std::borrow::Cow;

/// Decode raw bytes into a `String` without ever failing.
///
/// Strict UTF-8 is tried first; anything else falls back to a Latin-1 style
/// per-byte decode, which is lossless for single-byte encodings and keeps
/// garbage input visible instead of aborting the pipeline.
pub fn flexible_decode(input: &[u8]) -> String {
    match std::str::from_utf8(input) {
        Ok(text) => text.to_string(),
        Err(_) => input.iter().map(|&b| b as char).collect(),
    }
}

fn is_canonical(c: char) -> bool {
    if c == '\u{feff}' || c == '\r' || c == '\u{2028}' || c == '\u{2029}' {
        return false;
    }
    !c.is_control() || c == '\n' || c == '\t'
}

/// Canonicalize already-decoded text: strip BOMs, fold CRLF / CR and Unicode
/// line separators to `\n`, drop stray control characters. Borrows when the
/// input needs no work.
pub fn canonicalize(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_canonical) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\u{feff}' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{2028}' | '\u{2029}' => out.push('\n'),
            c if c.is_control() && c != '\n' && c != '\t' => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through() {
        assert_eq!(flexible_decode("¿Dónde está?".as_bytes()), "¿Dónde está?");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        // 0xE9 is "é" in Latin-1 and invalid as a lone UTF-8 byte.
        assert_eq!(flexible_decode(b"caf\xe9"), "café");
    }

    #[test]
    fn canonicalize_borrows_clean_text() {
        let text = "What is the capital of France?";
        assert!(matches!(canonicalize(text), Cow::Borrowed(_)));
    }

    #[test]
    fn canonicalize_strips_bom_and_folds_newlines() {
        assert_eq!(canonicalize("\u{feff}a\r\nb\rc\u{2028}d"), "a\nb\nc\nd");
    }

    #[test]
    fn canonicalize_drops_control_characters() {
        assert_eq!(canonicalize("a\u{0}b\tc"), "ab\tc");
    }
}
