//! Normalization of raw word input before it enters the lookup pipeline

use std::sync::OnceLock;

use regex::Regex;

/// Longest word accepted, in characters
pub const MAX_WORD_LENGTH: usize = 32;

const WORD_PATTERN: &str = r"^[A-Za-z]+(?:['-][A-Za-z]+)?$";

fn word_regex() -> Option<&'static Regex> {
    static WORD_RE: OnceLock<Option<Regex>> = OnceLock::new();
    WORD_RE
        .get_or_init(|| match Regex::new(WORD_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                log::error!("Invalid word pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// Trim and validate a raw word.
///
/// Accepts one or more ASCII letters, optionally followed by a single `'` or
/// `-` and one or more further ASCII letters ("well-known", "don't").
/// Returns `None` for anything else.
pub fn normalize_word_input(raw: &str) -> Option<&str> {
    let word = raw.trim();
    if word.is_empty() || word.chars().count() > MAX_WORD_LENGTH {
        return None;
    }

    word_regex()
        .filter(|re| re.is_match(word))
        .map(|_| word)
}
