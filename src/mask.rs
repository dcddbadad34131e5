//! Answer masking.
//!
//! A match is the target word at a word start (left word boundary),
//! followed by any run of word characters, compared case-insensitively.
//! "cat" therefore masks "cat", "Cats" and "category", while the "cat"
//! inside "concatenate" or "bobcat" has no left boundary and survives.

use regex::{NoExpand, Regex, RegexBuilder};

pub const DEFAULT_MASK_TOKEN: &str = "____";

/// Replace every word starting with `word` by `mask`.
pub fn mask_word(text: &str, word: &str, mask: &str) -> String {
    match word_pattern(word) {
        Some(pattern) => pattern.replace_all(text, NoExpand(mask)).into_owned(),
        None => text.to_string(),
    }
}

fn word_pattern(word: &str) -> Option<Regex> {
    let word = word.trim();
    if word.is_empty() {
        return None;
    }
    RegexBuilder::new(&format!(r"\b{}\w*", regex::escape(word)))
        .case_insensitive(true)
        .build()
        .ok()
}
