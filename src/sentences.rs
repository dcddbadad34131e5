//! Sentence splitting for cleaned definitions.
//!
//! Boundaries are `.`, `!` or `?` (optionally followed by closing quotes or
//! brackets) and then whitespace. Dots that are not boundaries (decimals,
//! list markers) are swapped for a private-use sentinel before splitting
//! and restored afterwards, so the boundary regex can never see them.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

const SENTINEL: char = '\u{E000}';

lazy_static! {
    static ref DECIMAL_DOT: Regex = Regex::new(r"(\d)\.(\d)").unwrap();
    // A marker may also follow an already protected marker ("1. 2. ...")
    static ref LIST_MARKER_DOT: Regex =
        Regex::new(r"(^\s*|[.!?\x{E000}]\s+)(\d{1,3})\.(\s)").unwrap();
    static ref BOUNDARY: Regex = Regex::new(r#"[.!?]+["'”’»)\]]*\s+"#).unwrap();
    static ref LEADING_MARKER: Regex = Regex::new(r"^(?:\d{1,3}[.)]\s+)+").unwrap();
}

/// Lazily split `text` into sentences.
///
/// The returned iterator is `Clone`, and calling this again on the same
/// input yields the same sequence.
pub fn split_sentences(text: &str) -> Sentences {
    Sentences {
        text: protect(text),
        pos: 0,
    }
}

#[derive(Debug, Clone)]
pub struct Sentences {
    text: String,
    pos: usize,
}

impl Iterator for Sentences {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.pos < self.text.len() {
            let end = BOUNDARY
                .find_at(&self.text, self.pos)
                .map_or(self.text.len(), |m| m.end());
            let raw = &self.text[self.pos..end];
            self.pos = end;

            if let Some(sentence) = restore(raw) {
                return Some(sentence);
            }
        }
        None
    }
}

fn protect(text: &str) -> String {
    let mut result: String = text.chars().filter(|&c| c != SENTINEL).collect();

    // Repeat so chains like "1.2.3" and back-to-back markers are all covered
    loop {
        let next = DECIMAL_DOT
            .replace_all(&result, |caps: &Captures| format!("{}{}{}", &caps[1], SENTINEL, &caps[2]))
            .into_owned();
        let next = LIST_MARKER_DOT
            .replace_all(&next, |caps: &Captures| {
                format!("{}{}{}{}", &caps[1], &caps[2], SENTINEL, &caps[3])
            })
            .into_owned();
        if next == result {
            return result;
        }
        result = next;
    }
}

fn restore(raw: &str) -> Option<String> {
    let restored = raw.replace(SENTINEL, ".");
    let sentence = LEADING_MARKER.replace(restored.trim(), "");
    let sentence = sentence.trim();
    if sentence.chars().any(char::is_alphanumeric) {
        Some(sentence.to_string())
    } else {
        None
    }
}
