//! Definition normalization.
//!
//! Turns a raw dictionary definition (multi-line, decorated, with
//! part-of-speech labels and asides) into a single whitespace-collapsed
//! line that the rest of the hint pipeline can work on.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Innermost groups only, so nested asides peel off one level per pass
    static ref PARENTHETICAL: Regex = Regex::new(r"\([^()]*\)|\[[^\[\]]*\]").unwrap();

    // Bullets, arrows, slashes, angle brackets and dash runs. A single hyphen
    // inside a word ("slow-moving") is content, not decoration.
    static ref DECORATIVE: Regex =
        Regex::new(r"[•·●▪◦►▶→←↔⇒/\\<>|–—]+|-{2,}|(?:^|\s)-+(?:\s-+)*(?:\s|$)").unwrap();

    static ref EMPHASIS: Regex = Regex::new(r"[*_]+").unwrap();

    // "1. " / "2) " at the start or right after a sentence/clause break.
    // Needs trailing whitespace, so "3.5" never matches.
    static ref LIST_MARKER: Regex = Regex::new(r"(^\s*|[.!?:;]\s+)\d{1,3}[.)]\s+").unwrap();

    // Only at the start of the text or of a sentence, so "the following
    // nouns: cat, dog" keeps its wording.
    static ref POS_LABEL_COLON: Regex = Regex::new(
        r"(?i)(^\s*|[.!?;]\s+)(?:noun|verb|adjective|adverb|preposition|conjunction|interjection|pronoun)s?\s*:"
    ).unwrap();

    static ref SPACE_BEFORE_PUNCT: Regex = Regex::new(r"\s+([.,!?;:])").unwrap();

    static ref POS_LABEL_LEADING: Regex = Regex::new(
        r"(?i)^\s*(?:noun|verb|adjective|adverb|preposition|conjunction|interjection|pronoun)\.?\s+"
    ).unwrap();
}

/// Normalize a raw definition into a single clean line.
///
/// Blank input yields an empty string.
pub fn normalize_definition(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let text: String = raw.nfkc().collect();
    let text = join_lines(&text);
    let text = strip_parentheticals(&text);
    let text = DECORATIVE.replace_all(&text, " ");
    let text = EMPHASIS.replace_all(&text, "");
    let text = strip_list_markers(&text);
    let text = POS_LABEL_COLON.replace_all(&text, "$1");
    let text = POS_LABEL_LEADING.replace(&text, "");

    let collapsed = attach_punctuation(&collapse_whitespace(&text));
    trim_separators(&collapsed).to_string()
}

/// Collapse every whitespace run into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pull punctuation back onto the preceding word ("ice ." -> "ice.").
pub fn attach_punctuation(text: &str) -> String {
    SPACE_BEFORE_PUNCT.replace_all(text, "$1").into_owned()
}

fn join_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_parentheticals(text: &str) -> String {
    let mut result = text.to_string();
    while PARENTHETICAL.is_match(&result) {
        result = PARENTHETICAL.replace_all(&result, "").into_owned();
    }
    result
}

fn strip_list_markers(text: &str) -> String {
    let mut result = text.to_string();
    loop {
        let next = LIST_MARKER.replace_all(&result, "$1").into_owned();
        if next == result {
            return result;
        }
        result = next;
    }
}

/// Leading whitespace and stray punctuation go; a trailing sentence
/// terminator stays so the last sentence keeps its boundary.
fn trim_separators(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '.' | '!' | '?'))
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'))
}
