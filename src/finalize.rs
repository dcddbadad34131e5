//! Final clean-up of a selected hint: punctuation, leading boilerplate,
//! trailing period and casing.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::normalize::collapse_whitespace;

lazy_static! {
    static ref REPEATED_TERMINAL: Regex = Regex::new(r"([.!?])(?:\s*[.!?])+").unwrap();
    static ref LEADING_LIST_NUMBER: Regex = Regex::new(r"^(?:\d{1,3}[.)](?:\s+|$))+").unwrap();
    static ref SELF_REFERENCE: Regex =
        Regex::new(r"(?i)^(?:this (?:word|term) means|it means)\b\s*[:,]?\s*").unwrap();
}

/// Finalizer bound to a mask token.
#[derive(Debug, Clone)]
pub struct Finalizer {
    the_word: Option<Regex>,
}

impl Finalizer {
    pub fn new(mask: &str) -> Self {
        // "the word ____:" with optional quotes around the mask; a bare
        // "the word ____" at the very end goes too
        let pattern = format!(
            r#"^the word\s+["'“‘]?{}["'”’]?(?:[.,;:!?–—-]+\s*|\s*$)"#,
            regex::escape(mask)
        );
        let the_word = RegexBuilder::new(&pattern).case_insensitive(true).build().ok();
        Self { the_word }
    }

    /// Produce the final hint, or an empty string when nothing is left.
    ///
    /// Applying this to its own output returns the same string.
    pub fn finalize(&self, text: &str) -> String {
        let mut current = REPEATED_TERMINAL.replace_all(text, "$1").into_owned();
        loop {
            let next = self.strip_leading(&current);
            if next == current {
                break;
            }
            current = next;
        }

        if current.is_empty() {
            return String::new();
        }
        current.push('.');
        capitalize_first(&current)
    }

    fn strip_leading(&self, text: &str) -> String {
        let text = collapse_whitespace(text);
        let text = match &self.the_word {
            Some(re) => re.replace(&text, "").into_owned(),
            None => text,
        };
        let text = SELF_REFERENCE.replace(&text, "");
        let text = LEADING_LIST_NUMBER.replace(trim_edges(&text), "");
        trim_edges(&text).to_string()
    }
}

/// One-off finalization with the given mask token.
pub fn finalize_hint(text: &str, mask: &str) -> String {
    Finalizer::new(mask).finalize(text)
}

fn trim_edges(text: &str) -> &str {
    text.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '-' | '–' | '—' | '•')
    })
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn finalize(text: &str) -> String {
        finalize_hint(text, "____")
    }

    #[test]
    fn capitalizes_and_adds_period() {
        assert_eq!(finalize("a cold place"), "A cold place.");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(finalize(""), "");
        assert_eq!(finalize(" ...  "), "");
        assert_eq!(finalize("it means:"), "");
    }

    #[test]
    fn collapses_repeated_terminal_punctuation() {
        assert_eq!(finalize("A cold place..."), "A cold place.");
        assert_eq!(finalize("Cold!! Very cold. . ."), "Cold! Very cold.");
    }

    #[test]
    fn ends_with_exactly_one_period() {
        assert_eq!(finalize("Is it cold?"), "Is it cold.");
        assert_eq!(finalize("frozen;"), "Frozen.");
    }

    #[test]
    fn strips_leading_list_numbers() {
        assert_eq!(finalize("1. a cold place"), "A cold place.");
        assert_eq!(finalize("2) 3) icy"), "Icy.");
        assert_eq!(finalize("3.5 meters long"), "3.5 meters long.");
    }

    #[test]
    fn strips_the_word_mask_prefix_only_before_punctuation() {
        assert_eq!(finalize(r#"The word "____": a cold place"#), "A cold place.");
        assert_eq!(finalize("the word ____, a cold place"), "A cold place.");
        assert_eq!(finalize("the word ____ is cold"), "The word ____ is cold.");
    }

    #[test]
    fn a_lone_the_word_mask_phrase_leaves_nothing() {
        assert_eq!(finalize("the word ____."), "");
        assert_eq!(finalize(r#"the word "____"."#), "");
        assert_eq!(finalize("The word ____"), "");
        assert_eq!(finalize("1. the word ____. a cold place"), "A cold place.");
    }

    #[test]
    fn strips_self_referential_openers() {
        assert_eq!(finalize("It means: very cold"), "Very cold.");
        assert_eq!(finalize("this word means it means frozen water"), "Frozen water.");
        assert_eq!(finalize("It meanders through valleys"), "It meanders through valleys.");
    }

    #[test]
    fn respects_custom_mask_tokens() {
        let finalizer = Finalizer::new("[?]");
        assert_eq!(finalizer.finalize("the word [?]: a riddle"), "A riddle.");
    }

    fn hint_like() -> impl Strategy<Value = String> {
        let body = "[a-zA-Z0-9 .,!?:;'\"_()-]{0,40}";
        prop_oneof![
            body.prop_map(|s| s),
            body.prop_map(|s| format!("the word ____: {s}")),
            body.prop_map(|s| format!("1. it means {s}")),
            body.prop_map(|s| format!("{s}... ?!")),
        ]
    }

    proptest! {
        #[test]
        fn finalizing_is_idempotent(input in hint_like()) {
            let once = finalize(&input);
            let twice = finalize(&once);
            prop_assert_eq!(&twice, &once);
            prop_assert!(once.is_empty() || once.ends_with('.'));
            prop_assert!(!once.ends_with(".."));
        }
    }
}
