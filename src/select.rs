//! Sentence selection: pick a bounded prefix of the sentence sequence.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::HintError;

/// How an overflowing sentence is handled once `max_words` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimMode {
    /// Drop the sentence that would overflow.
    Truncating,
    /// Keep the overflowing sentence whole, then stop.
    #[default]
    Completing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionPolicy {
    Truncating,
    #[default]
    Completing,
    /// A sentence opening with the priority marker wins outright; otherwise
    /// `fallback` applies.
    PriorityFirst {
        #[serde(default)]
        fallback: TrimMode,
    },
}

impl SelectionPolicy {
    pub fn trim_mode(&self) -> TrimMode {
        match self {
            SelectionPolicy::Truncating => TrimMode::Truncating,
            SelectionPolicy::Completing => TrimMode::Completing,
            SelectionPolicy::PriorityFirst { fallback } => *fallback,
        }
    }

    pub fn uses_priority(&self) -> bool {
        matches!(self, SelectionPolicy::PriorityFirst { .. })
    }
}

impl FromStr for SelectionPolicy {
    type Err = HintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "truncating" => Ok(SelectionPolicy::Truncating),
            "completing" => Ok(SelectionPolicy::Completing),
            "priority_first" | "priority_first:completing" => Ok(SelectionPolicy::PriorityFirst {
                fallback: TrimMode::Completing,
            }),
            "priority_first:truncating" => Ok(SelectionPolicy::PriorityFirst {
                fallback: TrimMode::Truncating,
            }),
            _ => Err(HintError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::Truncating => f.write_str("truncating"),
            SelectionPolicy::Completing => f.write_str("completing"),
            SelectionPolicy::PriorityFirst { fallback: TrimMode::Truncating } => {
                f.write_str("priority_first:truncating")
            }
            SelectionPolicy::PriorityFirst { fallback: TrimMode::Completing } => {
                f.write_str("priority_first:completing")
            }
        }
    }
}

/// Limits and policy for one selection run.
#[derive(Debug, Clone, Copy)]
pub struct Limits<'a> {
    pub max_words: usize,
    pub max_sentences: usize,
    pub policy: SelectionPolicy,
    pub priority_marker: &'a str,
}

/// Select sentences according to `limits` and join them with spaces.
pub fn select_sentences<I>(sentences: I, limits: &Limits<'_>) -> String
where
    I: Iterator<Item = String> + Clone,
{
    if limits.policy.uses_priority() {
        if let Some(priority) = sentences
            .clone()
            .find(|s| starts_with_marker(s, limits.priority_marker))
        {
            return priority;
        }
    }

    let mut selected: Vec<String> = Vec::new();
    let mut total_words = 0;

    for sentence in sentences.take(limits.max_sentences) {
        let words = sentence.split_whitespace().count();
        match limits.policy.trim_mode() {
            TrimMode::Truncating => {
                if total_words + words > limits.max_words {
                    break;
                }
                total_words += words;
                selected.push(sentence);
            }
            TrimMode::Completing => {
                total_words += words;
                selected.push(sentence);
                if total_words >= limits.max_words {
                    break;
                }
            }
        }
    }

    selected.join(" ")
}

/// True when the sentence's first word is `marker` (any case) followed by
/// whitespace or punctuation.
pub fn starts_with_marker(sentence: &str, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    let Some(head) = sentence.get(..marker.len()) else {
        return false;
    };
    if head.to_lowercase() != marker.to_lowercase() {
        return false;
    }
    sentence[marker.len()..]
        .chars()
        .next()
        .is_some_and(|c| c.is_whitespace() || c.is_ascii_punctuation())
}
