//! Meta-phrase removal.
//!
//! Dictionary text is full of commentary about the entry itself ("has
//! several meanings", "see also ..."). Each pattern excises its own match
//! plus the rest of the clause up to the next sentence terminator.

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use tracing::{info, warn};

use crate::error::{HintError, Result};
use crate::normalize::{attach_punctuation, collapse_whitespace};

/// Built-in patterns used when no pattern file is supplied.
pub const DEFAULT_META_PATTERNS: &[&str] = &[
    r"(?:\b(?:the|this) (?:word|term)\b[^.!?]*?\s)?\b(?:has|have) (?:several|many|multiple|various|different) (?:meanings|senses|definitions|uses)",
    r"\b(?:it|this) (?:is|can be) used in (?:several|many|various|different) (?:ways|senses|contexts)",
    r"\bdepending on (?:the )?context",
    r"\bin (?:some|certain|other|different) contexts\b",
    r"\bsee also\b",
    r"\bcompare with\b",
    r"\bas an? (?:noun|verb|adjective|adverb)\b",
    r"\bfor example\b",
    r"\b(?:informal|slang|archaic|obsolete|dated) usage\b",
];

lazy_static! {
    static ref ORPHAN_COMMA: Regex = Regex::new(r"[,;:]+([.!?])").unwrap();
}

/// Ordered, compiled list of removal patterns.
#[derive(Debug, Clone)]
pub struct MetaPhrases {
    patterns: Vec<Regex>,
}

impl Default for MetaPhrases {
    fn default() -> Self {
        // Built-in patterns are fixed and known to compile
        let patterns = DEFAULT_META_PATTERNS
            .iter()
            .filter_map(|p| compile(p).ok())
            .collect();
        Self { patterns }
    }
}

impl MetaPhrases {
    /// Compile patterns strictly, failing on the first invalid one.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Load a one-pattern-per-line file, ignoring blank lines and `#`
    /// comments. Invalid lines are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| HintError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut patterns = Vec::new();
        for line in pattern_lines(&content) {
            match compile(line) {
                Ok(re) => patterns.push(re),
                Err(e) => warn!("Skipping meta-phrase pattern in {}: {}", path.display(), e),
            }
        }
        Ok(Self { patterns })
    }

    /// Load from `path` if given, falling back to the built-in list when
    /// the file is missing, unreadable or has no usable pattern.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(path) {
            Ok(phrases) if !phrases.is_empty() => {
                info!("Loaded {} meta-phrase patterns from {}", phrases.len(), path.display());
                phrases
            }
            Ok(_) => {
                warn!("No usable meta-phrase patterns in {}; using built-in list", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("{}; using built-in meta-phrase list", e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Apply every pattern in order and tidy the punctuation left behind.
    pub fn remove(&self, text: &str) -> String {
        let mut result = text.to_string();
        for pattern in &self.patterns {
            if pattern.is_match(&result) {
                result = pattern.replace_all(&result, "").into_owned();
            }
        }
        let result = attach_punctuation(&collapse_whitespace(&result));
        ORPHAN_COMMA.replace_all(&result, "$1").trim().to_string()
    }
}

fn pattern_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Each phrase consumes itself and everything up to the next terminator.
/// Decimal points ("3.5") are not terminators.
fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(&format!(r"(?:{pattern})(?:\d+(?:\.\d+)+|[^.!?])*"))
        .case_insensitive(true)
        .build()
        .map_err(|source| HintError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn removes_phrase_through_end_of_clause() {
        let meta = MetaPhrases::default();
        assert_eq!(
            meta.remove("The word ____ has several meanings in English. It is cold."),
            ". It is cold."
        );
        assert_eq!(
            meta.remove("A large mass of ice, depending on the context of use. It moves."),
            "A large mass of ice. It moves."
        );
        assert_eq!(meta.remove("A frozen river. See also: iceberg"), "A frozen river.");
    }

    #[test]
    fn removal_runs_past_decimal_points() {
        let meta = MetaPhrases::default();
        assert_eq!(
            meta.remove("See also page 3.5 for more. Ice is cold."),
            ". Ice is cold."
        );
        assert_eq!(
            meta.remove("Cold, for example 1.2.3 or 4.5. Snow too."),
            "Cold. Snow too."
        );
    }

    #[test]
    fn unmatched_patterns_are_noops() {
        let meta = MetaPhrases::default();
        let text = "A large, slow-moving mass of ice.";
        assert_eq!(meta.remove(text), text);
    }

    #[test]
    fn patterns_apply_in_order_case_insensitively() {
        let meta = MetaPhrases::from_patterns(["alpha", "BETA"]).unwrap();
        assert_eq!(meta.remove("Keep this. ALPHA beta gone. Beta too! End."), "Keep this..! End.");
    }

    #[test]
    fn strict_loader_rejects_invalid_patterns() {
        let err = MetaPhrases::from_patterns(["ok", "(unclosed"]).unwrap_err();
        assert!(matches!(err, HintError::Pattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn file_loader_skips_comments_blanks_and_bad_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# boilerplate").unwrap();
        writeln!(file).unwrap();
        writeln!(file, r"\bsee also\b").unwrap();
        writeln!(file, "(broken").unwrap();
        writeln!(file, "  in other words  ").unwrap();

        let meta = MetaPhrases::load(file.path()).unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.remove("Cold. In other words, frozen. Fine."), "Cold.. Fine.");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let meta = MetaPhrases::load_or_default(Some(Path::new("/nonexistent/meta_phrases.txt")));
        assert_eq!(meta.len(), DEFAULT_META_PATTERNS.len());

        let empty = tempfile::NamedTempFile::new().unwrap();
        let meta = MetaPhrases::load_or_default(Some(empty.path()));
        assert_eq!(meta.len(), DEFAULT_META_PATTERNS.len());
    }
}
