//! Hint extraction pipeline and its configuration.
//!
//! normalize -> mask -> meta-phrase removal -> split -> select -> finalize.
//! Every step is a pure transform; the extractor only holds read-only
//! configuration, so batches fan out across threads freely.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;

use crate::error::{HintError, Result};
use crate::finalize::Finalizer;
use crate::mask::{DEFAULT_MASK_TOKEN, mask_word};
use crate::meta::MetaPhrases;
use crate::normalize::normalize_definition;
use crate::select::{Limits, SelectionPolicy, select_sentences};
use crate::sentences::split_sentences;

pub const DEFAULT_MAX_WORDS: usize = 25;
pub const DEFAULT_MAX_SENTENCES: usize = 2;
pub const DEFAULT_PRIORITY_MARKER: &str = "Overall";

/// One dataset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub word: String,
    pub definition: String,
}

impl Entry {
    pub fn new(word: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HintConfig {
    pub max_words: usize,
    pub max_sentences: usize,
    pub policy: SelectionPolicy,
    pub mask_token: String,
    pub priority_marker: String,
    /// One regex per line; the built-in list is used when unset or unusable.
    pub meta_phrase_file: Option<PathBuf>,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            max_sentences: DEFAULT_MAX_SENTENCES,
            policy: SelectionPolicy::default(),
            mask_token: DEFAULT_MASK_TOKEN.to_string(),
            priority_marker: DEFAULT_PRIORITY_MARKER.to_string(),
            meta_phrase_file: None,
        }
    }
}

impl HintConfig {
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        let config: HintConfig = toml::from_str(content).map_err(|source| HintError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file. A relative `meta_phrase_file`
    /// is resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| HintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content, path)?;
        if let Some(dir) = path.parent() {
            config.meta_phrase_file = config
                .meta_phrase_file
                .take()
                .map(|file| if file.is_relative() { dir.join(file) } else { file });
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_words == 0 {
            return Err(HintError::InvalidConfig("max_words must be greater than 0".into()));
        }
        if self.max_sentences == 0 {
            return Err(HintError::InvalidConfig("max_sentences must be greater than 0".into()));
        }
        if self.mask_token.is_empty() {
            return Err(HintError::InvalidConfig("mask_token must not be empty".into()));
        }
        if self.priority_marker.trim().is_empty() {
            return Err(HintError::InvalidConfig("priority_marker must not be empty".into()));
        }
        Ok(())
    }
}

/// Configured hint pipeline. Build once, share across the whole run.
#[derive(Debug, Clone)]
pub struct HintExtractor {
    config: HintConfig,
    meta: MetaPhrases,
    finalizer: Finalizer,
}

impl HintExtractor {
    pub fn new(config: HintConfig, meta: MetaPhrases) -> Result<Self> {
        config.validate()?;
        let finalizer = Finalizer::new(&config.mask_token);
        Ok(Self {
            config,
            meta,
            finalizer,
        })
    }

    /// Build from config, loading the meta-phrase file it names (or the
    /// built-in list).
    pub fn from_config(config: HintConfig) -> Result<Self> {
        let meta = MetaPhrases::load_or_default(config.meta_phrase_file.as_deref());
        Self::new(config, meta)
    }

    pub fn config(&self) -> &HintConfig {
        &self.config
    }

    /// Derive a hint for `word` from `definition`. Never fails; unusable
    /// input gives an empty string.
    pub fn extract(&self, word: &str, definition: &str) -> String {
        let normalized = normalize_definition(definition);
        if normalized.is_empty() {
            return String::new();
        }

        let masked = mask_word(&normalized, word, &self.config.mask_token);
        let cleaned = self.meta.remove(&masked);

        let limits = Limits {
            max_words: self.config.max_words,
            max_sentences: self.config.max_sentences,
            policy: self.config.policy,
            priority_marker: &self.config.priority_marker,
        };
        let selected = select_sentences(split_sentences(&cleaned), &limits);
        self.finalizer.finalize(&selected)
    }

    pub fn extract_entry(&self, entry: &Entry) -> String {
        self.extract(&entry.word, &entry.definition)
    }

    /// Extract hints for many rows in parallel, preserving order.
    pub fn extract_batch(&self, entries: &[Entry]) -> Vec<String> {
        let hints: Vec<String> = entries.par_iter().map(|e| self.extract_entry(e)).collect();
        debug!(
            rows = entries.len(),
            empty = hints.iter().filter(|h| h.is_empty()).count(),
            "hint batch complete"
        );
        hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::TrimMode;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const GLACIER: &str = "noun: A glacier is a large, slow-moving mass of ice. \
        It forms over many years from compacted snow. \
        Overall, glaciers shape the land they travel over.";

    fn extractor(policy: SelectionPolicy, max_words: usize, max_sentences: usize) -> HintExtractor {
        let config = HintConfig {
            max_words,
            max_sentences,
            policy,
            ..HintConfig::default()
        };
        HintExtractor::from_config(config).unwrap()
    }

    #[test]
    fn priority_sentence_is_the_whole_hint() {
        let ex = extractor(
            SelectionPolicy::PriorityFirst {
                fallback: TrimMode::Completing,
            },
            10,
            2,
        );
        assert_eq!(
            ex.extract("glacier", GLACIER),
            "Overall, ____ shape the land they travel over."
        );
    }

    #[test]
    fn truncating_and_completing_differ_on_overflow() {
        let truncating = extractor(SelectionPolicy::Truncating, 12, 3);
        assert_eq!(
            truncating.extract("glacier", GLACIER),
            "A ____ is a large, slow-moving mass of ice."
        );

        let completing = extractor(SelectionPolicy::Completing, 12, 3);
        assert_eq!(
            completing.extract("glacier", GLACIER),
            "A ____ is a large, slow-moving mass of ice. It forms over many years from compacted snow."
        );
    }

    #[test]
    fn blank_definition_gives_empty_hint() {
        let ex = HintExtractor::from_config(HintConfig::default()).unwrap();
        assert_eq!(ex.extract("ice", ""), "");
        assert_eq!(ex.extract("ice", " \n\t "), "");
        assert_eq!(ex.extract("ice", "(only an aside)"), "");
    }

    #[test]
    fn meta_phrases_are_excised_before_selection() {
        let ex = extractor(SelectionPolicy::Completing, 25, 1);
        assert_eq!(
            ex.extract("bank", "The word bank has several meanings. A place that keeps money."),
            "A place that keeps money."
        );
    }

    #[test]
    fn decimals_inside_meta_phrases_leave_no_fragment() {
        let ex = HintExtractor::from_config(HintConfig::default()).unwrap();
        assert_eq!(
            ex.extract("ice", "See also page 3.5 for more. Ice is cold."),
            "____ is cold."
        );
    }

    #[test]
    fn batch_preserves_order() {
        let ex = HintExtractor::from_config(HintConfig::default()).unwrap();
        let entries = vec![
            Entry::new("ice", "Frozen water."),
            Entry::new("snow", ""),
            Entry::new("hail", "Balls of ice that fall like rain."),
        ];
        assert_eq!(ex.extract_batch(&entries), vec![
            "Frozen water.",
            "",
            "Balls of ice that fall like rain."
        ]);
    }

    #[test]
    fn rejects_zero_limits() {
        let config = HintConfig {
            max_words: 0,
            ..HintConfig::default()
        };
        assert!(matches!(
            HintExtractor::from_config(config),
            Err(HintError::InvalidConfig(_))
        ));
    }

    #[test]
    fn loads_toml_config_with_policy_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hints.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
max_words = 15
max_sentences = 3
meta_phrase_file = "meta.txt"

[policy]
mode = "priority_first"
fallback = "truncating"
"#
        )
        .unwrap();

        let config = HintConfig::load(&path).unwrap();
        assert_eq!(config.max_words, 15);
        assert_eq!(config.max_sentences, 3);
        assert_eq!(config.mask_token, "____");
        assert_eq!(config.policy, SelectionPolicy::PriorityFirst {
            fallback: TrimMode::Truncating
        });
        assert_eq!(config.meta_phrase_file, Some(dir.path().join("meta.txt")));
    }

    #[test]
    fn invalid_toml_values_are_rejected() {
        let err = HintConfig::from_toml_str("max_sentences = 0", Path::new("inline.toml")).unwrap_err();
        assert!(matches!(err, HintError::InvalidConfig(_)));

        let err = HintConfig::from_toml_str("[policy]\nmode = \"greedy\"", Path::new("inline.toml"))
            .unwrap_err();
        assert!(matches!(err, HintError::ConfigParse { .. }));
    }
}
