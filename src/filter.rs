//! Word dataset filtering.
//!
//! Keeps modern, common, non-proper English words: length window, pure
//! lowercase letters, not a personal name, no organisation/taxonomy
//! suffix, no banned topic in the definition, frequent enough, first
//! occurrence only.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::error::{HintError, Result};
use crate::names::NameList;

pub const DEFAULT_MIN_LEN: usize = 2;
pub const DEFAULT_MAX_LEN: usize = 15;
pub const MAX_ALLOWED_LEN: usize = 30;
/// Zipf scale; 3.0 is roughly "common modern English".
pub const DEFAULT_FREQUENCY_THRESHOLD: f64 = 2.3;

pub const BANNED_SUFFIXES: &[&str] = &[
    "ium", "us", "ae", "aceae", "idae", "virus", "tech", "corp", "inc", "solutions", "pharma",
    "systems", "press", "media", "university", "institute", "studios",
];

pub const BANNED_KEYWORDS: &[&str] = &[
    // People / names
    "name", "given name", "surname", "nickname", "personal name", "forename", "philosopher",
    "historian",
    // Geographic
    "city", "town", "village", "country", "province", "continent", "region", "river", "lake",
    "mountain", "island", "ocean", "bay", "harbor", "africa", "china", "asia", "asian",
    "australia", "australian", "new zealand", "india", "indian", "texan", "thai", "rome", "uzbek",
    "ireland", "balkan", "arab", "croat", "britain", "persia",
    // Plants / animals / biology
    "plant", "tree", "flower", "species", "genus", "bacterium", "virus", "fungus", "insect",
    "mammal", "reptile", "amphibian",
    // Companies / brands / organizations
    "brand", "company", "corporation", "organization", "manufacturer", "university", "school",
    "college", "institute", "foundation",
    // Mythology / religion / culture
    "mythology", "god", "goddess", "deity", "hero", "legend", "saint", "planet", "star",
    "constellation", "galaxy", "solar system", "republic", "islam", "islamic", "dialect",
    "phonetic", "jewish", "nomadic", "hindu", "tajik", "amish", "american", "irish", "arabic",
    // Science / chemistry
    "chemical", "element", "compound", "mineral", "exon", "nixtamalized", "alkaline", "php",
    "zoology", "biology",
    // Others
    "stein", "brule", "ouija",
];

lazy_static! {
    static ref LOWERCASE_WORD: Regex = Regex::new(r"^[a-z]+$").unwrap();
    static ref SUFFIX_PATTERNS: Vec<Regex> = BANNED_SUFFIXES
        .iter()
        .map(|suffix| Regex::new(&format!("{}$", regex::escape(suffix))).unwrap())
        .collect();
}

/// Inclusive word-length window, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl Default for LengthRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_LEN,
            max: DEFAULT_MAX_LEN,
        }
    }
}

impl LengthRange {
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min < 1 || max < 1 || min > max || max > MAX_ALLOWED_LEN {
            return Err(HintError::LengthRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Missing bounds take their default; an invalid pair falls back to
    /// the default window.
    pub fn resolve(min: Option<usize>, max: Option<usize>) -> Self {
        let min = min.unwrap_or(DEFAULT_MIN_LEN);
        let max = max.unwrap_or(DEFAULT_MAX_LEN);
        match Self::new(min, max) {
            Ok(range) => range,
            Err(e) => {
                let fallback = Self::default();
                warn!("{}; using default range {}-{}", e, fallback.min, fallback.max);
                fallback
            }
        }
    }

    pub fn contains(&self, len: usize) -> bool {
        (self.min..=self.max).contains(&len)
    }
}

/// External word-frequency lookup (Zipf scale).
///
/// `None` means the source has no data for the word. What that implies is
/// up to [`FilterRules::missing_is_rare`]: by default the frequency check
/// is skipped; with the flag set the word counts as Zipf 0.0, the way a
/// full-corpus lookup scores unknown words.
pub trait FrequencySource {
    fn zipf_frequency(&self, word: &str) -> Option<f64>;
}

impl FrequencySource for HashMap<String, f64> {
    fn zipf_frequency(&self, word: &str) -> Option<f64> {
        self.get(word).copied()
    }
}

/// No frequency data: the frequency check is skipped.
pub struct NoFrequencies;

impl FrequencySource for NoFrequencies {
    fn zipf_frequency(&self, _word: &str) -> Option<f64> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rejection {
    Length,
    NotAlphabetic,
    Name,
    BannedSuffix,
    BannedKeyword,
    LowFrequency,
    Duplicate,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Length => "length",
            Rejection::NotAlphabetic => "not_alphabetic",
            Rejection::Name => "name",
            Rejection::BannedSuffix => "banned_suffix",
            Rejection::BannedKeyword => "banned_keyword",
            Rejection::LowFrequency => "low_frequency",
            Rejection::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct FilterRules {
    pub length: LengthRange,
    pub banned_suffixes: Vec<Regex>,
    /// Lowercase; matched as substrings of the lowercased definition.
    pub banned_keywords: Vec<String>,
    pub frequency_threshold: f64,
    /// Treat words the frequency source does not know as Zipf 0.0.
    pub missing_is_rare: bool,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self::with_length(LengthRange::default())
    }
}

impl FilterRules {
    pub fn with_length(length: LengthRange) -> Self {
        Self {
            length,
            banned_suffixes: SUFFIX_PATTERNS.clone(),
            banned_keywords: BANNED_KEYWORDS.iter().map(|kw| kw.to_string()).collect(),
            frequency_threshold: DEFAULT_FREQUENCY_THRESHOLD,
            missing_is_rare: false,
        }
    }
}

/// One input row.
#[derive(Debug, Clone, Copy)]
pub struct WordRow<'r> {
    pub word: &'r str,
    pub definition: Option<&'r str>,
}

/// Counts over the rows that passed the length window, matching how the
/// dataset is reported after length filtering. Length rejections are
/// counted separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub length_rejected: usize,
    pub total: usize,
    pub kept: usize,
    pub removed: usize,
    pub duplicates_removed: usize,
}

impl FilterSummary {
    pub fn percent_kept(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.kept as f64 / self.total as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    /// Indices of kept rows, in input order.
    pub kept: Vec<usize>,
    /// Normalized (trimmed, lowercased) word for each kept row.
    pub words: Vec<String>,
    pub rejections: BTreeMap<Rejection, usize>,
    pub summary: FilterSummary,
}

pub struct WordFilter<'n> {
    rules: FilterRules,
    names: Option<&'n NameList>,
}

impl<'n> WordFilter<'n> {
    pub fn new(rules: FilterRules) -> Self {
        Self { rules, names: None }
    }

    pub fn with_names(mut self, names: &'n NameList) -> Self {
        self.names = Some(names);
        self
    }

    pub fn rules(&self) -> &FilterRules {
        &self.rules
    }

    /// Check a single row, ignoring duplicates.
    pub fn check(
        &self,
        word: &str,
        definition: Option<&str>,
        frequencies: &dyn FrequencySource,
    ) -> std::result::Result<(), Rejection> {
        let word = normalize_word(word);

        if !self.rules.length.contains(word.chars().count()) {
            return Err(Rejection::Length);
        }
        if !LOWERCASE_WORD.is_match(&word) {
            return Err(Rejection::NotAlphabetic);
        }
        if self.names.is_some_and(|names| names.contains(&word)) {
            return Err(Rejection::Name);
        }
        if self.rules.banned_suffixes.iter().any(|re| re.is_match(&word)) {
            return Err(Rejection::BannedSuffix);
        }
        if let Some(definition) = definition {
            let definition = definition.to_lowercase();
            if self
                .rules
                .banned_keywords
                .iter()
                .any(|kw| definition.contains(kw.as_str()))
            {
                return Err(Rejection::BannedKeyword);
            }
        }
        let freq = match frequencies.zipf_frequency(&word) {
            Some(freq) => Some(freq),
            None if self.rules.missing_is_rare => Some(0.0),
            None => None,
        };
        if let Some(freq) = freq {
            if freq < self.rules.frequency_threshold {
                return Err(Rejection::LowFrequency);
            }
        }
        Ok(())
    }

    /// Filter rows, then drop later duplicates of an already-kept word.
    pub fn filter(&self, rows: &[WordRow<'_>], frequencies: &dyn FrequencySource) -> FilterReport {
        let mut report = FilterReport::default();
        let mut seen: HashSet<String> = HashSet::new();

        for (index, row) in rows.iter().enumerate() {
            let outcome = self
                .check(row.word, row.definition, frequencies)
                .and_then(|()| {
                    let word = normalize_word(row.word);
                    if seen.insert(word.clone()) {
                        Ok(word)
                    } else {
                        Err(Rejection::Duplicate)
                    }
                });

            match outcome {
                Ok(word) => {
                    report.kept.push(index);
                    report.words.push(word);
                }
                Err(reason) => *report.rejections.entry(reason).or_insert(0) += 1,
            }
        }

        let length_rejected = report.rejections.get(&Rejection::Length).copied().unwrap_or(0);
        let total = rows.len() - length_rejected;
        report.summary = FilterSummary {
            length_rejected,
            total,
            kept: report.kept.len(),
            removed: total - report.kept.len(),
            duplicates_removed: report.rejections.get(&Rejection::Duplicate).copied().unwrap_or(0),
        };
        info!(
            length_rejected = report.summary.length_rejected,
            total = report.summary.total,
            kept = report.summary.kept,
            removed = report.summary.removed,
            duplicates = report.summary.duplicates_removed,
            "word filter complete ({:.2}% kept)",
            report.summary.percent_kept()
        );
        report
    }
}

fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}
