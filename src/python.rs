//! Python bindings.

use std::collections::HashMap;
use std::path::PathBuf;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::filter::{FilterRules, LengthRange, WordFilter, WordRow};
use crate::hint::{Entry, HintConfig, HintExtractor};
use crate::meta::MetaPhrases;
use crate::names::{self, global_names};
use crate::{logging, mask, normalize, remote, sentences, table, templates};

fn extractor(
    max_words: usize,
    max_sentences: usize,
    policy: &str,
    mask_token: String,
    priority_marker: String,
    meta_phrase_file: Option<PathBuf>,
) -> PyResult<HintExtractor> {
    let config = HintConfig {
        max_words,
        max_sentences,
        policy: policy.parse()?,
        mask_token,
        priority_marker,
        meta_phrase_file,
    };
    Ok(HintExtractor::from_config(config)?)
}

fn entries(words: Vec<String>, definitions: Vec<Option<String>>) -> PyResult<Vec<Entry>> {
    if words.len() != definitions.len() {
        return Err(PyValueError::new_err(format!(
            "words and definitions differ in length ({} vs {})",
            words.len(),
            definitions.len()
        )));
    }
    Ok(words
        .into_iter()
        .zip(definitions)
        .map(|(word, definition)| Entry::new(word, definition.unwrap_or_default()))
        .collect())
}

/// Extract a hint for one word from its definition.
/// A missing definition gives an empty hint.
#[pyfunction]
#[pyo3(signature = (
    word,
    definition,
    max_words = 25,
    max_sentences = 2,
    policy = "completing",
    mask_token = "____".to_string(),
    priority_marker = "Overall".to_string(),
    meta_phrase_file = None,
))]
#[allow(clippy::too_many_arguments)]
fn generate_hint(
    word: String,
    definition: Option<String>,
    max_words: usize,
    max_sentences: usize,
    policy: &str,
    mask_token: String,
    priority_marker: String,
    meta_phrase_file: Option<PathBuf>,
) -> PyResult<String> {
    let extractor = extractor(max_words, max_sentences, policy, mask_token, priority_marker, meta_phrase_file)?;
    Ok(definition.map_or_else(String::new, |d| extractor.extract(&word, &d)))
}

/// Batch version of `generate_hint`, parallel over rows. Output order
/// matches input order.
#[pyfunction]
#[pyo3(signature = (
    words,
    definitions,
    max_words = 25,
    max_sentences = 2,
    policy = "completing",
    mask_token = "____".to_string(),
    priority_marker = "Overall".to_string(),
    meta_phrase_file = None,
))]
#[allow(clippy::too_many_arguments)]
fn generate_hints_batch(
    words: Vec<String>,
    definitions: Vec<Option<String>>,
    max_words: usize,
    max_sentences: usize,
    policy: &str,
    mask_token: String,
    priority_marker: String,
    meta_phrase_file: Option<PathBuf>,
) -> PyResult<Vec<String>> {
    let extractor = extractor(max_words, max_sentences, policy, mask_token, priority_marker, meta_phrase_file)?;
    let entries = entries(words, definitions)?;
    Ok(extractor.extract_batch(&entries))
}

#[pyfunction]
#[pyo3(signature = (text))]
fn normalize_definition(text: Option<String>) -> String {
    text.map(|t| normalize::normalize_definition(&t)).unwrap_or_default()
}

#[pyfunction]
#[pyo3(signature = (text, word, mask = "____"))]
fn mask_word(text: &str, word: &str, mask: &str) -> String {
    mask::mask_word(text, word, mask)
}

#[pyfunction]
fn split_sentences(text: &str) -> Vec<String> {
    sentences::split_sentences(text).collect()
}

#[pyfunction]
#[pyo3(signature = (text, mask = "____"))]
fn finalize_hint(text: &str, mask: &str) -> String {
    crate::finalize::finalize_hint(text, mask)
}

/// Number of meta-phrase patterns that would be used for `path`
/// (the built-in list when the file is missing or unusable).
#[pyfunction]
#[pyo3(signature = (path = None))]
fn load_meta_phrases(path: Option<PathBuf>) -> usize {
    MetaPhrases::load_or_default(path.as_deref()).len()
}

/// Word filter outcome returned from Rust
#[pyclass]
#[derive(Clone)]
struct FilterResult {
    #[pyo3(get)]
    kept_indices: Vec<usize>,
    #[pyo3(get)]
    words: Vec<String>,
    #[pyo3(get)]
    rejections: HashMap<String, usize>,
    #[pyo3(get)]
    length_rejected: usize,
    #[pyo3(get)]
    total: usize,
    #[pyo3(get)]
    kept: usize,
    #[pyo3(get)]
    removed: usize,
    #[pyo3(get)]
    duplicates_removed: usize,
    #[pyo3(get)]
    percent_kept: f64,
}

/// Filter candidate words. Rows are checked against the process-wide
/// name list when one was loaded with `init_names` and `use_names` is set.
#[pyfunction]
#[pyo3(signature = (
    words,
    definitions = None,
    frequencies = None,
    min_len = None,
    max_len = None,
    frequency_threshold = crate::filter::DEFAULT_FREQUENCY_THRESHOLD,
    use_names = true,
    missing_is_rare = false,
))]
#[allow(clippy::too_many_arguments)]
fn filter_words(
    words: Vec<String>,
    definitions: Option<Vec<Option<String>>>,
    frequencies: Option<Vec<Option<f64>>>,
    min_len: Option<usize>,
    max_len: Option<usize>,
    frequency_threshold: f64,
    use_names: bool,
    missing_is_rare: bool,
) -> PyResult<FilterResult> {
    for (name, len) in [
        ("definitions", definitions.as_ref().map(Vec::len)),
        ("frequencies", frequencies.as_ref().map(Vec::len)),
    ] {
        if let Some(len) = len.filter(|&len| len != words.len()) {
            return Err(PyValueError::new_err(format!(
                "{name} length {len} does not match {} words",
                words.len()
            )));
        }
    }

    let rows: Vec<WordRow<'_>> = words
        .iter()
        .enumerate()
        .map(|(i, word)| WordRow {
            word,
            definition: definitions.as_ref().and_then(|d| d[i].as_deref()),
        })
        .collect();

    let mut frequency_map: HashMap<String, f64> = HashMap::new();
    if let Some(frequencies) = &frequencies {
        for (word, freq) in words.iter().zip(frequencies) {
            if let Some(freq) = freq {
                frequency_map.entry(word.trim().to_lowercase()).or_insert(*freq);
            }
        }
    }

    let rules = FilterRules {
        frequency_threshold,
        missing_is_rare,
        ..FilterRules::with_length(LengthRange::resolve(min_len, max_len))
    };
    let mut filter = WordFilter::new(rules);
    if let Some(names) = global_names().filter(|_| use_names) {
        filter = filter.with_names(names);
    }

    let report = filter.filter(&rows, &frequency_map);
    Ok(FilterResult {
        rejections: report
            .rejections
            .iter()
            .map(|(reason, count)| (reason.as_str().to_string(), *count))
            .collect(),
        length_rejected: report.summary.length_rejected,
        total: report.summary.total,
        kept: report.summary.kept,
        removed: report.summary.removed,
        duplicates_removed: report.summary.duplicates_removed,
        percent_kept: report.summary.percent_kept(),
        kept_indices: report.kept,
        words: report.words,
    })
}

/// Load the personal-name list from a file or directory.
#[pyfunction]
fn init_names(path: PathBuf) -> PyResult<usize> {
    Ok(names::init_names(&path)?)
}

#[pyfunction]
fn is_known_name(word: &str) -> bool {
    names::is_known_name(word)
}

/// Template hints with no model; pass a seed for reproducible output.
#[pyfunction]
#[pyo3(signature = (definitions, seed = None))]
fn procedural_hints(definitions: Vec<Option<String>>, seed: Option<u64>) -> Vec<String> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    definitions
        .iter()
        .map(|d| templates::procedural_hint(d.as_deref().unwrap_or_default(), &mut rng))
        .collect()
}

#[pyfunction]
#[pyo3(signature = (word, definition = None))]
fn build_prompt(word: &str, definition: Option<&str>) -> String {
    remote::build_prompt(word, definition.unwrap_or_default())
}

/// AI-written hints. Failed batches come back as empty strings.
#[cfg(feature = "remote")]
#[pyfunction]
#[pyo3(signature = (
    words,
    definitions,
    model = remote::DEFAULT_MODEL.to_string(),
    batch_size = remote::DEFAULT_BATCH_SIZE,
    temperature = remote::DEFAULT_TEMPERATURE,
    backoff_secs = 5.0,
    endpoint = None,
    api_key = None,
))]
#[allow(clippy::too_many_arguments)]
fn generate_ai_hints(
    words: Vec<String>,
    definitions: Vec<Option<String>>,
    model: String,
    batch_size: usize,
    temperature: f64,
    backoff_secs: f64,
    endpoint: Option<String>,
    api_key: Option<String>,
) -> PyResult<Vec<String>> {
    let entries = entries(words, definitions)?;
    let defaults = remote::RemoteConfig::default();
    let config = remote::RemoteConfig {
        model,
        batch_size,
        temperature,
        backoff: std::time::Duration::try_from_secs_f64(backoff_secs)
            .map_err(|e| PyValueError::new_err(format!("invalid backoff: {e}")))?,
        endpoint: endpoint.unwrap_or(defaults.endpoint),
        ..defaults
    };

    let backend = match api_key {
        Some(key) => remote::OpenAiBackend::new(&config, key)?,
        None => remote::OpenAiBackend::from_env(&config)?,
    };
    Ok(remote::RemoteGenerator::new(backend, &config).generate(&entries))
}

#[pyfunction]
fn hint_column_order(columns: Vec<String>) -> Vec<String> {
    table::hint_column_order(&columns)
}

#[pyfunction]
#[pyo3(signature = (filter = logging::DEFAULT_LOG_FILTER))]
fn init_logging(filter: &str) -> bool {
    logging::init_logging(filter)
}

#[pymodule]
fn rust_hint_clean(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(generate_hint, m)?)?;
    m.add_function(wrap_pyfunction!(generate_hints_batch, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_definition, m)?)?;
    m.add_function(wrap_pyfunction!(mask_word, m)?)?;
    m.add_function(wrap_pyfunction!(split_sentences, m)?)?;
    m.add_function(wrap_pyfunction!(finalize_hint, m)?)?;
    m.add_function(wrap_pyfunction!(load_meta_phrases, m)?)?;
    m.add_function(wrap_pyfunction!(filter_words, m)?)?;
    m.add_function(wrap_pyfunction!(init_names, m)?)?;
    m.add_function(wrap_pyfunction!(is_known_name, m)?)?;
    m.add_function(wrap_pyfunction!(procedural_hints, m)?)?;
    m.add_function(wrap_pyfunction!(build_prompt, m)?)?;
    #[cfg(feature = "remote")]
    m.add_function(wrap_pyfunction!(generate_ai_hints, m)?)?;
    m.add_function(wrap_pyfunction!(hint_column_order, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    m.add_class::<FilterResult>()?;
    Ok(())
}
