//! Hint extraction for word/definition datasets.
//!
//! The core pipeline turns a dictionary definition into a short hint that
//! never names the word: normalize, mask the word, strip meta commentary,
//! split into sentences, pick a few, then tidy the result. Around it sit
//! the dataset helpers: a candidate word filter, a personal-name list,
//! offline template hints and an optional AI backend.

pub mod error;
pub mod filter;
pub mod finalize;
pub mod hint;
pub mod logging;
pub mod mask;
pub mod meta;
pub mod names;
pub mod normalize;
pub mod remote;
pub mod select;
pub mod sentences;
pub mod table;
pub mod templates;

#[cfg(feature = "python")]
mod python;

pub use error::{HintError, Result};
pub use filter::{FilterReport, FilterRules, FilterSummary, FrequencySource, LengthRange, Rejection, WordFilter, WordRow};
pub use finalize::{Finalizer, finalize_hint};
pub use hint::{Entry, HintConfig, HintExtractor};
pub use logging::init_logging;
pub use mask::{DEFAULT_MASK_TOKEN, mask_word};
pub use meta::MetaPhrases;
pub use names::{NameList, init_names, is_known_name};
pub use normalize::normalize_definition;
pub use remote::{CompletionBackend, RemoteConfig, RemoteGenerator, build_prompt};
pub use select::{Limits, SelectionPolicy, TrimMode, select_sentences};
pub use sentences::split_sentences;
pub use table::hint_column_order;
pub use templates::procedural_hint;
