//! Error type shared by the configuration loaders, the word filter and
//! the remote backend. The hint pipeline itself never fails.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HintError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid meta-phrase pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown selection policy `{0}`")]
    UnknownPolicy(String),
    #[error("invalid word length range {min}-{max}")]
    LengthRange { min: usize, max: usize },
    #[error("remote completion failed: {0}")]
    Remote(String),
    #[cfg(feature = "remote")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

pub type Result<T, E = HintError> = std::result::Result<T, E>;

#[cfg(feature = "python")]
impl From<HintError> for pyo3::PyErr {
    fn from(err: HintError) -> Self {
        match err {
            HintError::Io { .. } => pyo3::exceptions::PyIOError::new_err(err.to_string()),
            other => pyo3::exceptions::PyValueError::new_err(other.to_string()),
        }
    }
}
