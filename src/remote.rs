//! AI-written hints through an OpenAI-compatible chat completion API.
//!
//! Rows go out in fixed-size sequential batches. A failed batch (backend
//! error or a response of the wrong length) yields empty hints for every
//! row in it, then the generator waits one backoff interval and moves on.

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{HintError, Result};
use crate::hint::Entry;
use crate::normalize::normalize_definition;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_TEMPERATURE: f64 = 0.8;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a crossword puzzle clue writer.";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Fixed instruction template for one row.
pub fn build_prompt(word: &str, definition: &str) -> String {
    let definition = normalize_definition(definition);
    format!(
        "Generate a concise, crossword-style hint for the English word '{word}'. \
         The hint should be playful but not too easy. Avoid using the word itself or direct synonyms. \
         Base your clue on this definition: '{definition}'. \
         Write 1-4 short sentences, natural and engaging."
    )
}

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub model: String,
    pub batch_size: usize,
    /// Sampling temperature; a little variation keeps clues natural
    pub temperature: f64,
    pub max_tokens: u32,
    pub backoff: Duration,
    pub system_prompt: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: 256,
            backoff: DEFAULT_BACKOFF,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Text-completion service: one completion per prompt, same order.
pub trait CompletionBackend {
    fn complete(&self, prompts: &[String]) -> Result<Vec<String>>;
}

pub struct RemoteGenerator<B> {
    backend: B,
    batch_size: usize,
    backoff: Duration,
}

impl<B: CompletionBackend> RemoteGenerator<B> {
    pub fn new(backend: B, config: &RemoteConfig) -> Self {
        Self {
            backend,
            batch_size: config.batch_size.max(1),
            backoff: config.backoff,
        }
    }

    /// One hint per entry, in input order. Never fails.
    pub fn generate(&self, entries: &[Entry]) -> Vec<String> {
        let mut hints = Vec::with_capacity(entries.len());
        let mut failed_batches = 0;

        for (index, batch) in entries.chunks(self.batch_size).enumerate() {
            let prompts: Vec<String> = batch
                .iter()
                .map(|e| build_prompt(&e.word, &e.definition))
                .collect();

            let result = self.backend.complete(&prompts).and_then(|completions| {
                if completions.len() == batch.len() {
                    Ok(completions)
                } else {
                    Err(HintError::Remote(format!(
                        "expected {} completions, got {}",
                        batch.len(),
                        completions.len()
                    )))
                }
            });

            match result {
                Ok(completions) => {
                    debug!(batch = index, rows = batch.len(), "batch complete");
                    hints.extend(completions.into_iter().map(|c| c.trim().to_string()));
                }
                Err(e) => {
                    warn!(batch = index, rows = batch.len(), "API error: {}", e);
                    failed_batches += 1;
                    hints.extend(std::iter::repeat_n(String::new(), batch.len()));
                    thread::sleep(self.backoff);
                }
            }
        }

        info!(rows = entries.len(), failed_batches, "remote hint generation finished");
        hints
    }
}

#[cfg(feature = "remote")]
pub use openai::OpenAiBackend;

#[cfg(feature = "remote")]
mod openai {
    use std::time::Duration;

    use reqwest::blocking::Client;
    use serde_json::Value;

    use super::{API_KEY_ENV, CompletionBackend, RemoteConfig};
    use crate::error::{HintError, Result};

    /// Blocking client for OpenAI-compatible `/chat/completions` endpoints.
    pub struct OpenAiBackend {
        client: Client,
        config: RemoteConfig,
        api_key: String,
    }

    impl OpenAiBackend {
        pub fn new(config: &RemoteConfig, api_key: impl Into<String>) -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(5))
                .build()?;
            Ok(Self {
                client,
                config: config.clone(),
                api_key: api_key.into(),
            })
        }

        /// Read the API key from `OPENAI_API_KEY`.
        pub fn from_env(config: &RemoteConfig) -> Result<Self> {
            let api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty())
                .ok_or(HintError::MissingEnv(API_KEY_ENV))?;
            Self::new(config, api_key)
        }

        fn chat(&self, prompt: &str) -> Result<String> {
            let request_body = serde_json::json!({
                "model": self.config.model,
                "messages": [
                    { "role": "system", "content": self.config.system_prompt },
                    { "role": "user", "content": prompt },
                ],
                "max_tokens": self.config.max_tokens,
                "temperature": self.config.temperature,
                "n": 1
            });

            let response = self
                .client
                .post(&self.config.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().unwrap_or_default();
                return Err(HintError::Remote(format!("request failed ({status}): {text}")));
            }

            let payload: Value = response.json()?;
            let choice = payload["choices"]
                .as_array()
                .and_then(|choices| choices.first())
                .ok_or_else(|| HintError::Remote(format!("unparseable response: {payload}")))?;

            // A null content is an empty hint, not a failure
            Ok(choice["message"]["content"].as_str().unwrap_or_default().trim().to_string())
        }
    }

    impl CompletionBackend for OpenAiBackend {
        fn complete(&self, prompts: &[String]) -> Result<Vec<String>> {
            prompts.iter().map(|prompt| self.chat(prompt)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    /// Echoes the quoted word of each prompt; fails on chosen calls.
    struct ScriptedBackend {
        calls: Cell<usize>,
        fail_on: Vec<usize>,
        short_on: Vec<usize>,
    }

    impl ScriptedBackend {
        fn new(fail_on: Vec<usize>, short_on: Vec<usize>) -> Self {
            Self {
                calls: Cell::new(0),
                fail_on,
                short_on,
            }
        }
    }

    impl CompletionBackend for ScriptedBackend {
        fn complete(&self, prompts: &[String]) -> Result<Vec<String>> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if self.fail_on.contains(&call) {
                return Err(HintError::Remote("quota exceeded".into()));
            }
            let mut out: Vec<String> = prompts
                .iter()
                .map(|p| format!("  clue for {}  ", p.split('\'').nth(1).unwrap_or("?")))
                .collect();
            if self.short_on.contains(&call) {
                out.pop();
            }
            Ok(out)
        }
    }

    fn entries(n: usize) -> Vec<Entry> {
        (0..n).map(|i| Entry::new(format!("w{i}"), "Some definition.")).collect()
    }

    fn config(batch_size: usize) -> RemoteConfig {
        RemoteConfig {
            batch_size,
            backoff: Duration::ZERO,
            ..RemoteConfig::default()
        }
    }

    #[test]
    fn prompt_embeds_word_and_cleaned_definition() {
        let prompt = build_prompt("glacier", "noun: A slow\n  mass of ice (frozen).");
        assert!(prompt.contains("English word 'glacier'"));
        assert!(prompt.contains("definition: 'A slow mass of ice.'"));
    }

    #[test]
    fn batches_are_sequential_and_ordered() {
        let generator = RemoteGenerator::new(ScriptedBackend::new(vec![], vec![]), &config(2));
        let hints = generator.generate(&entries(5));
        assert_eq!(hints, vec![
            "clue for w0",
            "clue for w1",
            "clue for w2",
            "clue for w3",
            "clue for w4"
        ]);
        assert_eq!(generator.backend.calls.get(), 3);
    }

    #[test]
    fn failed_batch_becomes_empty_and_processing_continues() {
        let generator = RemoteGenerator::new(ScriptedBackend::new(vec![1], vec![]), &config(2));
        let hints = generator.generate(&entries(5));
        assert_eq!(hints, vec!["clue for w0", "clue for w1", "", "", "clue for w4"]);
    }

    #[test]
    fn short_response_fails_the_whole_batch() {
        let generator = RemoteGenerator::new(ScriptedBackend::new(vec![], vec![0]), &config(3));
        let hints = generator.generate(&entries(4));
        assert_eq!(hints, vec!["", "", "", "clue for w3"]);
    }

    #[test]
    fn zero_batch_size_is_treated_as_one() {
        let generator = RemoteGenerator::new(ScriptedBackend::new(vec![], vec![]), &config(0));
        assert_eq!(generator.generate(&entries(2)).len(), 2);
        assert!(generator.generate(&[]).is_empty());
    }

    #[cfg(feature = "remote")]
    #[test]
    fn openai_backend_builds_without_network() {
        assert!(OpenAiBackend::new(&RemoteConfig::default(), "sk-test").is_ok());
    }
}
