//! Rolodex LLM Provider Layer
//!
//! Generates the networking note attached to a saved profile.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Generative Language API
//!
//! # Examples
//!
//! ```
//! use rolodex_domain::{LlmProvider, ProfileRecord};
//! use rolodex_llm::{generate_note, MockProvider};
//!
//! # async fn example() -> Result<(), rolodex_llm::LlmError> {
//! let provider = MockProvider::new("  They could help with hiring.  ");
//! let record = ProfileRecord::for_url("https://site/in/jane");
//!
//! let note = generate_note(&provider, &record, None).await?;
//! assert_eq!(note, "They could help with hiring.");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;
pub mod prompt;

use rolodex_domain::traits::LlmProvider as LlmProviderTrait;
use rolodex_domain::ProfileRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::debug;

pub use gemini::GeminiProvider;
pub use prompt::NotePrompt;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key was supplied
    #[error("Gemini API key not configured")]
    MissingApiKey,

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// The API answered with an error; carries its message
    #[error("{0}")]
    Api(String),

    /// The API answered but the body could not be read
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The API answered without any text
    #[error("No summary generated")]
    EmptyResponse,

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Ask `provider` for a short note on why `record` is worth knowing.
///
/// `background` describes the user; the prompt says "Not provided" when it
/// is absent. The answer is trimmed.
pub async fn generate_note<P>(
    provider: &P,
    record: &ProfileRecord,
    background: Option<&str>,
) -> Result<String, P::Error>
where
    P: LlmProviderTrait,
{
    let prompt = NotePrompt::new(record).with_background(background).build();
    debug!(prompt_chars = prompt.len(), "Requesting networking note");
    let note = provider.generate(&prompt).await?;
    Ok(note.trim().to_string())
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls, and
/// records every prompt it receives.
///
/// # Examples
///
/// ```
/// use rolodex_domain::LlmProvider;
/// use rolodex_llm::MockProvider;
///
/// # async fn example() {
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.generate("prompt1").await.unwrap(), "response1");
/// assert_eq!(provider.generate("other").await.unwrap(), "Default mock response");
/// assert_eq!(provider.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    fail_all: bool,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            fail_all: false,
        }
    }

    /// A provider whose every call fails
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), response.into());
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Every prompt received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());

        if self.fail_all {
            return Err(LlmError::Other("Mock error".to_string()));
        }
        let response = lock(&self.responses)
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone());
        Ok(response)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
