//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction workflow and
//! the remote services. Implementations live in other crates.

#![allow(async_fn_in_trait)]

use crate::{DuplicateMatch, ProfileEntry};

/// Trait for generative-text providers
///
/// Implemented by the infrastructure layer (rolodex-llm)
pub trait LlmProvider {
    /// Error type for generation
    type Error;

    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for the spreadsheet that stores saved profiles
///
/// Implemented by the infrastructure layer (rolodex-sheets)
pub trait ProfileStore {
    /// Error type for store operations
    type Error;

    /// Find an existing row for `profile_url`
    async fn find_profile(&self, profile_url: &str) -> Result<Option<DuplicateMatch>, Self::Error>;

    /// Append a new row
    async fn append(&self, entry: &ProfileEntry) -> Result<(), Self::Error>;

    /// Overwrite the row at `row_number` (1-based)
    async fn update(&self, entry: &ProfileEntry, row_number: usize) -> Result<(), Self::Error>;
}
