//! The save workflow: duplicate check, note suggestion, append or update.

use crate::config::Config;
use crate::error::{CliError, Result};
use chrono::{SecondsFormat, Utc};
use rolodex_domain::{DuplicateMatch, LlmProvider, ProfileEntry, ProfileRecord, ProfileStore};
use rolodex_llm::{generate_note, GeminiProvider, LlmError};
use rolodex_sheets::{SheetsClient, SheetsError};
use tracing::{info, warn};

/// How a save ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new row was added
    Appended,
    /// An existing row was overwritten
    Updated {
        /// The row that was overwritten
        row_number: usize,
    },
}

/// Ties the extracted record to the spreadsheet and the AI provider.
///
/// Either side may be absent: without a store nothing is saved or checked,
/// and without a provider no note is suggested.
pub struct Controller<S, L> {
    store: Option<S>,
    llm: Option<L>,
    background: Option<String>,
}

impl Controller<SheetsClient, GeminiProvider> {
    /// Build the adapters the configuration enables.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.sheets_client()?, config.gemini()?)
            .with_background(config.background().map(str::to_string)))
    }
}

impl<S, L> Controller<S, L>
where
    S: ProfileStore<Error = SheetsError>,
    L: LlmProvider<Error = LlmError>,
{
    /// Create a new Controller
    pub fn new(store: Option<S>, llm: Option<L>) -> Self {
        Self {
            store,
            llm,
            background: None,
        }
    }

    /// Describe the user for note prompts
    pub fn with_background(mut self, background: Option<String>) -> Self {
        self.background = background;
        self
    }

    /// True when a provider is configured
    pub fn can_suggest_notes(&self) -> bool {
        self.llm.is_some()
    }

    /// Existing row for `profile_url`.
    ///
    /// Lookup failures (no token, network, API errors) count as "not saved".
    pub async fn check_duplicate(&self, profile_url: &str) -> Option<DuplicateMatch> {
        let store = self.store.as_ref()?;
        match store.find_profile(profile_url).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, profile_url, "Duplicate check failed, assuming not saved");
                None
            }
        }
    }

    /// Suggested note, or `None` when no provider is configured.
    pub async fn suggest_note(&self, record: &ProfileRecord) -> Result<Option<String>> {
        let Some(llm) = &self.llm else {
            return Ok(None);
        };
        let note = generate_note(llm, record, self.background.as_deref()).await?;
        Ok(Some(note))
    }

    /// Note from the provider; a missing provider is an error.
    pub async fn require_note(&self, record: &ProfileRecord) -> Result<String> {
        self.suggest_note(record)
            .await?
            .ok_or(CliError::Llm(LlmError::MissingApiKey))
    }

    /// Save `record`, stamped with the current time.
    pub async fn save(&self, record: ProfileRecord, update: bool) -> Result<SaveOutcome> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.save_at(record, update, timestamp).await
    }

    /// Save `record` with an explicit timestamp.
    ///
    /// A profile already in the sheet is only overwritten when `update` is
    /// set; otherwise [`CliError::AlreadySaved`] is returned and nothing is
    /// written. With `update` set and no existing row, a new row is appended.
    pub async fn save_at(
        &self,
        record: ProfileRecord,
        update: bool,
        timestamp: String,
    ) -> Result<SaveOutcome> {
        let store = self.store.as_ref().ok_or_else(|| {
            CliError::NotConfigured("Please configure settings first (client id and sheet id)".into())
        })?;

        let existing = self.check_duplicate(&record.profile_url).await;
        let entry = ProfileEntry::new(record, timestamp);

        match existing {
            Some(found) if !update => Err(CliError::AlreadySaved {
                row_number: found.row_number,
                saved_date: found.saved_date,
            }),
            Some(found) => {
                store.update(&entry, found.row_number).await?;
                info!(row_number = found.row_number, "Profile updated");
                Ok(SaveOutcome::Updated {
                    row_number: found.row_number,
                })
            }
            None => {
                store.append(&entry).await?;
                info!(profile_url = %entry.record.profile_url, "Profile saved");
                Ok(SaveOutcome::Appended)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rolodex_llm::MockProvider;
    use std::sync::{Arc, Mutex};

    /// Sheet kept in memory; row 1 is the header.
    #[derive(Clone, Default)]
    pub(crate) struct MemoryStore {
        pub rows: Arc<Mutex<Vec<ProfileEntry>>>,
        pub offline: bool,
    }

    impl ProfileStore for MemoryStore {
        type Error = SheetsError;

        async fn find_profile(&self, url: &str) -> std::result::Result<Option<DuplicateMatch>, SheetsError> {
            if self.offline {
                return Err(SheetsError::Connection("offline".into()));
            }
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .position(|e| e.record.profile_url == url)
                .map(|i| DuplicateMatch {
                    row_number: i + 2,
                    saved_date: rows[i].timestamp[..10].to_string(),
                }))
        }

        async fn append(&self, entry: &ProfileEntry) -> std::result::Result<(), SheetsError> {
            if self.offline {
                return Err(SheetsError::Connection("offline".into()));
            }
            self.rows.lock().unwrap().push(entry.clone());
            Ok(())
        }

        async fn update(&self, entry: &ProfileEntry, row_number: usize) -> std::result::Result<(), SheetsError> {
            self.rows.lock().unwrap()[row_number - 2] = entry.clone();
            Ok(())
        }
    }

    fn record(url: &str, notes: &str) -> ProfileRecord {
        let mut record = ProfileRecord::for_url(url);
        record.name = "Jane Doe".to_string();
        record.notes = notes.to_string();
        record
    }

    fn controller(store: &MemoryStore) -> Controller<MemoryStore, MockProvider> {
        Controller::new(Some(store.clone()), Some(MockProvider::new(" They know Rust. ")))
    }

    #[tokio::test]
    async fn test_save_appends_new_profile() {
        let store = MemoryStore::default();
        let outcome = controller(&store)
            .save_at(record("https://site/in/jane", ""), false, "2024-05-01T09:00:00.000Z".into())
            .await
            .unwrap();

        assert_eq!(outcome, SaveOutcome::Appended);
        let rows = store.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].timestamp, "2024-05-01T09:00:00.000Z");
    }

    #[tokio::test]
    async fn test_duplicate_requires_update_flag() {
        let store = MemoryStore::default();
        let controller = controller(&store);
        controller
            .save_at(record("https://site/in/jane", "first"), false, "2024-05-01T09:00:00.000Z".into())
            .await
            .unwrap();

        let err = controller
            .save_at(record("https://site/in/jane", "second"), false, "2024-06-01T09:00:00.000Z".into())
            .await
            .unwrap_err();
        match err {
            CliError::AlreadySaved { row_number, saved_date } => {
                assert_eq!(row_number, 2);
                assert_eq!(saved_date, "2024-05-01");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.rows.lock().unwrap()[0].record.notes, "first");

        let outcome = controller
            .save_at(record("https://site/in/jane", "second"), true, "2024-06-01T09:00:00.000Z".into())
            .await
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Updated { row_number: 2 });
        let rows = store.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.notes, "second");
    }

    #[tokio::test]
    async fn test_lookup_failure_counts_as_not_saved() {
        let store = MemoryStore {
            offline: true,
            ..MemoryStore::default()
        };
        assert!(controller(&store).check_duplicate("https://site/in/x").await.is_none());
    }

    #[tokio::test]
    async fn test_save_without_store_is_not_configured() {
        let controller: Controller<MemoryStore, MockProvider> = Controller::new(None, None);
        let err = controller
            .save(record("https://site/in/x", ""), false)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::NotConfigured(_)));
        assert!(controller.check_duplicate("https://site/in/x").await.is_none());
    }

    #[tokio::test]
    async fn test_note_suggestion() {
        let store = MemoryStore::default();
        let provider = MockProvider::new(" They know Rust. ");
        let controller = Controller::new(Some(store), Some(provider.clone()))
            .with_background(Some("Hiring Rust developers".into()));

        let note = controller.suggest_note(&record("https://site/in/x", "")).await.unwrap();

        assert_eq!(note.as_deref(), Some("They know Rust."));
        assert!(provider.prompts()[0].contains("MY BACKGROUND: Hiring Rust developers"));
    }

    #[tokio::test]
    async fn test_note_without_provider() {
        let controller: Controller<MemoryStore, MockProvider> = Controller::new(None, None);
        let record = record("https://site/in/x", "");
        assert!(!controller.can_suggest_notes());
        assert_eq!(controller.suggest_note(&record).await.unwrap(), None);

        let err = controller.require_note(&record).await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini API key not configured");
    }
}
