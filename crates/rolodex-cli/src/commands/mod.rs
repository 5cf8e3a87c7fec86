//! Command implementations.

pub mod auth;
pub mod extract;
pub mod note;
pub mod review;
pub mod save;
pub mod serve;
pub mod settings;

pub use self::auth::execute_auth;
pub use self::extract::execute_extract;
pub use self::note::execute_note;
pub use self::review::execute_review;
pub use self::save::execute_save;
pub use self::serve::execute_serve;
pub use self::settings::execute_settings;

use crate::config::Config;
use crate::error::Result;
use crate::page::{load_page, PageSource};
use rolodex_domain::ProfileRecord;
use rolodex_extractor::Extractor;

/// Load a saved page and extract its record.
pub(crate) async fn extract_page(source: &PageSource, config: &Config) -> Result<ProfileRecord> {
    let page = load_page(source, &config.extractor.patterns)?;
    let extractor = Extractor::new(config.extractor.clone())?;
    Ok(extractor.extract_profile(&page).await)
}
