//! Repository traits for company settings.

use async_trait::async_trait;

use crate::errors::Result;
use crate::settings::{CompanySettings, CompanySettingsPatch};

/// Storage seam for the single company settings record.
///
/// The contract mirrors a document store keyed by a fixed identifier:
/// find-one, insert-one, and update-one with an optional upsert.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Load the settings record, if one has been created.
    fn find_settings(&self) -> Result<Option<CompanySettings>>;

    /// Insert a freshly constructed settings record.
    async fn insert_settings(&self, settings: &CompanySettings) -> Result<()>;

    /// Apply the patch to the existing record. Returns the number of records
    /// matched; zero means no record exists.
    async fn update_settings(&self, patch: CompanySettingsPatch) -> Result<usize>;

    /// Apply the patch, inserting `seed` first when no record exists.
    async fn upsert_settings(
        &self,
        patch: CompanySettingsPatch,
        seed: CompanySettings,
    ) -> Result<()>;
}
