use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};

use crate::assets::{LogoStore, LogoUpload};
use crate::errors::{DatabaseError, Result};
use crate::settings::{
    CompanySettings, CompanySettingsPatch, CompanySettingsUpdate, EmailSettings,
    PublicCompanySettings, SettingsRepositoryTrait, TaxSettings, Theme,
};

/// Operations on the single company settings record.
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    /// Public read. Seeds the default record on first access and redacts the
    /// email credentials.
    async fn get_company_settings(&self) -> Result<PublicCompanySettings>;

    /// Partial update of the company profile. Only keys present in the
    /// payload are applied; fails with not-found when no record exists.
    async fn update_company_settings(&self, update: CompanySettingsUpdate) -> Result<()>;

    /// Stores a new logo image and returns its public reference path.
    async fn upload_logo(&self, upload: LogoUpload) -> Result<String>;

    /// Removes the current logo from disk and clears the reference.
    async fn delete_logo(&self) -> Result<()>;

    /// Replaces the theme sub-record as a whole.
    async fn update_theme(&self, theme: Theme) -> Result<()>;

    /// Replaces the tax sub-record as a whole.
    async fn update_tax_settings(&self, tax: TaxSettings) -> Result<()>;

    /// Replaces the email sub-record as a whole.
    async fn update_email_settings(&self, email: EmailSettings) -> Result<()>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
    logo_store: LogoStore,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>, logo_store: LogoStore) -> Self {
        SettingsService {
            settings_repository,
            logo_store,
        }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    async fn get_company_settings(&self) -> Result<PublicCompanySettings> {
        if let Some(settings) = self.settings_repository.find_settings()? {
            return Ok(settings.into_public());
        }

        let default_settings = CompanySettings::default_record(Utc::now());
        self.settings_repository
            .insert_settings(&default_settings)
            .await?;
        info!("Seeded default company settings record");
        Ok(default_settings.into_public())
    }

    async fn update_company_settings(&self, update: CompanySettingsUpdate) -> Result<()> {
        let mut patch = CompanySettingsPatch::stamped(Utc::now());
        patch.company_name = update.company_name;
        patch.addresses = update.addresses;
        patch.default_language = update.default_language;

        let matched = self.settings_repository.update_settings(patch).await?;
        if matched == 0 {
            return Err(DatabaseError::NotFound("Settings not found".to_string()).into());
        }
        Ok(())
    }

    async fn upload_logo(&self, upload: LogoUpload) -> Result<String> {
        let ext = self.logo_store.validate(&upload)?;

        // Capture the previous reference before anything is written; the
        // replacement file must survive even if this cleanup later fails.
        let old_logo = self
            .settings_repository
            .find_settings()?
            .and_then(|settings| settings.logo);

        let now = Utc::now();
        let logo_url = self.logo_store.save(&upload.bytes, &ext, now)?;

        let mut patch = CompanySettingsPatch::stamped(now);
        patch.logo = Some(Some(logo_url.clone()));
        let mut seed = CompanySettings::default_record(now);
        seed.logo = Some(logo_url.clone());
        self.settings_repository.upsert_settings(patch, seed).await?;

        if let Some(old) = old_logo {
            if let Err(err) = self.logo_store.remove(&old) {
                warn!("Could not delete old logo {}: {}", old, err);
            }
        }

        Ok(logo_url)
    }

    async fn delete_logo(&self) -> Result<()> {
        let logo = self
            .settings_repository
            .find_settings()?
            .and_then(|settings| settings.logo)
            .ok_or_else(|| DatabaseError::NotFound("No logo found".to_string()))?;

        self.logo_store.remove(&logo)?;

        let mut patch = CompanySettingsPatch::stamped(Utc::now());
        patch.logo = Some(None);
        self.settings_repository.update_settings(patch).await?;
        Ok(())
    }

    async fn update_theme(&self, theme: Theme) -> Result<()> {
        let mut patch = CompanySettingsPatch::stamped(Utc::now());
        patch.theme = Some(theme);
        self.settings_repository.update_settings(patch).await?;
        Ok(())
    }

    async fn update_tax_settings(&self, tax: TaxSettings) -> Result<()> {
        let mut patch = CompanySettingsPatch::stamped(Utc::now());
        patch.tax = Some(tax);
        self.settings_repository.update_settings(patch).await?;
        Ok(())
    }

    async fn update_email_settings(&self, email: EmailSettings) -> Result<()> {
        let mut patch = CompanySettingsPatch::stamped(Utc::now());
        patch.email = Some(email);
        self.settings_repository.update_settings(patch).await?;
        Ok(())
    }
}
