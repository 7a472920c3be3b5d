//! Tests for the settings service contract against a mock repository.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tempfile::{tempdir, TempDir};

use crate::assets::{LogoStore, LogoUpload};
use crate::errors::{DatabaseError, Error, Result};
use crate::settings::{
    Address, CompanySettings, CompanySettingsPatch, CompanySettingsUpdate,
    SettingsRepositoryTrait, SettingsService, SettingsServiceTrait,
};

// =========================================================================
// Mock repository
// =========================================================================

#[derive(Clone, Default)]
struct MockSettingsRepository {
    record: Arc<Mutex<Option<CompanySettings>>>,
    insert_count: Arc<Mutex<usize>>,
}

impl MockSettingsRepository {
    fn new() -> Self {
        Self::default()
    }

    fn with_record(record: CompanySettings) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(record))),
            insert_count: Arc::new(Mutex::new(0)),
        }
    }

    fn stored(&self) -> Option<CompanySettings> {
        self.record.lock().unwrap().clone()
    }

    fn inserts(&self) -> usize {
        *self.insert_count.lock().unwrap()
    }
}

fn apply_patch(settings: &mut CompanySettings, patch: CompanySettingsPatch) {
    if let Some(v) = patch.company_name {
        settings.company_name = v;
    }
    if let Some(v) = patch.addresses {
        settings.addresses = v;
    }
    if let Some(v) = patch.default_language {
        settings.default_language = Some(v);
    }
    if let Some(v) = patch.theme {
        settings.theme = v;
    }
    if let Some(v) = patch.tax {
        settings.tax = v;
    }
    if let Some(v) = patch.email {
        settings.email = v;
    }
    if let Some(v) = patch.logo {
        settings.logo = v;
    }
    settings.updated_at = patch.updated_at;
}

#[async_trait]
impl SettingsRepositoryTrait for MockSettingsRepository {
    fn find_settings(&self) -> Result<Option<CompanySettings>> {
        Ok(self.record.lock().unwrap().clone())
    }

    async fn insert_settings(&self, settings: &CompanySettings) -> Result<()> {
        let mut record = self.record.lock().unwrap();
        if record.is_some() {
            return Err(Error::Database(DatabaseError::UniqueViolation(
                settings.id.clone(),
            )));
        }
        *record = Some(settings.clone());
        *self.insert_count.lock().unwrap() += 1;
        Ok(())
    }

    async fn update_settings(&self, patch: CompanySettingsPatch) -> Result<usize> {
        let mut record = self.record.lock().unwrap();
        match record.as_mut() {
            Some(settings) => {
                apply_patch(settings, patch);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn upsert_settings(
        &self,
        patch: CompanySettingsPatch,
        seed: CompanySettings,
    ) -> Result<()> {
        let mut record = self.record.lock().unwrap();
        match record.as_mut() {
            Some(settings) => apply_patch(settings, patch),
            None => *record = Some(seed),
        }
        Ok(())
    }
}

fn service_with(
    repo: MockSettingsRepository,
) -> (TempDir, MockSettingsRepository, SettingsService) {
    let tmp = tempdir().unwrap();
    let store = LogoStore::new(tmp.path()).unwrap();
    let service = SettingsService::new(Arc::new(repo.clone()), store);
    (tmp, repo, service)
}

fn png_upload(len: usize) -> LogoUpload {
    LogoUpload {
        filename: "logo.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0u8; len],
    }
}

// =========================================================================
// Read path
// =========================================================================

#[tokio::test]
async fn get_seeds_default_record_exactly_once() {
    let (_tmp, repo, service) = service_with(MockSettingsRepository::new());

    let first = service.get_company_settings().await.unwrap();
    assert_eq!(first.company_name, "Gelbe-Umzüge");
    assert_eq!(first.addresses.len(), 1);
    assert_eq!(first.addresses[0].city, "Schönbühl");
    assert_eq!(repo.inserts(), 1);

    let second = service.get_company_settings().await.unwrap();
    assert_eq!(second.company_name, first.company_name);
    assert_eq!(repo.inserts(), 1);
}

#[tokio::test]
async fn get_redacts_email_credentials() {
    let mut record = CompanySettings::default_record(Utc::now());
    record.email.from_email = "kontakt@example.ch".to_string();
    record.email.from_name = "Kontakt".to_string();
    record.email.smtp_host = "mail.example.ch".to_string();
    record.email.smtp_password = "hunter2".to_string();
    let (_tmp, _repo, service) = service_with(MockSettingsRepository::with_record(record));

    let public = service.get_company_settings().await.unwrap();
    assert_eq!(public.email.from_email, "kontakt@example.ch");
    assert_eq!(public.email.from_name, "Kontakt");

    let json = serde_json::to_value(&public).unwrap();
    assert!(json["email"].get("smtpHost").is_none());
    assert!(json["email"].get("smtpPassword").is_none());
}

// =========================================================================
// Partial update
// =========================================================================

#[tokio::test]
async fn update_applies_present_keys_only() {
    let record = CompanySettings::default_record(Utc::now());
    let original_addresses = record.addresses.clone();
    let (_tmp, repo, service) = service_with(MockSettingsRepository::with_record(record));

    service
        .update_company_settings(CompanySettingsUpdate {
            company_name: Some(String::new()),
            ..Default::default()
        })
        .await
        .unwrap();

    let stored = repo.stored().unwrap();
    assert_eq!(stored.company_name, "");
    assert_eq!(stored.addresses, original_addresses);
}

#[tokio::test]
async fn update_replaces_addresses_when_present() {
    let record = CompanySettings::default_record(Utc::now());
    let (_tmp, repo, service) = service_with(MockSettingsRepository::with_record(record));

    let new_address = Address {
        kind: "filiale".to_string(),
        street: "Bahnhofstrasse 1".to_string(),
        city: "Bern".to_string(),
        zip_code: "3000".to_string(),
        country: "CH".to_string(),
        phone: "031 000 00 00".to_string(),
        email: "bern@example.ch".to_string(),
        website: "www.example.ch".to_string(),
    };
    service
        .update_company_settings(CompanySettingsUpdate {
            addresses: Some(vec![new_address.clone()]),
            ..Default::default()
        })
        .await
        .unwrap();

    let stored = repo.stored().unwrap();
    assert_eq!(stored.addresses, vec![new_address]);
    assert_eq!(stored.company_name, "Gelbe-Umzüge");
}

#[tokio::test]
async fn update_fails_not_found_without_record() {
    let (_tmp, _repo, service) = service_with(MockSettingsRepository::new());

    let err = service
        .update_company_settings(CompanySettingsUpdate {
            company_name: Some("Anyone".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Database(DatabaseError::NotFound(_))
    ));
}

// =========================================================================
// Logo upload / delete
// =========================================================================

#[tokio::test]
async fn upload_stores_file_and_reference() {
    let (_tmp, repo, service) = service_with(MockSettingsRepository::with_record(
        CompanySettings::default_record(Utc::now()),
    ));

    let logo = service.upload_logo(png_upload(64)).await.unwrap();
    assert!(logo.starts_with("/uploads/logo_"));
    assert!(logo.ends_with(".png"));
    assert_eq!(repo.stored().unwrap().logo.as_deref(), Some(logo.as_str()));
}

#[tokio::test]
async fn upload_seeds_record_when_store_is_empty() {
    let (_tmp, repo, service) = service_with(MockSettingsRepository::new());

    let logo = service.upload_logo(png_upload(64)).await.unwrap();
    let stored = repo.stored().unwrap();
    assert_eq!(stored.logo.as_deref(), Some(logo.as_str()));
    assert_eq!(stored.company_name, "Gelbe-Umzüge");
}

#[tokio::test]
async fn second_upload_replaces_previous_file() {
    let (tmp, _repo, service) = service_with(MockSettingsRepository::with_record(
        CompanySettings::default_record(Utc::now()),
    ));

    let first = service.upload_logo(png_upload(64)).await.unwrap();
    let second = service.upload_logo(png_upload(64)).await.unwrap();
    assert_ne!(first, second);

    let first_file = tmp.path().join(first.trim_start_matches("/uploads/"));
    let second_file = tmp.path().join(second.trim_start_matches("/uploads/"));
    assert!(!first_file.exists());
    assert!(second_file.exists());
}

#[tokio::test]
async fn upload_survives_missing_old_file() {
    let mut record = CompanySettings::default_record(Utc::now());
    record.logo = Some("/uploads/logo_gone.png".to_string());
    let (_tmp, repo, service) = service_with(MockSettingsRepository::with_record(record));

    let logo = service.upload_logo(png_upload(64)).await.unwrap();
    assert_eq!(repo.stored().unwrap().logo.as_deref(), Some(logo.as_str()));
}

#[tokio::test]
async fn upload_leaves_unmanaged_old_reference_alone() {
    let mut record = CompanySettings::default_record(Utc::now());
    record.logo = Some("https://cdn.example.ch/logo.png".to_string());
    let (_tmp, _repo, service) = service_with(MockSettingsRepository::with_record(record));

    service.upload_logo(png_upload(64)).await.unwrap();
}

#[tokio::test]
async fn upload_rejects_oversized_body() {
    let (_tmp, repo, service) = service_with(MockSettingsRepository::new());

    let err = service
        .upload_logo(png_upload(5 * 1024 * 1024 + 1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(repo.stored().is_none());
}

#[tokio::test]
async fn delete_logo_requires_a_stored_reference() {
    let (_tmp, _repo, service) = service_with(MockSettingsRepository::with_record(
        CompanySettings::default_record(Utc::now()),
    ));

    let err = service.delete_logo().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Database(DatabaseError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_logo_clears_reference_even_when_file_is_gone() {
    let mut record = CompanySettings::default_record(Utc::now());
    record.logo = Some("/uploads/logo_missing.png".to_string());
    let (_tmp, repo, service) = service_with(MockSettingsRepository::with_record(record));

    service.delete_logo().await.unwrap();
    assert_eq!(repo.stored().unwrap().logo, None);
}
