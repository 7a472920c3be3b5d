//! Database models for the company settings record.
//!
//! The embedded sub-records (addresses, theme, tax, email) are stored as JSON
//! text columns; (de)serialization happens at this boundary and nowhere else.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use orgbase_core::errors::{DatabaseError, Error, Result};
use orgbase_core::settings::{CompanySettings, CompanySettingsPatch};

use crate::errors::StorageError;

/// Database row for the single company settings record.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::company_settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CompanySettingsDB {
    pub id: String,
    pub company_name: String,
    pub addresses: String,
    pub default_language: Option<String>,
    pub theme: String,
    pub tax: String,
    pub email: String,
    pub logo: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Field-presence changeset for the settings row.
///
/// `None` fields are skipped by the update; `logo` is doubly optional so a
/// patch can set the column to NULL.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::company_settings)]
pub struct CompanySettingsChangesetDB {
    pub company_name: Option<String>,
    pub addresses: Option<String>,
    pub default_language: Option<String>,
    pub theme: Option<String>,
    pub tax: Option<String>,
    pub email: Option<String>,
    pub logo: Option<Option<String>>,
    pub updated_at: NaiveDateTime,
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| StorageError::SerializationError(e.to_string()).into())
}

fn from_json<T: DeserializeOwned>(column: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| {
        Error::Database(DatabaseError::Internal(format!(
            "corrupt {} column: {}",
            column, e
        )))
    })
}

impl CompanySettingsDB {
    pub fn try_from_domain(settings: &CompanySettings) -> Result<Self> {
        Ok(Self {
            id: settings.id.clone(),
            company_name: settings.company_name.clone(),
            addresses: to_json(&settings.addresses)?,
            default_language: settings.default_language.clone(),
            theme: to_json(&settings.theme)?,
            tax: to_json(&settings.tax)?,
            email: to_json(&settings.email)?,
            logo: settings.logo.clone(),
            updated_at: settings.updated_at.naive_utc(),
        })
    }
}

impl TryFrom<CompanySettingsDB> for CompanySettings {
    type Error = Error;

    fn try_from(db: CompanySettingsDB) -> Result<Self> {
        Ok(Self {
            addresses: from_json("addresses", &db.addresses)?,
            theme: from_json("theme", &db.theme)?,
            tax: from_json("tax", &db.tax)?,
            email: from_json("email", &db.email)?,
            id: db.id,
            company_name: db.company_name,
            default_language: db.default_language,
            logo: db.logo,
            updated_at: db.updated_at.and_utc(),
        })
    }
}

impl CompanySettingsChangesetDB {
    pub fn try_from_domain(patch: CompanySettingsPatch) -> Result<Self> {
        Ok(Self {
            company_name: patch.company_name,
            addresses: patch.addresses.as_ref().map(to_json).transpose()?,
            default_language: patch.default_language,
            theme: patch.theme.as_ref().map(to_json).transpose()?,
            tax: patch.tax.as_ref().map(to_json).transpose()?,
            email: patch.email.as_ref().map(to_json).transpose()?,
            logo: patch.logo,
            updated_at: patch.updated_at.naive_utc(),
        })
    }
}
