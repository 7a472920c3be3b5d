//! Company settings domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed identifier of the single company settings record.
pub const COMPANY_SETTINGS_ID: &str = "company_settings";

/// A postal address plus contact channels for one company location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "type")]
    pub kind: String,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,
    pub email: String,
    pub website: String,
}

/// Theme colors applied by the web frontend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#facc15".to_string(),
            secondary_color: "#1f2937".to_string(),
            accent_color: "#2563eb".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#111827".to_string(),
        }
    }
}

/// VAT configuration used when rendering quotes and invoices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaxSettings {
    pub vat_rate: f64,
    pub vat_number: Option<String>,
    pub prices_include_vat: bool,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            vat_rate: 8.1,
            vat_number: None,
            prices_include_vat: true,
        }
    }
}

/// Outbound mail configuration.
///
/// The SMTP fields are credentials and must never appear on public reads;
/// see [`PublicEmailSettings`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettings {
    pub from_email: String,
    pub from_name: String,
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default)]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
}

/// The sender identity, stripped of credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicEmailSettings {
    pub from_email: String,
    pub from_name: String,
}

/// The single persisted company settings record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    pub id: String,
    pub company_name: String,
    pub addresses: Vec<Address>,
    pub default_language: Option<String>,
    pub theme: Theme,
    pub tax: TaxSettings,
    pub email: EmailSettings,
    pub logo: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl CompanySettings {
    /// The record seeded on first read when no settings exist yet.
    pub fn default_record(now: DateTime<Utc>) -> Self {
        Self {
            id: COMPANY_SETTINGS_ID.to_string(),
            company_name: "Gelbe-Umzüge".to_string(),
            addresses: vec![Address {
                kind: "hauptsitz".to_string(),
                street: "Sandstrasse 5".to_string(),
                city: "Schönbühl".to_string(),
                zip_code: "3322".to_string(),
                country: "CH".to_string(),
                phone: "031 557 24 31".to_string(),
                email: "info@gelbe-umzuege.ch".to_string(),
                website: "www.gelbe-umzuege.ch".to_string(),
            }],
            default_language: None,
            theme: Theme::default(),
            tax: TaxSettings::default(),
            email: EmailSettings::default(),
            logo: None,
            updated_at: now,
        }
    }

    /// Projection for unauthenticated reads: identical record, `email`
    /// reduced to the sender identity.
    pub fn into_public(self) -> PublicCompanySettings {
        PublicCompanySettings {
            id: self.id,
            company_name: self.company_name,
            addresses: self.addresses,
            default_language: self.default_language,
            theme: self.theme,
            tax: self.tax,
            email: PublicEmailSettings {
                from_email: self.email.from_email,
                from_name: self.email.from_name,
            },
            logo: self.logo,
            updated_at: self.updated_at,
        }
    }
}

/// The settings record as returned by the public read endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicCompanySettings {
    pub id: String,
    pub company_name: String,
    pub addresses: Vec<Address>,
    pub default_language: Option<String>,
    pub theme: Theme,
    pub tax: TaxSettings,
    pub email: PublicEmailSettings,
    pub logo: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for the company profile.
///
/// `None` means the key was absent from the request and the stored value is
/// left untouched; a present key applies even when its value is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettingsUpdate {
    pub company_name: Option<String>,
    pub addresses: Option<Vec<Address>>,
    pub default_language: Option<String>,
}

/// Field-presence patch applied to the stored record.
///
/// Built explicitly from whichever keys an operation provides; the storage
/// layer writes only the `Some` fields. `logo` is doubly optional so a patch
/// can distinguish "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone)]
pub struct CompanySettingsPatch {
    pub company_name: Option<String>,
    pub addresses: Option<Vec<Address>>,
    pub default_language: Option<String>,
    pub theme: Option<Theme>,
    pub tax: Option<TaxSettings>,
    pub email: Option<EmailSettings>,
    pub logo: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}

impl CompanySettingsPatch {
    /// An empty patch carrying only the mutation timestamp.
    pub fn stamped(now: DateTime<Utc>) -> Self {
        Self {
            company_name: None,
            addresses: None,
            default_language: None,
            theme: None,
            tax: None,
            email: None,
            logo: None,
            updated_at: now,
        }
    }
}
