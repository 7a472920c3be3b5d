use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use orgbase_core::errors::Result;
use orgbase_core::settings::{
    CompanySettings, CompanySettingsPatch, SettingsRepositoryTrait, COMPANY_SETTINGS_ID,
};

use super::model::{CompanySettingsChangesetDB, CompanySettingsDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::company_settings::dsl::*;

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn find_settings(&self) -> Result<Option<CompanySettings>> {
        let mut conn = get_connection(&self.pool)?;
        let row = company_settings
            .find(COMPANY_SETTINGS_ID)
            .first::<CompanySettingsDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(CompanySettings::try_from).transpose()
    }

    async fn insert_settings(&self, settings: &CompanySettings) -> Result<()> {
        let row = CompanySettingsDB::try_from_domain(settings)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(company_settings)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn update_settings(&self, patch: CompanySettingsPatch) -> Result<usize> {
        let changes = CompanySettingsChangesetDB::try_from_domain(patch)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let matched = diesel::update(company_settings.find(COMPANY_SETTINGS_ID))
                    .set(&changes)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(matched)
            })
            .await
    }

    async fn upsert_settings(
        &self,
        patch: CompanySettingsPatch,
        seed: CompanySettings,
    ) -> Result<()> {
        let changes = CompanySettingsChangesetDB::try_from_domain(patch)?;
        let seed_row = CompanySettingsDB::try_from_domain(&seed)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let matched = diesel::update(company_settings.find(COMPANY_SETTINGS_ID))
                    .set(&changes)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if matched == 0 {
                    diesel::insert_into(company_settings)
                        .values(&seed_row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(())
            })
            .await
    }
}
