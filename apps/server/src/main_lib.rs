use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use orgbase_core::assets::LogoStore;
use orgbase_core::settings::{SettingsService, SettingsServiceTrait};
use orgbase_storage_sqlite::db::{self, write_actor};
use orgbase_storage_sqlite::settings::SettingsRepository;

use crate::{auth::AuthManager, config::Config};

pub struct AppState {
    pub settings_service: Arc<dyn SettingsServiceTrait + Send + Sync>,
    pub auth: Option<Arc<AuthManager>>,
}

pub fn init_tracing() {
    let log_format = std::env::var("OB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let pool = db::create_pool(&config.db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let settings_repo = Arc::new(SettingsRepository::new(pool.clone(), writer.clone()));
    let logo_store = LogoStore::new(&config.uploads_dir)?;
    let settings_service: Arc<dyn SettingsServiceTrait + Send + Sync> =
        Arc::new(SettingsService::new(settings_repo, logo_store));

    let auth = config
        .auth
        .as_ref()
        .map(AuthManager::new)
        .transpose()?
        .map(Arc::new);

    Ok(Arc::new(AppState {
        settings_service,
        auth,
    }))
}
