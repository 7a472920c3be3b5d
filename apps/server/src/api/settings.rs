use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

use orgbase_core::assets::LogoUpload;
use orgbase_core::settings::{
    CompanySettingsUpdate, EmailSettings, PublicCompanySettings, TaxSettings, Theme,
};

use crate::{
    auth::AdminUser,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct LogoUploadResponse {
    success: bool,
    message: String,
    logo: String,
}

#[derive(Serialize)]
struct LogoDeleteResponse {
    success: bool,
    message: String,
}

async fn get_company_settings(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PublicCompanySettings>> {
    let settings = state.settings_service.get_company_settings().await?;
    Ok(Json(settings))
}

async fn update_company_settings(
    AdminUser(_user): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CompanySettingsUpdate>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .settings_service
        .update_company_settings(payload)
        .await?;
    Ok(Json(MessageResponse {
        message: "Settings updated successfully".to_string(),
    }))
}

async fn upload_logo(
    AdminUser(_user): AdminUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<LogoUploadResponse>> {
    let mut upload: Option<LogoUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file content: {}", e)))?;
        upload = Some(LogoUpload {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let upload =
        upload.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".to_string()))?;
    let logo = state.settings_service.upload_logo(upload).await?;
    Ok(Json(LogoUploadResponse {
        success: true,
        message: "Logo uploaded successfully".to_string(),
        logo,
    }))
}

async fn delete_logo(
    AdminUser(_user): AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LogoDeleteResponse>> {
    state.settings_service.delete_logo().await?;
    Ok(Json(LogoDeleteResponse {
        success: true,
        message: "Logo deleted successfully".to_string(),
    }))
}

async fn update_theme(
    AdminUser(_user): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(theme): Json<Theme>,
) -> ApiResult<Json<MessageResponse>> {
    state.settings_service.update_theme(theme).await?;
    Ok(Json(MessageResponse {
        message: "Theme updated successfully".to_string(),
    }))
}

async fn update_tax_settings(
    AdminUser(_user): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(tax): Json<TaxSettings>,
) -> ApiResult<Json<MessageResponse>> {
    state.settings_service.update_tax_settings(tax).await?;
    Ok(Json(MessageResponse {
        message: "Tax settings updated successfully".to_string(),
    }))
}

async fn update_email_settings(
    AdminUser(_user): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(email): Json<EmailSettings>,
) -> ApiResult<Json<MessageResponse>> {
    state.settings_service.update_email_settings(email).await?;
    Ok(Json(MessageResponse {
        message: "Email settings updated successfully".to_string(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/settings/company",
            get(get_company_settings).put(update_company_settings),
        )
        .route(
            "/settings/logo",
            // The service measures the buffered body against its own 5 MiB
            // cap, so the framework limit is lifted here.
            post(upload_logo)
                .delete(delete_logo)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/settings/theme", put(update_theme))
        .route("/settings/tax", put(update_tax_settings))
        .route("/settings/email", put(update_email_settings))
}
