use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use crate::database::models::BulkPrintSettingUpdate;
use crate::database::registry::TenantModels;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::services::settings_service;

/// GET /api/settings/bulk-print
///
/// First read for a school materializes the explicit default row.
pub async fn get(
    Extension(models): Extension<Arc<TenantModels>>,
) -> Result<impl IntoResponse, ApiError> {
    let settings = settings_service::load_or_default(&models).await?;
    Ok(ApiResponse::success(settings))
}

/// PUT /api/settings/bulk-print
///
/// A failed write surfaces as an error response; the handler never answers
/// with unsaved defaults.
pub async fn put(
    Extension(models): Extension<Arc<TenantModels>>,
    Json(body): Json<BulkPrintSettingUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let settings = settings_service::save(&models, &body).await?;
    Ok(ApiResponse::success(settings))
}
