use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::auth::password_digest;
use crate::database::models::{NewStaff, StaffUpdate};
use crate::database::registry::TenantModels;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

/// GET /api/staff
pub async fn list(
    Extension(models): Extension<Arc<TenantModels>>,
) -> Result<impl IntoResponse, ApiError> {
    let staff = models.staff.find_all().await?;
    Ok(ApiResponse::success(staff))
}

/// GET /api/staff/:id
pub async fn get(
    Extension(models): Extension<Arc<TenantModels>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let staff = models
        .staff
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Staff member not found"))?;
    Ok(ApiResponse::success(staff))
}

/// POST /api/staff
pub async fn create(
    Extension(models): Extension<Arc<TenantModels>>,
    Json(body): Json<NewStaff>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::validation_error(
            "name, email and password are required",
            None,
        ));
    }

    if models.staff.find_by_email(&body.email).await?.is_some() {
        return Err(ApiError::conflict(
            "A staff member with this email already exists",
        ));
    }

    let digest = password_digest(&body.email, &body.password);
    let staff = models
        .staff
        .create(
            body.name.trim(),
            body.email.trim(),
            &digest,
            body.role.as_deref().unwrap_or("teacher"),
        )
        .await?;

    Ok(ApiResponse::created(staff))
}

/// PUT /api/staff/:id
pub async fn update(
    Extension(models): Extension<Arc<TenantModels>>,
    Path(id): Path<Uuid>,
    Json(body): Json<StaffUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let staff = models
        .staff
        .update(id, &body)
        .await?
        .ok_or_else(|| ApiError::not_found("Staff member not found"))?;
    Ok(ApiResponse::success(staff))
}

/// DELETE /api/staff/:id
pub async fn delete(
    Extension(models): Extension<Arc<TenantModels>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !models.staff.delete_by_id(id).await? {
        return Err(ApiError::not_found("Staff member not found"));
    }
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
