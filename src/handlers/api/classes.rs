use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::database::models::{NewClass, NewSection, NewSubject};
use crate::database::registry::TenantModels;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

/// GET /api/classes
pub async fn list(
    Extension(models): Extension<Arc<TenantModels>>,
) -> Result<impl IntoResponse, ApiError> {
    let classes = models.classes.find_all().await?;
    Ok(ApiResponse::success(classes))
}

/// POST /api/classes
pub async fn create(
    Extension(models): Extension<Arc<TenantModels>>,
    Json(body): Json<NewClass>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::validation_error("name is required", None));
    }
    let class = models.classes.create(&body).await?;
    Ok(ApiResponse::created(class))
}

/// GET /api/classes/:id/sections
pub async fn list_sections(
    Extension(models): Extension<Arc<TenantModels>>,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_class(&models, class_id).await?;
    let sections = models.sections.for_class(class_id).await?;
    Ok(ApiResponse::success(sections))
}

/// POST /api/classes/:id/sections
pub async fn create_section(
    Extension(models): Extension<Arc<TenantModels>>,
    Path(class_id): Path<Uuid>,
    Json(body): Json<NewSection>,
) -> Result<impl IntoResponse, ApiError> {
    require_class(&models, class_id).await?;
    if body.name.trim().is_empty() {
        return Err(ApiError::validation_error("name is required", None));
    }
    let section = models.sections.create(class_id, &body).await?;
    Ok(ApiResponse::created(section))
}

/// GET /api/classes/:id/subjects
pub async fn list_subjects(
    Extension(models): Extension<Arc<TenantModels>>,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_class(&models, class_id).await?;
    let subjects = models.subjects.for_class(class_id).await?;
    Ok(ApiResponse::success(subjects))
}

/// POST /api/classes/:id/subjects
pub async fn create_subject(
    Extension(models): Extension<Arc<TenantModels>>,
    Path(class_id): Path<Uuid>,
    Json(body): Json<NewSubject>,
) -> Result<impl IntoResponse, ApiError> {
    require_class(&models, class_id).await?;
    if body.name.trim().is_empty() {
        return Err(ApiError::validation_error("name is required", None));
    }
    let subject = models.subjects.create(class_id, &body).await?;
    Ok(ApiResponse::created(subject))
}

async fn require_class(models: &TenantModels, class_id: Uuid) -> Result<(), ApiError> {
    models
        .classes
        .find_by_id(class_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::not_found("Class not found"))
}
