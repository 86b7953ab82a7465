use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSchoolRequest {
    pub name: String,
    pub slug: String,
    pub plan: Option<String>,
    /// Optional first administrator account, seeded into the new database
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

/// POST /api/root/schools - onboard a new school tenant
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateSchoolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::validation_error("name is required", None));
    }

    let school = state
        .schools
        .create_school(body.name.trim(), &body.slug, body.plan.as_deref())
        .await?;

    // Seed the first admin login so the school is usable immediately
    if let (Some(email), Some(password)) = (&body.admin_email, &body.admin_password) {
        let pool = state.db.pool(&school.database).await?;
        let models = state.registry.models_for(&school.database, &pool).await;
        let digest = crate::auth::password_digest(email, password);
        models
            .staff
            .create("Administrator", email, &digest, "admin")
            .await?;
    }

    Ok(ApiResponse::created(school))
}

/// GET /api/root/schools
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let schools = state.schools.list_schools().await?;
    Ok(ApiResponse::success(schools))
}

/// POST /api/root/schools/:slug/suspend
pub async fn suspend(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let school = state.schools.set_active(&slug, false).await?;
    Ok(ApiResponse::success(school))
}

/// POST /api/root/schools/:slug/restore
pub async fn restore(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let school = state.schools.set_active(&slug, true).await?;
    Ok(ApiResponse::success(school))
}

/// DELETE /api/root/schools/:slug/connection - evict the school's cached
/// pool and model registry. In-flight requests finish on the old pool; the
/// next request opens a fresh one.
pub async fn evict_connection(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let school = state
        .schools
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Unknown school: {}", slug)))?;

    let evicted = state
        .schools
        .evict_connection(&state.registry, &school.database)
        .await;

    Ok(ApiResponse::success(json!({
        "school": school.slug,
        "database": school.database,
        "evicted": evicted,
    })))
}

/// GET /api/root/schools/:slug/health - ping the school's database
pub async fn health(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let school = state
        .schools
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Unknown school: {}", slug)))?;

    let cached = state.db.is_cached(&school.database).await;
    let pool = state.db.pool(&school.database).await?;
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(crate::database::DatabaseError::from)?;

    Ok(ApiResponse::success(json!({
        "school": school.slug,
        "database": school.database,
        "status": "ok",
        "is_active": school.is_active,
        "cached": cached,
    })))
}
