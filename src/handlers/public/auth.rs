use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{generate_jwt, verify_password, Claims};
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub school: String,
    pub email: String,
    pub password: String,
}

/// POST /auth/login - exchange school slug + staff credentials for a JWT.
///
/// Goes through the same resolver and caches as tenant-scoped requests, so
/// a login for an unseen school warms its pool and registry.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let school = state.schools.resolve_slug(&body.school).await?;
    let pool = state.db.pool(&school.database).await?;
    let models = state.registry.models_for(&school.database, &pool).await;

    let staff = models
        .staff
        .find_by_email(&body.email)
        .await?
        .filter(|s| s.is_active && verify_password(s, &body.password))
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let claims = Claims::new(&staff, &school.slug);
    let token = generate_jwt(&claims).map_err(|e| {
        tracing::error!("Failed to issue token: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "staff": staff,
        "school": { "name": school.name, "slug": school.slug }
    })))
}
