use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse};
use serde_json::json;

use crate::database::registry::TenantModels;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, SchoolContext};

/// GET /api/school - the resolved control-plane record plus the school's
/// own profile row
pub async fn get(
    Extension(SchoolContext(school)): Extension<SchoolContext>,
    Extension(models): Extension<Arc<TenantModels>>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = models.school_profile.current().await?;

    Ok(ApiResponse::success(json!({
        "school": {
            "id": school.id,
            "name": school.name,
            "slug": school.slug,
            "plan": school.plan,
        },
        "profile": profile,
    })))
}
