use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::school_context::SchoolContext;
use crate::auth::{validate_jwt, Claims};
use crate::config;
use crate::error::ApiError;

/// Authenticated staff context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthStaff {
    pub staff_id: Uuid,
    pub school: String,
    pub role: String,
}

impl From<Claims> for AuthStaff {
    fn from(claims: Claims) -> Self {
        Self {
            staff_id: claims.sub,
            school: claims.school,
            role: claims.role,
        }
    }
}

/// JWT authentication for tenant-scoped routes. Runs after the school
/// context middleware; a token issued for one school is refused on another
/// school's requests.
pub async fn jwt_auth_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers()).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token).map_err(ApiError::unauthorized)?;

    if let Some(SchoolContext(school)) = request.extensions().get::<SchoolContext>() {
        if school.slug != claims.school {
            tracing::warn!(
                "Refused token for school '{}' on request for '{}'",
                claims.school,
                school.slug
            );
            return Err(ApiError::forbidden("Token was issued for a different school"));
        }
    }

    request.extensions_mut().insert(AuthStaff::from(claims));
    Ok(next.run(request).await)
}

/// Gate for /api/root/* administrative routes: a static operator token
/// configured out-of-band, compared verbatim.
pub async fn require_root_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let configured = &config::config().security.root_token;
    if configured.is_empty() {
        return Err(ApiError::service_unavailable("Root access is not configured"));
    }

    let token = extract_bearer(request.headers()).map_err(ApiError::unauthorized)?;
    if &token != configured {
        return Err(ApiError::forbidden("Root token required"));
    }

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header
fn extract_bearer(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_bearer(&headers).unwrap(), "abc123");
    }

    #[test]
    fn rejects_missing_and_malformed_headers() {
        let headers = HeaderMap::new();
        assert!(extract_bearer(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc123"));
        assert!(extract_bearer(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_bearer(&headers).is_err());
    }
}
