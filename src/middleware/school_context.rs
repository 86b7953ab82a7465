use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;

use crate::database::models::School;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolved school record, injected by middleware
#[derive(Clone)]
pub struct SchoolContext(pub School);

/// Raw pool for the school's database, injected by middleware.
///
/// Handlers normally go through `Arc<TenantModels>`; the raw handle exists
/// for multi-statement work that needs its own transaction.
#[derive(Clone)]
pub struct TenantDb(pub PgPool);

/// Per-request tenant orchestration: resolve the school from the routing
/// signal, obtain its cached pool and model registry, and attach all three
/// to the request.
///
/// Any failure aborts the request here - a handler never runs with a
/// partially populated school context. Unknown slugs map to 404, suspended
/// schools to 403, connection failures to 503.
pub async fn school_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let slug = extract_slug(request.headers()).ok_or_else(|| {
        ApiError::bad_request("Missing school slug (X-School-Slug header or subdomain)")
    })?;

    let school = state.schools.resolve_slug(&slug).await?;
    let pool = state.db.pool(&school.database).await?;
    let models = state.registry.models_for(&school.database, &pool).await;

    tracing::debug!(
        "School context established: {} ({})",
        school.slug,
        school.database
    );

    request.extensions_mut().insert(SchoolContext(school));
    request.extensions_mut().insert(TenantDb(pool));
    request.extensions_mut().insert(models);

    Ok(next.run(request).await)
}

/// Routing signal: explicit X-School-Slug header first, else the first Host
/// label (`aspire-intl.campus.example` -> `aspire-intl`). Bare hosts and
/// reserved labels carry no school.
fn extract_slug(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get("x-school-slug") {
        let slug = value.to_str().ok()?.trim();
        if !slug.is_empty() {
            return Some(slug.to_string());
        }
    }

    let host = headers.get(axum::http::header::HOST)?.to_str().ok()?;
    let host = host.split(':').next()?;

    // IP literals carry no school
    if host.parse::<std::net::IpAddr>().is_ok() {
        return None;
    }

    let mut labels = host.split('.');
    let first = labels.next()?.trim();
    // The school label must sit in front of a domain plus TLD
    if labels.count() < 2 {
        return None;
    }
    if first.is_empty() || first == "www" || first == "api" {
        return None;
    }

    Some(first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn explicit_header_wins_over_host() {
        let map = headers(&[
            ("x-school-slug", "aspire-intl"),
            ("host", "other.campus.example"),
        ]);
        assert_eq!(extract_slug(&map).as_deref(), Some("aspire-intl"));
    }

    #[test]
    fn subdomain_is_used_when_no_header() {
        let map = headers(&[("host", "aspire-intl.campus.example")]);
        assert_eq!(extract_slug(&map).as_deref(), Some("aspire-intl"));
    }

    #[test]
    fn host_port_is_ignored() {
        let map = headers(&[("host", "aspire-intl.campus.example:8080")]);
        assert_eq!(extract_slug(&map).as_deref(), Some("aspire-intl"));
    }

    #[test]
    fn bare_hosts_carry_no_school() {
        assert_eq!(extract_slug(&headers(&[("host", "localhost")])), None);
        assert_eq!(extract_slug(&headers(&[("host", "localhost:3000")])), None);
        assert_eq!(extract_slug(&headers(&[("host", "campus.example")])), None);
    }

    #[test]
    fn ip_hosts_carry_no_school() {
        assert_eq!(extract_slug(&headers(&[("host", "127.0.0.1")])), None);
        assert_eq!(extract_slug(&headers(&[("host", "127.0.0.1:3000")])), None);
    }

    #[test]
    fn reserved_labels_carry_no_school() {
        assert_eq!(
            extract_slug(&headers(&[("host", "www.campus.example")])),
            None
        );
        assert_eq!(
            extract_slug(&headers(&[("host", "api.campus.example")])),
            None
        );
    }

    #[test]
    fn empty_header_falls_through_to_host() {
        let map = headers(&[
            ("x-school-slug", ""),
            ("host", "hilltop.campus.example"),
        ]);
        assert_eq!(extract_slug(&map).as_deref(), Some("hilltop"));
    }
}
