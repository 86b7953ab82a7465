use std::sync::Arc;

use tracing::info;

use crate::database::bootstrap;
use crate::database::manager::{DatabaseError, DatabaseManager, SCHOOL_DB_PREFIX};
use crate::database::models::{School, SchoolProfile};
use crate::database::registry::ModelRegistry;
use crate::database::repository::Repository;

#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("Unknown school: {0}")]
    NotFound(String),
    #[error("School is suspended: {0}")]
    Suspended(String),
    #[error("Invalid school slug: {0}")]
    InvalidSlug(String),
    #[error("School already exists: {0}")]
    AlreadyExists(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// School lookup and onboarding against the control-plane database.
pub struct SchoolService {
    db: Arc<DatabaseManager>,
}

impl SchoolService {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Map a routing slug to its School record.
    ///
    /// Pure lookup: no side effects, no caching here. Fails closed on
    /// suspended schools before any tenant connection is touched.
    pub async fn resolve_slug(&self, slug: &str) -> Result<School, TenantError> {
        let school = self
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| TenantError::NotFound(slug.to_string()))?;

        if !school.is_active {
            return Err(TenantError::Suspended(slug.to_string()));
        }

        Ok(school)
    }

    /// Fetch a record regardless of its active flag; administrative flows
    /// need to reach suspended schools too
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<School>, TenantError> {
        let pool = self.db.master_pool().await?;
        let school = sqlx::query_as::<_, School>("SELECT * FROM schools WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(school)
    }

    /// Onboard a new school: derive its database name, provision the
    /// database and schema, seed the profile row, and register the record.
    ///
    /// The derived name is stored on the record and treated as authoritative
    /// from then on; resolution never recomputes it.
    pub async fn create_school(
        &self,
        name: &str,
        slug: &str,
        plan: Option<&str>,
    ) -> Result<School, TenantError> {
        Self::validate_slug(slug)?;
        let database = Self::database_name_for_slug(slug);

        let master = self.db.master_pool().await?;
        let existing: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM schools WHERE slug = $1 OR database = $2")
                .bind(slug)
                .bind(&database)
                .fetch_one(&master)
                .await
                .map_err(DatabaseError::from)?;
        if existing.0 > 0 {
            return Err(TenantError::AlreadyExists(slug.to_string()));
        }

        self.db.create_database(&database).await?;

        let tenant_pool = self.db.pool(&database).await?;
        bootstrap::bootstrap_tenant_schema(&tenant_pool).await?;
        Repository::<SchoolProfile>::new(tenant_pool.clone())
            .create(name)
            .await?;

        let school = sqlx::query_as::<_, School>(
            "INSERT INTO schools (name, slug, database, plan)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(name)
        .bind(slug)
        .bind(&database)
        .bind(plan.unwrap_or("standard"))
        .fetch_one(&master)
        .await
        .map_err(DatabaseError::from)?;

        info!("Onboarded school '{}' ({})", school.name, school.database);
        Ok(school)
    }

    pub async fn list_schools(&self) -> Result<Vec<School>, TenantError> {
        let pool = self.db.master_pool().await?;
        let schools =
            sqlx::query_as::<_, School>("SELECT * FROM schools ORDER BY created_at DESC")
                .fetch_all(&pool)
                .await
                .map_err(DatabaseError::from)?;
        Ok(schools)
    }

    /// Flip the active flag; used by suspend/restore administrative flows
    pub async fn set_active(&self, slug: &str, active: bool) -> Result<School, TenantError> {
        let pool = self.db.master_pool().await?;
        let school = sqlx::query_as::<_, School>(
            "UPDATE schools SET is_active = $2, updated_at = now() WHERE slug = $1 RETURNING *",
        )
        .bind(slug)
        .bind(active)
        .fetch_optional(&pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| TenantError::NotFound(slug.to_string()))?;

        info!(
            "School '{}' is now {}",
            slug,
            if active { "active" } else { "suspended" }
        );
        Ok(school)
    }

    /// Evict the school's cached pool and registry. The record stays; the
    /// next request reopens a fresh connection.
    pub async fn evict_connection(
        &self,
        registry: &ModelRegistry,
        database_name: &str,
    ) -> bool {
        let dropped_models = registry.remove(database_name).await;
        let dropped_pool = self.db.evict(database_name).await;
        dropped_pool || dropped_models
    }

    /// Deterministic database name for a new school's slug
    pub fn database_name_for_slug(slug: &str) -> String {
        format!("{}{}", SCHOOL_DB_PREFIX, slug.replace('-', "_"))
    }

    pub fn validate_slug(slug: &str) -> Result<(), TenantError> {
        let ok_len = (2..=50).contains(&slug.len());
        let ok_chars = slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        let ok_edges = !slug.starts_with('-') && !slug.ends_with('-');

        if ok_len && ok_chars && ok_edges {
            Ok(())
        } else {
            Err(TenantError::InvalidSlug(format!(
                "'{}' (expected 2-50 chars of [a-z0-9-], not starting or ending with '-')",
                slug
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_database_name_from_slug() {
        assert_eq!(
            SchoolService::database_name_for_slug("aspire-intl"),
            "school_aspire_intl"
        );
        assert_eq!(
            SchoolService::database_name_for_slug("hilltop"),
            "school_hilltop"
        );
    }

    #[test]
    fn derived_names_pass_manager_validation() {
        for slug in ["aspire-intl", "st-marys-2", "a1"] {
            let db = SchoolService::database_name_for_slug(slug);
            assert!(
                DatabaseManager::is_valid_db_name(&db),
                "derived name should be valid: {}",
                db
            );
        }
    }

    #[test]
    fn validates_slugs() {
        assert!(SchoolService::validate_slug("aspire-intl").is_ok());
        assert!(SchoolService::validate_slug("a1").is_ok());
        assert!(SchoolService::validate_slug("x").is_err());
        assert!(SchoolService::validate_slug("Aspire").is_err());
        assert!(SchoolService::validate_slug("aspire_intl").is_err());
        assert!(SchoolService::validate_slug("-aspire").is_err());
        assert!(SchoolService::validate_slug("aspire-").is_err());
    }
}
