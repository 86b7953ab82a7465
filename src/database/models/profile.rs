use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::repository::{Entity, Repository};

/// The school's own profile row inside its tenant database.
///
/// One row per database, seeded at onboarding from the control-plane record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SchoolProfile {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for SchoolProfile {
    const TABLE: &'static str = "school_profile";
}

impl Repository<SchoolProfile> {
    pub async fn create(&self, name: &str) -> Result<SchoolProfile, DatabaseError> {
        let row = sqlx::query_as::<_, SchoolProfile>(
            "INSERT INTO school_profile (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    /// The single profile row, if the school has filled one in
    pub async fn current(&self) -> Result<Option<SchoolProfile>, DatabaseError> {
        let row = sqlx::query_as::<_, SchoolProfile>(
            "SELECT * FROM school_profile ORDER BY created_at LIMIT 1",
        )
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }
}
