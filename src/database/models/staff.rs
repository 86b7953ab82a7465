use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::repository::{Entity, Repository};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Staff {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a staff member
#[derive(Debug, Deserialize)]
pub struct NewStaff {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// Partial update payload; absent fields keep their stored values
#[derive(Debug, Deserialize)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl Entity for Staff {
    const TABLE: &'static str = "staff";
}

impl Repository<Staff> {
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_digest: &str,
        role: &str,
    ) -> Result<Staff, DatabaseError> {
        let row = sqlx::query_as::<_, Staff>(
            "INSERT INTO staff (name, email, password_digest, role)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(name)
        .bind(email)
        .bind(password_digest)
        .bind(role)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: &StaffUpdate,
    ) -> Result<Option<Staff>, DatabaseError> {
        let row = sqlx::query_as::<_, Staff>(
            "UPDATE staff
             SET name = COALESCE($2, name),
                 role = COALESCE($3, role),
                 is_active = COALESCE($4, is_active),
                 updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.role.as_deref())
        .bind(update.is_active)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Staff>, DatabaseError> {
        self.find_one_where("email", email.to_string()).await
    }
}
