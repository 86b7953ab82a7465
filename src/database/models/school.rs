use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Control-plane record of one school tenant, stored in `campus_main.schools`.
///
/// `database` is the stored, authoritative name of the school's dedicated
/// database. It is derived from the slug once at onboarding and read back
/// verbatim on every request, so renamed or historical tenants keep working.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub database: String,
    pub is_active: bool,
    pub plan: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
