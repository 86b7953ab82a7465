use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// A persisted school-database entity: one row type bound to one table.
///
/// Adding an entity type means implementing this trait for the row struct and
/// adding one binding line in `TenantModels::bind` - nothing else.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + Serialize {
    const TABLE: &'static str;
}

/// A table accessor bound to exactly one school's pool.
///
/// Handles are built by the model registry and are only valid against the
/// connection they were bound to; route handlers never construct these
/// directly.
pub struct Repository<T> {
    pool: PgPool,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: Entity> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: std::marker::PhantomData,
        }
    }

    /// The pool this repository is bound to
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} ORDER BY created_at", T::TABLE);
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", T::TABLE);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Fetch rows matching a single-column equality predicate.
    ///
    /// The column name is a static string supplied by the caller, never
    /// client input. Bind values are owned (Uuid, String, ...).
    pub async fn find_where<V>(
        &self,
        column: &'static str,
        value: V,
    ) -> Result<Vec<T>, DatabaseError>
    where
        V: for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send,
    {
        let sql = format!("SELECT * FROM {} WHERE {} = $1", T::TABLE, column);
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_one_where<V>(
        &self,
        column: &'static str,
        value: V,
    ) -> Result<Option<T>, DatabaseError>
    where
        V: for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send,
    {
        let sql = format!("SELECT * FROM {} WHERE {} = $1", T::TABLE, column);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
        let count: (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(count.0)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
