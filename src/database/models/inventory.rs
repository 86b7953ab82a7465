use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::repository::{Entity, Repository};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryCategory {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub category_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub name: String,
    pub unit: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stock movement. `kind` is "purchase" (stock in) or "issue" (stock out).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryTransaction {
    pub id: Uuid,
    pub item_id: Uuid,
    pub kind: String,
    pub quantity: i32,
    pub note: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub category_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub name: String,
    pub unit: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price_cents: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NewTransaction {
    pub item_id: Uuid,
    pub kind: String,
    pub quantity: i32,
    pub note: Option<String>,
}

impl Entity for InventoryCategory {
    const TABLE: &'static str = "inventory_categories";
}

impl Entity for Supplier {
    const TABLE: &'static str = "suppliers";
}

impl Entity for Item {
    const TABLE: &'static str = "items";
}

impl Entity for InventoryTransaction {
    const TABLE: &'static str = "inventory_transactions";
}

impl Repository<InventoryCategory> {
    pub async fn create(&self, new: &NewCategory) -> Result<InventoryCategory, DatabaseError> {
        let row = sqlx::query_as::<_, InventoryCategory>(
            "INSERT INTO inventory_categories (name) VALUES ($1) RETURNING *",
        )
        .bind(&new.name)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }
}

impl Repository<Supplier> {
    pub async fn create(&self, new: &NewSupplier) -> Result<Supplier, DatabaseError> {
        let row = sqlx::query_as::<_, Supplier>(
            "INSERT INTO suppliers (name, contact_name, phone, email)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&new.name)
        .bind(new.contact_name.as_deref())
        .bind(new.phone.as_deref())
        .bind(new.email.as_deref())
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }
}

impl Repository<Item> {
    pub async fn create(&self, new: &NewItem) -> Result<Item, DatabaseError> {
        let row = sqlx::query_as::<_, Item>(
            "INSERT INTO items (category_id, supplier_id, name, unit, quantity, unit_price_cents)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(new.category_id)
        .bind(new.supplier_id)
        .bind(&new.name)
        .bind(new.unit.as_deref().unwrap_or("unit"))
        .bind(new.quantity.unwrap_or(0))
        .bind(new.unit_price_cents.unwrap_or(0))
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn in_category(&self, category_id: Uuid) -> Result<Vec<Item>, DatabaseError> {
        self.find_where("category_id", category_id).await
    }
}

impl Repository<InventoryTransaction> {
    /// Insert a stock movement and adjust the item's on-hand quantity in a
    /// single database transaction. Returns None when the item is unknown.
    pub async fn record(
        &self,
        new: &NewTransaction,
        recorded_by: Option<Uuid>,
    ) -> Result<Option<InventoryTransaction>, DatabaseError> {
        let delta = match new.kind.as_str() {
            "purchase" => new.quantity,
            "issue" => -new.quantity,
            // Handlers validate the kind; a mismatch here is a programming error
            other => {
                return Err(DatabaseError::Sqlx(sqlx::Error::Protocol(format!(
                    "unsupported transaction kind: {}",
                    other
                ))))
            }
        };

        let mut tx = self.pool().begin().await?;

        let updated = sqlx::query(
            "UPDATE items SET quantity = quantity + $1, updated_at = now() WHERE id = $2",
        )
        .bind(delta)
        .bind(new.item_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, InventoryTransaction>(
            "INSERT INTO inventory_transactions (item_id, kind, quantity, note, recorded_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(new.item_id)
        .bind(&new.kind)
        .bind(new.quantity)
        .bind(new.note.as_deref())
        .bind(recorded_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    pub async fn for_item(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<InventoryTransaction>, DatabaseError> {
        self.find_where("item_id", item_id).await
    }
}
