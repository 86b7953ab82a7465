use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::repository::{Entity, Repository};

pub const PAGE_SIZES: &[&str] = &["A4", "A5", "Letter"];

/// Bulk ID-card/report printing layout for one school. Single row per
/// database; materialized with defaults on first read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BulkPrintSetting {
    pub id: Uuid,
    pub page_size: String,
    pub margin_mm: i32,
    pub copies: i32,
    pub include_header: bool,
    pub include_footer: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full-replace payload, validated at the boundary before any write
#[derive(Debug, Clone, Deserialize)]
pub struct BulkPrintSettingUpdate {
    pub page_size: String,
    pub margin_mm: i32,
    pub copies: i32,
    pub include_header: bool,
    pub include_footer: bool,
}

impl BulkPrintSettingUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if !PAGE_SIZES.contains(&self.page_size.as_str()) {
            return Err(format!(
                "page_size must be one of {}",
                PAGE_SIZES.join(", ")
            ));
        }
        if !(0..=50).contains(&self.margin_mm) {
            return Err("margin_mm must be between 0 and 50".to_string());
        }
        if !(1..=50).contains(&self.copies) {
            return Err("copies must be between 1 and 50".to_string());
        }
        Ok(())
    }
}

impl Entity for BulkPrintSetting {
    const TABLE: &'static str = "bulk_print_settings";
}

impl Repository<BulkPrintSetting> {
    pub async fn current(&self) -> Result<Option<BulkPrintSetting>, DatabaseError> {
        let row = sqlx::query_as::<_, BulkPrintSetting>(
            "SELECT * FROM bulk_print_settings ORDER BY created_at LIMIT 1",
        )
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    /// Insert the explicit default row
    pub async fn create_default(&self) -> Result<BulkPrintSetting, DatabaseError> {
        let row = sqlx::query_as::<_, BulkPrintSetting>(
            "INSERT INTO bulk_print_settings (page_size, margin_mm, copies, include_header, include_footer)
             VALUES ('A4', 10, 1, true, false)
             RETURNING *",
        )
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn save(
        &self,
        id: Uuid,
        update: &BulkPrintSettingUpdate,
    ) -> Result<Option<BulkPrintSetting>, DatabaseError> {
        let row = sqlx::query_as::<_, BulkPrintSetting>(
            "UPDATE bulk_print_settings
             SET page_size = $2,
                 margin_mm = $3,
                 copies = $4,
                 include_header = $5,
                 include_footer = $6,
                 updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&update.page_size)
        .bind(update.margin_mm)
        .bind(update.copies)
        .bind(update.include_header)
        .bind(update.include_footer)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_update() -> BulkPrintSettingUpdate {
        BulkPrintSettingUpdate {
            page_size: "A4".to_string(),
            margin_mm: 10,
            copies: 2,
            include_header: true,
            include_footer: false,
        }
    }

    #[test]
    fn accepts_valid_settings() {
        assert!(valid_update().validate().is_ok());
    }

    #[test]
    fn rejects_unknown_page_size() {
        let mut update = valid_update();
        update.page_size = "Tabloid".to_string();
        assert!(update.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_copies() {
        let mut update = valid_update();
        update.copies = 0;
        assert!(update.validate().is_err());
        update.copies = 51;
        assert!(update.validate().is_err());
    }

    #[test]
    fn rejects_negative_margin() {
        let mut update = valid_update();
        update.margin_mm = -1;
        assert!(update.validate().is_err());
    }
}
