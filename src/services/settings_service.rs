use crate::database::manager::DatabaseError;
use crate::database::models::{BulkPrintSetting, BulkPrintSettingUpdate};
use crate::database::registry::TenantModels;

/// A failed save is its own error class so callers can never confuse
/// "saved" with "fell back to defaults".
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(DatabaseError),
    #[error("Settings were not saved: {0}")]
    SaveFailed(DatabaseError),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// The school's bulk print settings; the first read materializes the
/// explicit default row.
pub async fn load_or_default(models: &TenantModels) -> Result<BulkPrintSetting, SettingsError> {
    match models
        .bulk_print_settings
        .current()
        .await
        .map_err(SettingsError::Load)?
    {
        Some(settings) => Ok(settings),
        None => models
            .bulk_print_settings
            .create_default()
            .await
            .map_err(SettingsError::SaveFailed),
    }
}

/// Validate and persist a full replacement. Any persistence failure is
/// surfaced; the caller never sees defaults masquerading as a saved state.
pub async fn save(
    models: &TenantModels,
    update: &BulkPrintSettingUpdate,
) -> Result<BulkPrintSetting, SettingsError> {
    update.validate().map_err(SettingsError::Invalid)?;

    let current = load_or_default(models).await?;
    models
        .bulk_print_settings
        .save(current.id, update)
        .await
        .map_err(SettingsError::SaveFailed)?
        .ok_or_else(|| SettingsError::SaveFailed(DatabaseError::Sqlx(sqlx::Error::RowNotFound)))
}
