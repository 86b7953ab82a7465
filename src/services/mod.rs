pub mod school_service;
pub mod settings_service;

pub use school_service::{SchoolService, TenantError};
pub use settings_service::SettingsError;
