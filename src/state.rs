use std::sync::Arc;

use crate::database::{DatabaseManager, ModelRegistry};
use crate::services::SchoolService;

/// Shared services for the request pipeline. Constructed once in `main` (or
/// per test case) and cloned into every handler via router state - there is
/// no process-global cache to leak between instances.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub registry: Arc<ModelRegistry>,
    pub schools: Arc<SchoolService>,
}

impl AppState {
    pub fn new(db: DatabaseManager) -> Self {
        let db = Arc::new(db);
        Self {
            registry: Arc::new(ModelRegistry::new()),
            schools: Arc::new(SchoolService::new(db.clone())),
            db,
        }
    }
}
