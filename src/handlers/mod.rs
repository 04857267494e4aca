pub mod clients;
pub mod documents;
pub mod projects;
pub mod reports;

use crate::db::DbPool;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub clients: Arc<crate::services::clients::ClientService>,
    pub projects: Arc<crate::services::projects::ProjectService>,
    pub documents: Arc<crate::services::documents::DocumentService>,
    pub progress: Arc<crate::services::progress::ProgressService>,
    pub reports: Arc<crate::services::reports::ReportService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            clients: Arc::new(crate::services::clients::ClientService::new(db_pool.clone())),
            projects: Arc::new(crate::services::projects::ProjectService::new(
                db_pool.clone(),
            )),
            documents: Arc::new(crate::services::documents::DocumentService::new(
                db_pool.clone(),
            )),
            progress: Arc::new(crate::services::progress::ProgressService::new(
                db_pool.clone(),
            )),
            reports: Arc::new(crate::services::reports::ReportService::new(db_pool)),
        }
    }
}
