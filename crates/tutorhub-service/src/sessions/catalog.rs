//! Catalog browsing for students.

use tutorhub_core::AppResult;
use tutorhub_core::types::SessionId;
use tutorhub_entity::session::{SessionFilter, SessionView};
use tutorhub_store::SessionCatalog;

/// Read-only catalog queries.
#[derive(Debug, Clone)]
pub struct CatalogService {
    catalog: SessionCatalog,
}

impl CatalogService {
    pub fn new(catalog: SessionCatalog) -> Self {
        Self { catalog }
    }

    /// Active sessions matching `filter`, newest first.
    pub async fn browse(&self, filter: &SessionFilter) -> Vec<SessionView> {
        self.catalog.browse(filter).await.collect()
    }

    pub async fn get(&self, session_id: SessionId) -> AppResult<SessionView> {
        self.catalog.get(session_id).await.map(SessionView::from)
    }
}
