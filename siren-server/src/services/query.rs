//! Department listing and deletion

use siren_common::{IncidentRecord, Result};
use std::sync::Arc;

use crate::db::CaseStore;

/// Read/delete access to stored cases
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn CaseStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn CaseStore>) -> Self {
        Self { store }
    }

    /// Cases for one department, oldest time first
    pub async fn list_by_department(&self, department: &str) -> Result<Vec<IncidentRecord>> {
        self.store.find_by_department(department).await
    }

    /// Delete a case; unknown ids succeed
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.store.delete_by_id(id).await
    }
}
