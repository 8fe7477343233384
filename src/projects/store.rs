use std::sync::RwLock;

use async_trait::async_trait;

use crate::{
    bpm_gateway::types::CaseId,
    projects::{error::ProjectError, types::ProjectRecord},
};

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert(&self, record: ProjectRecord) -> Result<ProjectRecord, ProjectError>;
    async fn find_by_case(&self, case_id: CaseId) -> Result<Option<ProjectRecord>, ProjectError>;
    async fn list(&self) -> Result<Vec<ProjectRecord>, ProjectError>;
}

#[derive(Default)]
pub struct InMemoryProjectStore {
    records: RwLock<Vec<ProjectRecord>>,
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn insert(&self, record: ProjectRecord) -> Result<ProjectRecord, ProjectError> {
        self.records
            .write()
            .expect("project store lock poisoned")
            .push(record.clone());
        Ok(record)
    }

    async fn find_by_case(&self, case_id: CaseId) -> Result<Option<ProjectRecord>, ProjectError> {
        Ok(self
            .records
            .read()
            .expect("project store lock poisoned")
            .iter()
            .find(|record| record.case_id == case_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<ProjectRecord>, ProjectError> {
        Ok(self
            .records
            .read()
            .expect("project store lock poisoned")
            .clone())
    }
}
