use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::bpm_gateway::{session::epoch_millis, types::CaseId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Materials,
    Machinery,
    Volunteers,
    Money,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityDraft {
    pub name: String,
    pub starts_on: Date,
    pub ends_on: Date,
    pub resource: ResourceKind,
    #[serde(default)]
    pub needs_collaboration: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub location: String,
    pub activities: Vec<ActivityDraft>,
}

/// A project as persisted, carrying the case id handed back by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectRecord {
    pub id: String,
    pub case_id: CaseId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub activities: Vec<ActivityDraft>,
    pub created_at_millis: u64,
}

impl ProjectRecord {
    pub fn from_draft(draft: ProjectDraft, case_id: CaseId) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            case_id,
            name: draft.name,
            description: draft.description,
            location: draft.location,
            activities: draft.activities,
            created_at_millis: epoch_millis(),
        }
    }
}
