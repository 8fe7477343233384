use std::sync::Arc;

use tracing::info;

use crate::{
    bpm_gateway::{orchestrator::CaseOrchestrator, types::CaseLaunchRequest},
    config::ProjectsConfig,
    projects::{
        error::{ProjectError, validation_error},
        store::ProjectStore,
        types::{ProjectDraft, ProjectRecord},
    },
};

/// Mirrors an accepted project into the engine, then persists it together
/// with the case id. Nothing is stored when the workflow fails.
pub struct ProjectService {
    orchestrator: Arc<CaseOrchestrator>,
    store: Arc<dyn ProjectStore>,
    process_name: String,
}

impl ProjectService {
    pub fn new(
        orchestrator: Arc<CaseOrchestrator>,
        store: Arc<dyn ProjectStore>,
        config: &ProjectsConfig,
    ) -> Self {
        Self {
            orchestrator,
            store,
            process_name: config.process_name.clone(),
        }
    }

    pub async fn create_project(
        &self,
        scope: &str,
        draft: ProjectDraft,
    ) -> Result<ProjectRecord, ProjectError> {
        validate_draft(&draft)?;

        let launch = self
            .orchestrator
            .launch(scope, &CaseLaunchRequest::for_process(&self.process_name))
            .await?;

        let record = self
            .store
            .insert(ProjectRecord::from_draft(draft, launch.case_id))
            .await?;
        info!(case_id = launch.case_id, project_id = %record.id, "project mirrored into engine case");

        Ok(record)
    }
}

pub fn validate_draft(draft: &ProjectDraft) -> Result<(), ProjectError> {
    if draft.name.trim().is_empty() {
        return Err(validation_error("project name must not be blank"));
    }
    if draft.description.trim().is_empty() {
        return Err(validation_error("project description must not be blank"));
    }
    if draft.location.trim().is_empty() {
        return Err(validation_error("project location must not be blank"));
    }
    if draft.activities.is_empty() {
        return Err(validation_error("project needs at least one activity"));
    }

    for activity in &draft.activities {
        if activity.name.trim().is_empty() {
            return Err(validation_error("activity name must not be blank"));
        }
        if activity.ends_on < activity.starts_on {
            return Err(validation_error(format!(
                "activity '{}' ends before it starts",
                activity.name
            )));
        }
    }

    Ok(())
}
