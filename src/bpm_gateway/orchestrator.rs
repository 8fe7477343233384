use std::{cmp::Ordering, sync::Arc, time::Duration};

use tokio::time::timeout;
use tracing::info;

use crate::bpm_gateway::{
    client::ProcessEngine,
    error::{BpmError, BpmErrorKind, no_ready_task, process_not_found},
    types::{CaseLaunchRequest, LaunchedCase, ProcessDefinitionRef},
};

/// Drives one case launch: resolve the definition, instantiate it, pick up
/// the first ready task, assign it to the caller, execute it. Steps run
/// strictly in order; the first failure aborts the rest with no compensation.
pub struct CaseOrchestrator {
    engine: Arc<dyn ProcessEngine>,
    deadline: Duration,
}

impl CaseOrchestrator {
    pub fn new(engine: Arc<dyn ProcessEngine>, deadline: Duration) -> Self {
        Self { engine, deadline }
    }

    pub async fn launch(
        &self,
        scope: &str,
        request: &CaseLaunchRequest,
    ) -> Result<LaunchedCase, BpmError> {
        match timeout(self.deadline, self.run(scope, request)).await {
            Ok(result) => result,
            Err(_) => Err(BpmError::new(
                BpmErrorKind::WorkflowTimeout,
                format!(
                    "case launch for process '{}' exceeded the {}ms deadline",
                    request.process_name,
                    self.deadline.as_millis()
                ),
            )),
        }
    }

    async fn run(
        &self,
        scope: &str,
        request: &CaseLaunchRequest,
    ) -> Result<LaunchedCase, BpmError> {
        let definitions = self
            .engine
            .find_enabled_definitions(scope, &request.process_name)
            .await?;
        let definition = latest_version(definitions)
            .ok_or_else(|| process_not_found(&request.process_name))?;
        info!(
            definition_id = %definition.id,
            version = %definition.version,
            "resolved process definition"
        );

        let case_id = self
            .engine
            .instantiate(scope, &definition.id, request.instantiation_contract.as_ref())
            .await?;
        info!(case_id, "case instantiated");

        let tasks = self.engine.ready_tasks(scope, case_id).await?;
        let Some(task) = tasks.into_iter().next() else {
            return Err(no_ready_task(case_id));
        };

        self.engine.assign_task_to_caller(scope, &task.id).await?;
        self.engine
            .execute_task(scope, &task.id, request.execution_contract.as_ref())
            .await?;
        info!(case_id, task_id = %task.id, "entry task executed");

        Ok(LaunchedCase {
            case_id,
            definition,
            task_id: task.id,
        })
    }
}

/// Picks the definition with the greatest version. Dot-separated segments
/// compare numerically when both sides parse, so `10.0` outranks `2.0`;
/// non-numeric segments fall back to string order.
pub fn latest_version(definitions: Vec<ProcessDefinitionRef>) -> Option<ProcessDefinitionRef> {
    definitions
        .into_iter()
        .max_by(|a, b| compare_versions(&a.version, &b.version))
}

pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (Some(l), Some(r)) => {
                let segment_order = match (l.trim().parse::<u64>(), r.trim().parse::<u64>()) {
                    (Ok(ln), Ok(rn)) => ln.cmp(&rn),
                    _ => l.cmp(r),
                };
                if segment_order != Ordering::Equal {
                    return segment_order;
                }
            }
        }
    }
}
