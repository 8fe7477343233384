use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicI64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::Value;
use time::macros::date;

use caseflow::{
    bpm_gateway::{
        client::ProcessEngine,
        error::{BpmError, BpmErrorKind, internal_error},
        orchestrator::CaseOrchestrator,
        session::AuthSession,
        types::{CaseId, HumanTask, ProcessDefinitionRef, TaskState},
    },
    config::ProjectsConfig,
    projects::{
        error::ProjectErrorKind,
        service::{ProjectService, validate_draft},
        store::{InMemoryProjectStore, ProjectStore},
        types::{ActivityDraft, ProjectDraft, ResourceKind},
    },
};

struct ScriptedEngine {
    definitions: Vec<ProcessDefinitionRef>,
    tasks_per_case: bool,
    next_case_id: AtomicI64,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    fn new(definitions: Vec<ProcessDefinitionRef>, first_case_id: CaseId) -> Self {
        Self {
            definitions,
            tasks_per_case: true,
            next_case_id: AtomicI64::new(first_case_id),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock poisoned").push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

#[async_trait]
impl ProcessEngine for ScriptedEngine {
    async fn login(
        &self,
        _scope: &str,
        _username: &str,
        _password: &str,
    ) -> Result<AuthSession, BpmError> {
        Err(internal_error("login is not scripted"))
    }

    async fn logout(&self, _scope: &str) -> Result<(), BpmError> {
        Ok(())
    }

    async fn find_enabled_definitions(
        &self,
        _scope: &str,
        process_name: &str,
    ) -> Result<Vec<ProcessDefinitionRef>, BpmError> {
        self.record(format!("find:{process_name}"));
        Ok(self.definitions.clone())
    }

    async fn instantiate(
        &self,
        _scope: &str,
        definition_id: &str,
        _contract: Option<&Value>,
    ) -> Result<CaseId, BpmError> {
        self.record(format!("instantiate:{definition_id}"));
        Ok(self.next_case_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn ready_tasks(&self, _scope: &str, case_id: CaseId) -> Result<Vec<HumanTask>, BpmError> {
        self.record(format!("tasks:{case_id}"));
        if !self.tasks_per_case {
            return Ok(vec![]);
        }
        Ok(vec![HumanTask {
            id: format!("task-{case_id}"),
            case_id: case_id.to_string(),
            state: TaskState::Ready,
        }])
    }

    async fn assign_task_to_caller(&self, _scope: &str, task_id: &str) -> Result<(), BpmError> {
        self.record(format!("assign:{task_id}"));
        Ok(())
    }

    async fn execute_task(
        &self,
        _scope: &str,
        task_id: &str,
        _contract: Option<&Value>,
    ) -> Result<(), BpmError> {
        self.record(format!("execute:{task_id}"));
        Ok(())
    }
}

fn definition(id: &str, version: &str) -> ProcessDefinitionRef {
    ProcessDefinitionRef {
        id: id.to_string(),
        name: "CrearProyecto".to_string(),
        version: version.to_string(),
    }
}

fn draft() -> ProjectDraft {
    ProjectDraft {
        name: "Puente peatonal".to_string(),
        description: "Reconstruction of the pedestrian bridge".to_string(),
        location: "La Plata".to_string(),
        activities: vec![ActivityDraft {
            name: "Site survey".to_string(),
            starts_on: date!(2026 - 03 - 01),
            ends_on: date!(2026 - 03 - 15),
            resource: ResourceKind::Volunteers,
            needs_collaboration: false,
        }],
    }
}

fn service_over(
    engine: Arc<ScriptedEngine>,
    store: Arc<InMemoryProjectStore>,
) -> ProjectService {
    let orchestrator = Arc::new(CaseOrchestrator::new(engine, Duration::from_secs(5)));
    ProjectService::new(orchestrator, store, &ProjectsConfig::default())
}

#[tokio::test]
async fn given_a_valid_draft_when_created_then_the_project_is_persisted_with_the_case_id() {
    let engine = Arc::new(ScriptedEngine::new(vec![definition("7", "1.0")], 100));
    let store = Arc::new(InMemoryProjectStore::default());
    let service = service_over(engine.clone(), store.clone());

    let record = service
        .create_project("scope", draft())
        .await
        .expect("creation must succeed");

    assert_eq!(record.case_id, 100);
    assert_eq!(record.name, "Puente peatonal");
    let persisted = store
        .find_by_case(100)
        .await
        .expect("lookup works")
        .expect("record persisted");
    assert_eq!(persisted.id, record.id);
    assert_eq!(
        engine.calls(),
        vec![
            "find:CrearProyecto".to_string(),
            "instantiate:7".to_string(),
            "tasks:100".to_string(),
            "assign:task-100".to_string(),
            "execute:task-100".to_string(),
        ]
    );
}

#[tokio::test]
async fn given_a_blank_name_when_created_then_validation_fails_before_any_engine_call() {
    let engine = Arc::new(ScriptedEngine::new(vec![definition("7", "1.0")], 100));
    let store = Arc::new(InMemoryProjectStore::default());
    let service = service_over(engine.clone(), store.clone());
    let mut invalid = draft();
    invalid.name = "   ".to_string();

    let err = service
        .create_project("scope", invalid)
        .await
        .expect_err("creation must fail");

    assert_eq!(err.kind, ProjectErrorKind::Validation);
    assert!(engine.calls().is_empty());
    assert!(store.list().await.expect("list works").is_empty());
}

#[tokio::test]
async fn given_no_activities_when_created_then_validation_fails() {
    let mut invalid = draft();
    invalid.activities.clear();

    let err = validate_draft(&invalid).expect_err("validation must fail");

    assert_eq!(err.kind, ProjectErrorKind::Validation);
}

#[tokio::test]
async fn given_an_activity_ending_before_it_starts_when_created_then_validation_fails() {
    let mut invalid = draft();
    invalid.activities[0].starts_on = date!(2026 - 03 - 15);
    invalid.activities[0].ends_on = date!(2026 - 03 - 01);

    let err = validate_draft(&invalid).expect_err("validation must fail");

    assert_eq!(err.kind, ProjectErrorKind::Validation);
}

#[tokio::test]
async fn given_an_unknown_process_when_created_then_nothing_is_persisted_and_the_tag_survives() {
    let engine = Arc::new(ScriptedEngine::new(vec![], 100));
    let store = Arc::new(InMemoryProjectStore::default());
    let service = service_over(engine, store.clone());

    let err = service
        .create_project("scope", draft())
        .await
        .expect_err("creation must fail");

    assert_eq!(err.kind, ProjectErrorKind::Orchestration);
    assert_eq!(err.bpm_kind, Some(BpmErrorKind::ProcessNotFound));
    assert!(store.list().await.expect("list works").is_empty());
}

#[tokio::test]
async fn given_a_case_without_ready_tasks_when_created_then_nothing_is_persisted() {
    let mut engine = ScriptedEngine::new(vec![definition("7", "1.0")], 42);
    engine.tasks_per_case = false;
    let engine = Arc::new(engine);
    let store = Arc::new(InMemoryProjectStore::default());
    let service = service_over(engine, store.clone());

    let err = service
        .create_project("scope", draft())
        .await
        .expect_err("creation must fail");

    assert_eq!(err.kind, ProjectErrorKind::Orchestration);
    assert_eq!(err.bpm_kind, Some(BpmErrorKind::NoReadyTask));
    assert!(store.list().await.expect("list works").is_empty());
}

#[tokio::test]
async fn given_the_same_draft_twice_when_created_then_two_distinct_cases_exist() {
    let engine = Arc::new(ScriptedEngine::new(vec![definition("7", "1.0")], 100));
    let store = Arc::new(InMemoryProjectStore::default());
    let service = service_over(engine, store.clone());

    let first = service
        .create_project("scope", draft())
        .await
        .expect("first creation succeeds");
    let second = service
        .create_project("scope", draft())
        .await
        .expect("second creation succeeds");

    assert_ne!(first.case_id, second.case_id);
    assert_eq!(store.list().await.expect("list works").len(), 2);
}
