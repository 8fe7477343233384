use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type CaseId = i64;
pub type TaskId = String;

pub const DEFAULT_PROCESS_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TASK_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessDefinitionRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Ready,
    Assigned,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl Default for TaskState {
    fn default() -> Self {
        Self::Unknown
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HumanTask {
    pub id: TaskId,
    #[serde(rename = "caseId", default)]
    pub case_id: String,
    #[serde(default)]
    pub state: TaskState,
}

/// Descriptor the engine publishes for the authenticated session itself,
/// used to learn the caller's engine user id right after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSessionInfo {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseLaunchRequest {
    pub process_name: String,
    #[serde(default)]
    pub instantiation_contract: Option<Value>,
    #[serde(default)]
    pub execution_contract: Option<Value>,
}

impl CaseLaunchRequest {
    pub fn for_process(process_name: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into(),
            instantiation_contract: None,
            execution_contract: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchedCase {
    pub case_id: CaseId,
    pub definition: ProcessDefinitionRef,
    pub task_id: TaskId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BpmConfig {
    pub base_url: String,
    pub username: String,
    #[serde(default = "default_password_env")]
    pub password_env: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_workflow_deadline_ms")]
    pub workflow_deadline_ms: u64,
}

fn default_password_env() -> String {
    "CASEFLOW_BPM_PASSWORD".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_workflow_deadline_ms() -> u64 {
    30_000
}
