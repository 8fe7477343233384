use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bpm_gateway::types::CaseId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BpmErrorKind {
    AuthenticationFailed,
    IncompleteSession,
    MalformedCookie,
    NoActiveSession,
    ProcessNotFound,
    Instantiation,
    NoReadyTask,
    TaskAssignment,
    TaskExecution,
    WorkflowTimeout,
    Transport,
    Protocol,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BpmError {
    pub kind: BpmErrorKind,
    pub message: String,
    pub http_status: Option<u16>,
}

impl BpmError {
    pub fn new(kind: BpmErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }
}

impl fmt::Display for BpmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "{} (http_status={})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for BpmError {}

pub fn authentication_failed(message: impl Into<String>) -> BpmError {
    BpmError::new(BpmErrorKind::AuthenticationFailed, message)
}

pub fn incomplete_session(message: impl Into<String>) -> BpmError {
    BpmError::new(BpmErrorKind::IncompleteSession, message)
}

pub fn no_active_session() -> BpmError {
    BpmError::new(
        BpmErrorKind::NoActiveSession,
        "no active engine session for this scope; log in first",
    )
}

pub fn process_not_found(process_name: &str) -> BpmError {
    BpmError::new(
        BpmErrorKind::ProcessNotFound,
        format!("no enabled process definition named '{process_name}'"),
    )
}

pub fn no_ready_task(case_id: CaseId) -> BpmError {
    BpmError::new(
        BpmErrorKind::NoReadyTask,
        format!("case {case_id} has no task in ready state"),
    )
}

pub fn transport_error(message: impl Into<String>) -> BpmError {
    BpmError::new(BpmErrorKind::Transport, message)
}

pub fn protocol_violation(message: impl Into<String>) -> BpmError {
    BpmError::new(BpmErrorKind::Protocol, message)
}

pub fn internal_error(message: impl Into<String>) -> BpmError {
    BpmError::new(BpmErrorKind::Internal, message)
}
