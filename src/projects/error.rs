use std::fmt;

use crate::bpm_gateway::error::{BpmError, BpmErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectErrorKind {
    Validation,
    Orchestration,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectError {
    pub kind: ProjectErrorKind,
    pub message: String,
    /// Present when the failure came out of the engine workflow, so callers
    /// keep the step-level tag.
    pub bpm_kind: Option<BpmErrorKind>,
}

impl ProjectError {
    pub fn new(kind: ProjectErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            bpm_kind: None,
        }
    }
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProjectError {}

impl From<BpmError> for ProjectError {
    fn from(err: BpmError) -> Self {
        Self {
            kind: ProjectErrorKind::Orchestration,
            message: err.to_string(),
            bpm_kind: Some(err.kind),
        }
    }
}

pub fn validation_error(message: impl Into<String>) -> ProjectError {
    ProjectError::new(ProjectErrorKind::Validation, message)
}

pub fn storage_error(message: impl Into<String>) -> ProjectError {
    ProjectError::new(ProjectErrorKind::Storage, message)
}
