use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::bpm_gateway::types::BpmConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bpm: BpmConfig,
    #[serde(default)]
    pub projects: ProjectsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Config = json5::from_str(&content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsConfig {
    #[serde(default = "default_process_name")]
    pub process_name: String,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            process_name: default_process_name(),
        }
    }
}

fn default_process_name() -> String {
    "CrearProyecto".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_logging_filter(),
            json: false,
        }
    }
}

fn default_logging_filter() -> String {
    "info".to_string()
}
