use std::{env, fs, sync::Arc, time::Duration};

use anyhow::Context;
use caseflow::{
    bpm_gateway::{
        client::{HttpProcessEngine, ProcessEngine},
        orchestrator::CaseOrchestrator,
        session::{InMemorySessionStore, SessionStore, new_session_scope},
    },
    cli::args_from_env,
    config::Config,
    logging,
    projects::{
        service::ProjectService,
        store::{InMemoryProjectStore, ProjectStore},
        types::ProjectDraft,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = args_from_env()?;
    let config = Config::load(&args.config_path)
        .with_context(|| format!("failed to load config from {}", args.config_path.display()))?;
    logging::init_tracing(&config.logging)?;

    let password = env::var(&config.bpm.password_env).with_context(|| {
        format!(
            "engine password environment variable {} is not set",
            config.bpm.password_env
        )
    })?;

    let draft_content = fs::read_to_string(&args.project_path)
        .with_context(|| format!("failed to read {}", args.project_path.display()))?;
    let draft: ProjectDraft = serde_json::from_str(&draft_content)
        .with_context(|| format!("failed to parse {}", args.project_path.display()))?;

    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::default());
    let engine = Arc::new(HttpProcessEngine::new(&config.bpm, sessions)?);
    let orchestrator = Arc::new(CaseOrchestrator::new(
        engine.clone(),
        Duration::from_millis(config.bpm.workflow_deadline_ms),
    ));
    let store: Arc<dyn ProjectStore> = Arc::new(InMemoryProjectStore::default());
    let service = ProjectService::new(orchestrator, store, &config.projects);

    let scope = new_session_scope();
    engine
        .login(&scope, &config.bpm.username, &password)
        .await?;

    let outcome = service.create_project(&scope, draft).await;
    engine.logout(&scope).await?;

    let record = outcome?;
    println!("case {} created for project {}", record.case_id, record.id);

    Ok(())
}
