use std::{env, path::PathBuf};

use anyhow::{Result, anyhow};

pub struct CliArgs {
    pub config_path: PathBuf,
    pub project_path: PathBuf,
}

pub fn args_from_env() -> Result<CliArgs> {
    let mut args = env::args().skip(1);
    let first = args.next();
    let second = args.next();

    if args.next().is_some() {
        return Err(anyhow!(
            "expected at most two arguments: <project-json> [config-path]. Example: cargo run -- ./project.json ./caseflow.jsonc"
        ));
    }

    let Some(project_path) = first else {
        return Err(anyhow!(
            "missing required argument: <project-json>. Example: cargo run -- ./project.json"
        ));
    };

    let config_path = match second {
        Some(path) => PathBuf::from(path),
        None => {
            let mut path = env::current_dir()?;
            path.push("caseflow.jsonc");
            path
        }
    };

    Ok(CliArgs {
        config_path,
        project_path: PathBuf::from(project_path),
    })
}
