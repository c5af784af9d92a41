use anyhow::{Context, Result};
use std::path::PathBuf;

const DB_ENV: &str = "FLOWSPEND_DB";
const LOG_ENV: &str = "FLOWSPEND_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) log_filter: String,
}

impl Config {
    /// Resolve from the `--db` flag and the process environment.
    pub(crate) fn resolve(db_flag: Option<&str>) -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self::resolve_with(
            db_flag,
            env(DB_ENV),
            env(LOG_ENV).or_else(|| env("RUST_LOG")),
        )
    }

    pub(crate) fn resolve_with(
        db_flag: Option<&str>,
        db_env: Option<String>,
        log_env: Option<String>,
    ) -> Result<Self> {
        let db_path = match db_flag.map(str::to_string).or(db_env) {
            Some(path) => PathBuf::from(shellexpand(&path)),
            None => default_db_path()?,
        };
        Ok(Self {
            db_path,
            log_filter: log_env.unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "flowspend", "FlowSpend")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("flowspend.db"))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
