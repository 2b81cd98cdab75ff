// orgchart-core/src/infrastructure/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use super::connection::ConnectionConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["orgchart.yaml", "orgchart.yml"];

/// Loads the connection profile: explicit `path`, else the first candidate
/// found in `search_dir`. Environment variables override file values.
#[instrument(skip(search_dir))]
pub fn load_config(
    path: Option<&Path>,
    search_dir: &Path,
) -> Result<ConnectionConfig, InfrastructureError> {
    let config_path = match path {
        Some(p) if p.exists() => p.to_path_buf(),
        Some(p) => return Err(InfrastructureError::ConfigNotFound(p.display().to_string())),
        None => find_config(search_dir)?,
    };
    info!(path = ?config_path, "Loading connection profile");

    let content = fs::read_to_string(&config_path)?;
    let mut config = parse_config(&content)?;

    // Pattern 'Layering': ORGCHART_PG_HOST=db orgchart history --id 1
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;

    Ok(config)
}

pub fn parse_config(content: &str) -> Result<ConnectionConfig, InfrastructureError> {
    // An empty file is a valid, all-defaults profile
    if content.trim().is_empty() {
        return Ok(ConnectionConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

fn find_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "{}/{{{}}}",
        root.display(),
        CONFIG_CANDIDATES.join(",")
    )))
}

/// `lookup` abstracts the process environment so overrides are testable.
pub fn apply_env_overrides<F>(
    config: &mut ConnectionConfig,
    lookup: F,
) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("ORGCHART_DRIVER") {
        config.driver = val.parse().map_err(InfrastructureError::ConfigError)?;
        info!(driver = ?config.driver, "Overriding driver via ENV");
    }
    if let Some(val) = lookup("ORGCHART_PG_HOST") {
        info!(old = %config.postgres.host, new = %val, "Overriding postgres host via ENV");
        config.postgres.host = val;
    }
    if let Some(val) = lookup("ORGCHART_PG_PORT") {
        config.postgres.port = val.parse().map_err(|_| {
            InfrastructureError::ConfigError(format!("ORGCHART_PG_PORT is not a port: '{}'", val))
        })?;
    }
    if let Some(val) = lookup("ORGCHART_PG_DATABASE") {
        config.postgres.database = val;
    }
    if let Some(val) = lookup("ORGCHART_PG_USER") {
        config.postgres.username = val;
    }
    if let Some(val) = lookup("ORGCHART_PG_PASSWORD") {
        config.postgres.password = Some(val);
    }
    if let Some(val) = lookup("ORGCHART_DUCKDB_PATH") {
        info!(old = %config.duckdb.path, new = %val, "Overriding DuckDB path via ENV");
        config.duckdb.path = val;
    }
    Ok(())
}
