// orgchart/src/commands/mod.rs

pub mod history;
pub mod sql;

use std::path::Path;

use miette::IntoDiagnostic;
use orgchart_core::infrastructure::config::{ConnectionConfig, load_config};

/// Explicit `--config`, else discovery in the working directory.
pub(crate) fn load_profile(config: Option<&Path>) -> miette::Result<ConnectionConfig> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    Ok(load_config(config, &cwd)?)
}
