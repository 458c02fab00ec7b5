//! Workspace config file source: optmap.toml and optmap.{env}.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};

pub const WORKSPACE_CONFIG_FILE: &str = "optmap.toml";

/// Workspace config files that exist, base file first.
pub fn workspace_config_paths(workspace_root: &Path, env_name: Option<&str>) -> Vec<PathBuf> {
    let mut paths = vec![workspace_root.join(WORKSPACE_CONFIG_FILE)];
    if let Some(env) = env_name {
        paths.push(workspace_root.join(format!("optmap.{}.toml", env)));
    }
    paths.into_iter().filter(|p| p.exists()).collect()
}

/// Add workspace config files to builder.
/// Precedence: optmap.toml (base) then optmap.{OPTMAP_ENV}.toml (env-specific).
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
    env_name: Option<&str>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = builder;
    for path in workspace_config_paths(workspace_root, env_name) {
        builder = builder.add_source(File::from(path.as_path()).required(false));
    }
    Ok(builder)
}
