//! Config loader facade: assembles sources in precedence order and validates the result.

use super::merge::merge_policy::builder_with_defaults;
use super::sources::{global_file, workspace_file};
use super::OptmapConfig;
use crate::error::ApiError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

const ENV_PREFIX: &str = "OPTMAP";
const ENV_SEPARATOR: &str = "__";

/// Loads [`OptmapConfig`] from files and environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (highest last): defaults, global file, `optmap.toml`,
    /// `optmap.{OPTMAP_ENV}.toml`, `OPTMAP__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<OptmapConfig, ApiError> {
        let env_name = std::env::var("OPTMAP_ENV").ok();
        let global = global_file::global_config_path();
        Self::load_layered(workspace_root, global.as_deref(), env_name.as_deref(), None)
    }

    /// Load configuration from one explicit file (which must exist) plus environment.
    pub fn load_from_file(path: &Path) -> Result<OptmapConfig, ApiError> {
        let builder = builder_with_defaults()?.add_source(File::from(path).required(true));
        Self::finish(Self::with_environment(builder, None))
    }

    /// Load with every source spelled out. `env_overrides` replaces the process
    /// environment when given.
    pub fn load_layered(
        workspace_root: &Path,
        global_path: Option<&Path>,
        env_name: Option<&str>,
        env_overrides: Option<config::Map<String, String>>,
    ) -> Result<OptmapConfig, ApiError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder, global_path)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root, env_name)?;
        Self::finish(Self::with_environment(builder, env_overrides))
    }

    fn with_environment(
        builder: ConfigBuilder<DefaultState>,
        env_overrides: Option<config::Map<String, String>>,
    ) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env_overrides),
        )
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<OptmapConfig, ApiError> {
        let config: OptmapConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        debug!(maps = config.maps.len(), "Configuration loaded");
        Ok(config)
    }
}
