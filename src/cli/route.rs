//! CLI route: single route table and run context. Dispatches to the config map API and
//! presentation.

use crate::api::ConfigMapApi;
use crate::cli::output::CommandOutput;
use crate::cli::parse::{Commands, StoreCommands};
use crate::cli::presentation::{
    format_map_json, format_map_list_json, format_map_list_text, format_map_table,
    format_reconcile_json, format_reconcile_text, format_refresh_text, format_store_list_json,
    format_store_list_text,
};
use crate::cli::command_name;
use crate::config::ConfigLoader;
use crate::document;
use crate::error::{ApiError, StorageError};
use crate::store::{OptionStore, SledOptionStore};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace, option store and the config map API.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    api: ConfigMapApi,
    store: Arc<SledOptionStore>,
    workspace_root: PathBuf,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };

        let store_path = config.store.resolve_path(&workspace_root);
        let store = Arc::new(SledOptionStore::new(&store_path)?);
        let maps = config.map_set(&workspace_root);
        debug!(
            store_path = %store_path.display(),
            maps = maps.len(),
            "Run context ready"
        );

        let api = ConfigMapApi::new(maps, store.clone());
        Ok(Self {
            api,
            store,
            workspace_root,
        })
    }

    /// Reference to the underlying config map API.
    pub fn api(&self) -> &ConfigMapApi {
        &self.api
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        let result = self.execute_inner(command);
        info!(
            command = %name,
            ok = result.as_ref().map(|o| o.success).unwrap_or(false),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        match command {
            Commands::Generate {
                template,
                values,
                output,
            } => self.handle_generate(template.as_deref(), values.as_deref(), output.as_deref()),
            Commands::List { format } => {
                let maps = self.api.list();
                let text = if format == "json" {
                    format_map_list_json(maps)?
                } else {
                    format_map_list_text(maps)
                };
                Ok(CommandOutput::ok(text))
            }
            Commands::Show { map_id, format } => {
                let map = self.api.show(map_id.as_deref())?;
                let text = match format.as_str() {
                    "json" => format_map_json(&map)?,
                    "table" => format_map_table(&map),
                    _ => {
                        let header = match map_id {
                            Some(id) => format!("optmap show {}", id),
                            None => "optmap show (merged)".to_string(),
                        };
                        document::render(&map, &header)
                    }
                };
                Ok(CommandOutput::ok(text))
            }
            Commands::Apply {
                dry_run,
                yes,
                format,
            } => self.handle_apply(*dry_run, *yes, format),
            Commands::Verify { format } => {
                let report = self.api.reconcile(false)?;
                let text = if format == "json" {
                    format_reconcile_json(&report)?
                } else {
                    format_reconcile_text(&report, "Verify")
                };
                Ok(if report.is_consistent() {
                    CommandOutput::ok(text)
                } else {
                    CommandOutput::failed(text)
                })
            }
            Commands::Refresh { map_id } => {
                let outcomes = self.api.refresh(map_id.as_deref())?;
                let text = format_refresh_text(&outcomes);
                Ok(if outcomes.iter().all(|o| o.is_ok()) {
                    CommandOutput::ok(text)
                } else {
                    CommandOutput::failed(text)
                })
            }
            Commands::Store { command } => self.handle_store_command(command),
        }
    }

    fn handle_generate(
        &self,
        template: Option<&str>,
        values: Option<&str>,
        output: Option<&Path>,
    ) -> Result<CommandOutput, ApiError> {
        let text = self.api.generate(template, values)?;
        match output {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.workspace_root.join(path)
                };
                document::write_text(&path, &text)?;
                Ok(CommandOutput::ok(format!("Wrote {}", path.display())))
            }
            None => Ok(CommandOutput::ok(text.trim_end().to_string())),
        }
    }

    fn handle_apply(&self, dry_run: bool, yes: bool, format: &str) -> Result<CommandOutput, ApiError> {
        let preview = self.api.reconcile(false)?;
        if dry_run || preview.is_consistent() {
            let text = if format == "json" {
                format_reconcile_json(&preview)?
            } else {
                format_reconcile_text(&preview, "Apply")
            };
            return Ok(CommandOutput::ok(text));
        }

        if !yes {
            use dialoguer::Confirm;
            let prompt = format!(
                "{}\nWrite {} change(s) to the option store?",
                format_reconcile_text(&preview, "Apply"),
                preview.records.len()
            );
            let confirmed = Confirm::new()
                .with_prompt(prompt)
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok(CommandOutput::ok("Apply cancelled"));
            }
        }

        let report = self.api.reconcile(true)?;
        self.store.flush()?;
        let text = if format == "json" {
            format_reconcile_json(&report)?
        } else {
            format_reconcile_text(&report, "Apply")
        };
        Ok(if report.failures().next().is_none() {
            CommandOutput::ok(text)
        } else {
            CommandOutput::failed(text)
        })
    }

    fn handle_store_command(&self, command: &StoreCommands) -> Result<CommandOutput, ApiError> {
        match command {
            StoreCommands::List { format } => {
                let mut options = Vec::new();
                for name in self.store.list_keys()? {
                    if let Some(value) = self.store.get(&name)? {
                        options.push((name, value));
                    }
                }
                let text = if format == "json" {
                    format_store_list_json(&options)?
                } else {
                    format_store_list_text(&options)
                };
                Ok(CommandOutput::ok(text))
            }
            StoreCommands::Get { name } => match self.store.get(name)? {
                Some(value) => Ok(CommandOutput::ok(
                    serde_json::to_string_pretty(&value)
                        .map_err(|e| ApiError::RenderError(e.to_string()))?,
                )),
                None => Ok(CommandOutput::failed(format!("Option '{}' is not set", name))),
            },
            StoreCommands::Set { name, value } => {
                let parsed: Value =
                    serde_json::from_str(value).map_err(|e| StorageError::InvalidValue {
                        key: name.clone(),
                        reason: e.to_string(),
                    })?;
                self.store.set(name, &parsed)?;
                self.store.flush()?;
                Ok(CommandOutput::ok(format!("Set {}", name)))
            }
        }
    }
}
