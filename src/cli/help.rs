//! CLI help: stable command names for logging and routing.

use crate::cli::parse::{Commands, StoreCommands};

/// Command name string for log events (e.g. "apply", "store.get").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Generate { .. } => "generate".to_string(),
        Commands::List { .. } => "list".to_string(),
        Commands::Show { .. } => "show".to_string(),
        Commands::Apply { dry_run: true, .. } => "apply.dry_run".to_string(),
        Commands::Apply { .. } => "apply".to_string(),
        Commands::Verify { .. } => "verify".to_string(),
        Commands::Refresh { .. } => "refresh".to_string(),
        Commands::Store { command } => format!("store.{}", store_command_name(command)),
    }
}

pub fn store_command_name(command: &StoreCommands) -> &'static str {
    match command {
        StoreCommands::List { .. } => "list",
        StoreCommands::Get { .. } => "get",
        StoreCommands::Set { .. } => "set",
    }
}
