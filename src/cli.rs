//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the config map API.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{map_error, CommandOutput};
pub use parse::{Cli, Commands, StoreCommands};
pub use presentation::{
    format_map_json, format_map_list_json, format_map_list_text, format_map_table,
    format_reconcile_json, format_reconcile_text, format_refresh_text, format_store_list_json,
    format_store_list_text,
};
pub use route::RunContext;
