//! Change presentation: reconcile reports and refresh outcomes.

use super::{to_pretty_json, value_cell};
use crate::api::RefreshOutcome;
use crate::error::ApiError;
use crate::reconcile::{ChangeKind, ChangeStatus, ReconcileReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

/// Text report. `title` names the command ("Apply", "Verify").
pub fn format_reconcile_text(report: &ReconcileReport, title: &str) -> String {
    if report.is_consistent() {
        return format!(
            "{}: {}",
            title,
            "option store matches the config maps".green()
        );
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Option", "Change", "Action", "Source", "Old", "New", "Status"]);
    for record in &report.records {
        let status = match &record.status {
            ChangeStatus::Pending => "pending".to_string(),
            ChangeStatus::Applied => "applied".to_string(),
            ChangeStatus::Failed(reason) => format!("failed: {}", reason),
        };
        table.add_row(vec![
            record.option.clone(),
            record.kind.as_str().to_string(),
            record.action.to_string(),
            record.source_map.clone().unwrap_or_else(|| "-".to_string()),
            record
                .old
                .as_ref()
                .map(value_cell)
                .unwrap_or_else(|| "-".to_string()),
            value_cell(&record.new),
            status,
        ]);
    }

    let creates = report
        .records
        .iter()
        .filter(|r| r.kind == ChangeKind::Create)
        .count();
    let updates = report.records.len() - creates;
    let mut out = format!("{}\n\n", table);
    if report.committed {
        let failed = report.failures().count();
        out.push_str(&format!(
            "{}: {} applied",
            title,
            report.applied_count().to_string().green()
        ));
        if failed > 0 {
            out.push_str(&format!(", {} failed", failed.to_string().red()));
        }
    } else {
        out.push_str(&format!(
            "{}: {} pending ({} create, {} update); nothing written",
            title,
            report.records.len().to_string().yellow(),
            creates,
            updates
        ));
    }
    out
}

pub fn format_reconcile_json(report: &ReconcileReport) -> Result<String, ApiError> {
    let value = serde_json::to_value(report).map_err(|e| ApiError::RenderError(e.to_string()))?;
    to_pretty_json(&json!({
        "consistent": report.is_consistent(),
        "report": value,
    }))
}

pub fn format_refresh_text(outcomes: &[RefreshOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        match &outcome.result {
            Ok(()) => out.push_str(&format!(
                "{} {} ({} option(s)) -> {}\n",
                "refreshed".green(),
                outcome.map_id,
                outcome.options,
                outcome.path.display()
            )),
            Err(e) => out.push_str(&format!(
                "{} {}: {}\n",
                "failed".red(),
                outcome.map_id,
                e
            )),
        }
    }
    out.trim_end().to_string()
}
