//! List and detail tables for datasets, analyses, reports and visualizations
//!
//! Each formatter takes `json` and `no_color`: JSON output is the raw model
//! pretty-printed, human output is a comfy-table.

use super::{colored, format_number, format_timestamp, new_table, truncate};
use comfy_table::{Color, Row};
use doctorstats_core::types::{
    AnalysisRecord, AnalysisStatus, Dataset, Report, Subscription, UserProfile, Visualization,
};
use serde::Serialize;

fn to_json<T: Serialize + ?Sized>(value: &T, empty: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| empty.to_string())
}

pub fn status_color(status: AnalysisStatus) -> Color {
    match status {
        AnalysisStatus::Pending => Color::Yellow,
        AnalysisStatus::Processing => Color::Blue,
        AnalysisStatus::Completed => Color::Green,
        AnalysisStatus::Failed => Color::Red,
    }
}

// ============================================================================
// Datasets
// ============================================================================

pub fn format_dataset_table(datasets: &[Dataset], json: bool, no_color: bool) -> String {
    if json {
        return to_json(datasets, "[]");
    }
    if datasets.is_empty() {
        return "No datasets yet. Upload one with `doctorstats datasets upload <file.csv>`."
            .to_string();
    }

    let mut table = new_table(&["ID", "Name", "Rows", "Columns", "Uploaded"], no_color);
    for dataset in datasets {
        let id = dataset.id.to_string();
        let name = truncate(&dataset.name, 30);
        let rows = format_number(dataset.row_count);
        let columns = dataset.column_info.len().to_string();
        let uploaded = format_timestamp(dataset.created_at);
        table.add_row(Row::from(vec![&id, &name, &rows, &columns, &uploaded]));
    }
    table.to_string()
}

/// Dataset header plus its column table
pub fn format_dataset_info(dataset: &Dataset, json: bool, no_color: bool) -> String {
    if json {
        return to_json(dataset, "{}");
    }

    let mut lines = vec![];
    lines.push(format!("Dataset ID:   {}", dataset.id));
    lines.push(format!("Name:         {}", dataset.name));
    lines.push(format!(
        "Description:  {}",
        dataset.description.as_deref().unwrap_or("-")
    ));
    lines.push(format!("Rows:         {}", dataset.row_count));
    lines.push(format!("Uploaded:     {}", format_timestamp(dataset.created_at)));

    let columns = dataset.columns();
    if columns.is_empty() {
        lines.push("Columns:      -".to_string());
        return lines.join("\n");
    }

    let mut table = new_table(&["Column", "Type", "Dtype"], no_color);
    for column in &columns {
        let dtype = dataset
            .column_info
            .get(&column.name)
            .map(String::as_str)
            .unwrap_or("-");
        table.add_row(Row::from(vec![
            column.name.as_str(),
            column.kind.as_str(),
            dtype,
        ]));
    }
    lines.push(String::new());
    lines.push(table.to_string());
    lines.join("\n")
}

// ============================================================================
// Analyses
// ============================================================================

pub fn format_analysis_table(records: &[AnalysisRecord], json: bool, no_color: bool) -> String {
    if json {
        return to_json(records, "[]");
    }
    if records.is_empty() {
        return "No analyses yet.".to_string();
    }

    let mut table = new_table(&["ID", "Type", "Dataset", "Status", "Created"], no_color);
    for record in records {
        let dataset = record
            .dataset_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            comfy_table::Cell::new(truncate(&record.id, 12)),
            comfy_table::Cell::new(record.kind.label()),
            comfy_table::Cell::new(dataset),
            colored(record.status, status_color(record.status), no_color),
            comfy_table::Cell::new(format_timestamp(record.created_at)),
        ]);
    }
    table.to_string()
}

pub fn format_analysis_info(record: &AnalysisRecord) -> String {
    let mut lines = vec![];
    lines.push(format!("Analysis ID:  {}", record.id));
    if let Some(name) = &record.name {
        lines.push(format!("Name:         {}", name));
    }
    lines.push(format!("Type:         {}", record.kind.label()));
    lines.push(format!(
        "Dataset:      {}",
        record
            .dataset_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    lines.push(format!("Status:       {}", record.status));
    lines.push(format!("Created:      {}", format_timestamp(record.created_at)));
    lines.push(format!("Updated:      {}", format_timestamp(record.updated_at)));
    if let Some(error) = record.failure() {
        lines.push(format!("Error:        {}", error));
    }
    lines.join("\n")
}

// ============================================================================
// Reports
// ============================================================================

pub fn format_report_table(reports: &[Report], json: bool, no_color: bool) -> String {
    if json {
        return to_json(reports, "[]");
    }
    if reports.is_empty() {
        return "No reports yet.".to_string();
    }

    let mut table = new_table(&["ID", "Title", "Dataset", "Sections", "Created"], no_color);
    for report in reports {
        let title = truncate(&report.title, 40);
        let dataset = report.dataset_id.to_string();
        let sections = report.sections.len().to_string();
        let created = format_timestamp(report.created_at);
        table.add_row(Row::from(vec![
            report.id.as_str(),
            &title,
            &dataset,
            &sections,
            &created,
        ]));
    }
    table.to_string()
}

/// Report header followed by its sections in `order`
pub fn format_report_info(report: &Report, json: bool) -> String {
    if json {
        return to_json(report, "{}");
    }

    let mut lines = vec![];
    lines.push(report.title.clone());
    lines.push("=".repeat(report.title.chars().count()));
    if let Some(description) = &report.description {
        lines.push(description.clone());
    }
    lines.push(format!("Dataset: {}", report.dataset_id));
    lines.push(format!("Created: {}", format_timestamp(report.created_at)));

    for (idx, section) in report.ordered_sections().into_iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. {}", idx + 1, section.title));
        let body = match &section.content {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "(empty)".to_string(),
            other => to_json(other, "-"),
        };
        lines.extend(body.lines().map(|l| format!("   {}", l)));
    }
    lines.join("\n")
}

// ============================================================================
// Visualizations
// ============================================================================

pub fn format_visualization_table(
    visualizations: &[Visualization],
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return to_json(visualizations, "[]");
    }
    if visualizations.is_empty() {
        return "No visualizations yet.".to_string();
    }

    let mut table = new_table(&["ID", "Name", "Type", "Traces", "Title"], no_color);
    for viz in visualizations {
        let name = truncate(&viz.name, 30);
        let traces = viz.trace_count().to_string();
        let title = viz.title().unwrap_or_else(|| "-".to_string());
        table.add_row(Row::from(vec![
            viz.id.as_str(),
            &name,
            viz.kind.as_str(),
            &traces,
            &title,
        ]));
    }
    table.to_string()
}

// ============================================================================
// Profile
// ============================================================================

pub fn format_profile(user: &UserProfile, json: bool) -> String {
    if json {
        return to_json(user, "{}");
    }
    let lines = [
        format!("Name:          {}", user.name),
        format!("Email:         {}", user.email),
        format!(
            "Organization:  {}",
            user.organization.as_deref().unwrap_or("-")
        ),
        format!("Plan:          {}", user.subscription_tier),
    ];
    lines.join("\n")
}

pub fn format_subscription(subscription: &Subscription, json: bool, no_color: bool) -> String {
    if json {
        return to_json(subscription, "{}");
    }

    let mut out = format!("Plan: {}", subscription.tier);
    if subscription.features.is_empty() {
        return out;
    }

    let mut table = new_table(&["Feature", "Value"], no_color);
    for (feature, value) in &subscription.features {
        let cell = match value {
            serde_json::Value::Bool(true) => colored("yes", Color::Green, no_color),
            serde_json::Value::Bool(false) => colored("no", Color::DarkGrey, no_color),
            serde_json::Value::Null => colored("unlimited", Color::Green, no_color),
            serde_json::Value::String(s) => comfy_table::Cell::new(s),
            other => comfy_table::Cell::new(other),
        };
        table.add_row(vec![comfy_table::Cell::new(feature.replace('_', " ")), cell]);
    }
    out.push_str("\n\n");
    out.push_str(&table.to_string());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctorstats_core::types::{AnalysisType, DatasetId};
    use std::collections::BTreeMap;

    fn dataset() -> Dataset {
        let mut column_info = BTreeMap::new();
        column_info.insert("age".to_string(), "int64".to_string());
        column_info.insert("arm".to_string(), "object".to_string());
        Dataset {
            id: DatasetId::new("42"),
            name: "trial".to_string(),
            description: None,
            row_count: 1_200,
            column_info,
            created_at: None,
        }
    }

    fn record(status: AnalysisStatus) -> AnalysisRecord {
        serde_json::from_value(serde_json::json!({
            "id": "an-1",
            "type": "regression",
            "status": status.as_str(),
            "dataset_id": 42,
            "error": "Dependent variable 'weight' has no numeric values"
        }))
        .unwrap()
    }

    #[test]
    fn test_dataset_table_empty_hint() {
        let output = format_dataset_table(&[], false, true);
        assert!(output.contains("No datasets yet"));
    }

    #[test]
    fn test_dataset_table_rows() {
        let output = format_dataset_table(&[dataset()], false, true);
        assert!(output.contains("trial"));
        assert!(output.contains("1.20K"));
    }

    #[test]
    fn test_dataset_table_json() {
        let output = format_dataset_table(&[dataset()], true, true);
        assert!(output.starts_with('['));
        assert!(output.contains("\"trial\""));
    }

    #[test]
    fn test_dataset_info_lists_column_kinds() {
        let output = format_dataset_info(&dataset(), false, true);
        assert!(output.contains("numeric"));
        assert!(output.contains("text"));
        assert!(output.contains("object"));
    }

    #[test]
    fn test_analysis_info_shows_failure_only_when_failed() {
        let failed = format_analysis_info(&record(AnalysisStatus::Failed));
        assert!(failed.contains("has no numeric values"));
        assert!(failed.contains(AnalysisType::Regression.label()));

        let pending = format_analysis_info(&record(AnalysisStatus::Pending));
        assert!(!pending.contains("Error:"));
    }

    #[test]
    fn test_analysis_table_status_column() {
        let output = format_analysis_table(&[record(AnalysisStatus::Completed)], false, true);
        assert!(output.contains("completed"));
        assert!(output.contains("Linear Regression"));
    }

    #[test]
    fn test_subscription_features() {
        let mut features = BTreeMap::new();
        features.insert("max_datasets".to_string(), serde_json::json!(3));
        features.insert("export".to_string(), serde_json::json!(false));
        let output = format_subscription(
            &Subscription {
                tier: "free".to_string(),
                features,
            },
            false,
            true,
        );
        assert!(output.starts_with("Plan: free"));
        assert!(output.contains("max datasets"));
        assert!(output.contains("no"));
    }
}
