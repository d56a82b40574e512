//! Dataset upload, listing, detail and deletion

use crate::cli::{AlertExt, App, CliError};
use crate::components::tables::{format_dataset_info, format_dataset_table};
use anyhow::Result;
use doctorstats_core::types::DatasetId;
use doctorstats_core::{Route, UploadFile};
use std::path::Path;

pub async fn run_upload(
    app: &App,
    path: &Path,
    description: Option<&str>,
    mime: Option<String>,
) -> Result<()> {
    app.enter(Route::Analysis).await?;

    let mut file = UploadFile::from_path(path).alert("Failed to read file")?;
    if let Some(mime) = mime {
        file = file.with_mime(mime);
    }
    // Checked here too so a bad file never reaches the spinner
    file.validate_csv()
        .map_err(|e| CliError::message(e.message))?;

    let spinner = app.spinner(&format!("Uploading {}...", file.name));
    let result = app.services.datasets.upload(file, description).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let dataset = result.alert("Upload failed")?;

    if app.print_json(&dataset)? {
        return Ok(());
    }
    println!("Uploaded dataset {} ({} rows)", dataset.id, dataset.row_count);
    println!("{}", format_dataset_info(&dataset, false, app.output.no_color));
    println!(
        "\nNext: doctorstats analyze {} --type basic --column <name>",
        dataset.id
    );
    Ok(())
}

pub async fn run_list(app: &App) -> Result<()> {
    app.enter(Route::Analysis).await?;
    let datasets = app
        .services
        .datasets
        .list()
        .await
        .alert("Failed to load datasets")?;
    println!(
        "{}",
        format_dataset_table(&datasets, app.output.json, app.output.no_color)
    );
    Ok(())
}

pub async fn run_show(app: &App, id: &str) -> Result<()> {
    app.enter(Route::Analysis).await?;
    let dataset = app
        .services
        .datasets
        .get(&DatasetId::new(id))
        .await
        .alert("Failed to load dataset")?;
    println!(
        "{}",
        format_dataset_info(&dataset, app.output.json, app.output.no_color)
    );
    Ok(())
}

pub async fn run_delete(app: &App, id: &str) -> Result<()> {
    app.enter(Route::Analysis).await?;
    app.services
        .datasets
        .delete(&DatasetId::new(id))
        .await
        .alert("Failed to delete dataset")?;
    if !app.output.json {
        println!("Deleted dataset {}", id);
    }
    Ok(())
}

/// Dataset columns, for commands that let the user pick by name
pub(crate) async fn column_names(app: &App, id: &DatasetId) -> Result<Vec<String>, CliError> {
    let dataset = app
        .services
        .datasets
        .get(id)
        .await
        .alert("Failed to load dataset")?;
    Ok(dataset.column_info.keys().cloned().collect())
}

/// Reject column names the dataset does not have before submitting
pub(crate) fn check_columns(known: &[String], wanted: &[&str]) -> Result<(), CliError> {
    if known.is_empty() {
        return Ok(());
    }
    let missing: Vec<&str> = wanted
        .iter()
        .copied()
        .filter(|w| !known.iter().any(|k| k == w))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(CliError::message(format!(
        "Unknown column{} {} (available: {})",
        if missing.len() == 1 { "" } else { "s" },
        missing.join(", "),
        known.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_columns_reports_unknown() {
        let known = vec!["age".to_string(), "arm".to_string()];
        assert!(check_columns(&known, &["age"]).is_ok());
        let err = check_columns(&known, &["weight", "age"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown column weight (available: age, arm)"
        );
    }

    #[test]
    fn test_check_columns_skips_when_schema_unknown() {
        assert!(check_columns(&[], &["anything"]).is_ok());
    }
}
