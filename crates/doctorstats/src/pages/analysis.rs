//! Analysis page: submit a job, follow it to completion, render its results

use super::datasets::{check_columns, column_names};
use crate::cli::{AlertExt, App, CliError};
use crate::components::results::render_results;
use crate::components::tables::{format_analysis_info, format_analysis_table};
use anyhow::Result;
use doctorstats_core::forms::AnalysisForm;
use doctorstats_core::types::{AnalysisRecord, AnalysisStatus, AnalysisType, DatasetId};
use doctorstats_core::{PollOutcome, Route};

const SUBMIT_FAILED_MESSAGE: &str = "Failed to process your request. Please try again.";

/// Column selections as given on the command line
#[derive(Debug, Default)]
pub struct Selection {
    pub columns: Vec<String>,
    pub target: Option<String>,
    pub group: Option<String>,
    pub variable1: Option<String>,
    pub variable2: Option<String>,
    pub dependent: Option<String>,
    pub independent: Option<String>,
}

impl Selection {
    fn into_form(self, analysis_type: AnalysisType) -> AnalysisForm {
        let mut form = AnalysisForm::new(analysis_type);
        form.columns = self.columns;
        form.target_column = self.target;
        form.group_column = self.group;
        form.variable1 = self.variable1;
        form.variable2 = self.variable2;
        form.dependent = self.dependent;
        form.independent = self.independent;
        form
    }
}

/// Every column name the form refers to for its analysis type
fn referenced_columns(form: &AnalysisForm) -> Vec<&str> {
    let fields = match form.analysis_type {
        AnalysisType::Basic | AnalysisType::Correlation => {
            return form.columns.iter().map(String::as_str).collect()
        }
        AnalysisType::Comparative => [&form.target_column, &form.group_column],
        AnalysisType::ChiSquare => [&form.variable1, &form.variable2],
        AnalysisType::Regression => [&form.dependent, &form.independent],
    };
    fields.into_iter().filter_map(|f| f.as_deref()).collect()
}

pub async fn run_analyze(
    app: &App,
    dataset_id: &str,
    analysis_type: &str,
    selection: Selection,
    wait: bool,
) -> Result<()> {
    app.enter(Route::Analysis).await?;

    if dataset_id.trim().is_empty() {
        return Err(CliError::message("Please select a file to analyze").into());
    }
    if analysis_type.trim().is_empty() {
        return Err(CliError::message("Please select an analysis type").into());
    }
    let analysis_type: AnalysisType = analysis_type.parse().map_err(CliError::message)?;

    let dataset_id = DatasetId::new(dataset_id);
    let form = selection.into_form(analysis_type);
    let request = form
        .to_request(dataset_id.clone())
        .map_err(|e| CliError::message(e.message))?;

    let known = column_names(app, &dataset_id).await?;
    check_columns(&known, &referenced_columns(&form))?;

    let record = app
        .services
        .analysis
        .create(&request)
        .await
        .alert(SUBMIT_FAILED_MESSAGE)?;
    tracing::info!(id = %record.id, kind = %analysis_type, "analysis submitted");

    if !wait || record.is_terminal() {
        return print_record(app, &record);
    }

    follow(app, &record).await
}

/// Poll until terminal, showing the status on a spinner, then render
async fn follow(app: &App, submitted: &AnalysisRecord) -> Result<()> {
    let spinner = app.spinner(&format!(
        "{} {}: {}",
        submitted.kind.label(),
        submitted.id,
        submitted.status
    ));

    let mut handle = app.services.analysis.poll(&submitted.id);
    while let Some(record) = handle.changed().await {
        if let Some(spinner) = &spinner {
            spinner.set_message(format!(
                "{} {}: {}",
                record.kind.label(),
                record.id,
                record.status
            ));
        }
    }
    let outcome = handle.wait().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match outcome {
        PollOutcome::Completed(record) => print_record(app, &record),
        PollOutcome::Failed { record, error } => {
            if app.output.json {
                app.print_json(&record)?;
            }
            Err(CliError::message(format!("Analysis failed: {}", error)).into())
        }
        PollOutcome::Error(err) => {
            Err(CliError::from_client(&err, "Failed to fetch analysis status").into())
        }
        PollOutcome::Cancelled => Err(CliError::message("Polling was cancelled").into()),
    }
}

/// Record header, then its results when they are valid
fn print_record(app: &App, record: &AnalysisRecord) -> Result<()> {
    if app.print_json(record)? {
        return Ok(());
    }
    println!("{}", format_analysis_info(record));
    match record.completed_results() {
        Some(Ok(results)) => {
            println!("\n{}", render_results(&results, app.output.no_color));
        }
        Some(Err(err)) => {
            tracing::warn!(id = %record.id, error = %err, "unreadable results");
            println!("\nResults could not be read for this analysis type.");
        }
        None if record.status == AnalysisStatus::Completed => {
            println!("\nNo results returned. Try: doctorstats analysis results {}", record.id);
        }
        None if !record.is_terminal() => {
            println!("\nStill running. Check later: doctorstats analysis show {}", record.id);
        }
        None => {}
    }
    Ok(())
}

pub async fn run_show(app: &App, id: &str) -> Result<()> {
    app.enter(Route::Analysis).await?;
    let record = app
        .services
        .analysis
        .get(id)
        .await
        .alert("Failed to load analysis")?;
    print_record(app, &record)
}

pub async fn run_list(app: &App) -> Result<()> {
    app.enter(Route::Analysis).await?;
    let mut records = app
        .services
        .analysis
        .list()
        .await
        .alert("Failed to load analyses")?;
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    println!(
        "{}",
        format_analysis_table(&records, app.output.json, app.output.no_color)
    );
    Ok(())
}

/// Results endpoint directly; the type comes from the record unless given
pub async fn run_results(app: &App, id: &str, analysis_type: Option<&str>) -> Result<()> {
    app.enter(Route::Analysis).await?;
    let kind = match analysis_type {
        Some(raw) => raw.parse::<AnalysisType>().map_err(CliError::message)?,
        None => {
            app.services
                .analysis
                .get(id)
                .await
                .alert("Failed to load analysis")?
                .kind
        }
    };

    let results = app
        .services
        .analysis
        .results(id, kind)
        .await
        .alert("Failed to load results")?;

    if app.print_json(&results)? {
        return Ok(());
    }
    println!("{}", render_results(&results, app.output.no_color));
    Ok(())
}

pub async fn run_delete(app: &App, id: &str) -> Result<()> {
    app.enter(Route::Analysis).await?;
    app.services
        .analysis
        .delete(id)
        .await
        .alert("Failed to delete analysis")?;
    if !app.output.json {
        println!("Deleted analysis {}", id);
    }
    Ok(())
}
