//! Reports page

use crate::cli::{AlertExt, App};
use crate::components::tables::{format_report_info, format_report_table};
use anyhow::Result;
use doctorstats_core::types::{DatasetId, ReportRequest, ReportSectionRequest, SectionContentType};
use doctorstats_core::Route;

pub struct NewReport {
    pub dataset_id: String,
    pub title: String,
    pub description: Option<String>,
    pub analyses: Vec<String>,
    pub visualizations: Vec<String>,
}

impl NewReport {
    /// Analyses first, then visualizations, numbered in that order
    fn into_request(self) -> ReportRequest {
        let analyses = self
            .analyses
            .into_iter()
            .map(|id| (SectionContentType::Analysis, format!("Analysis {}", id), id));
        let visualizations = self
            .visualizations
            .into_iter()
            .map(|id| (SectionContentType::Visualization, format!("Visualization {}", id), id));

        let sections = analyses
            .chain(visualizations)
            .enumerate()
            .map(|(idx, (content_type, title, content_id))| ReportSectionRequest {
                title,
                content_type,
                content_id,
                order: idx as u32 + 1,
            })
            .collect();

        ReportRequest {
            title: self.title,
            description: self.description,
            dataset_id: DatasetId::new(self.dataset_id),
            sections,
        }
    }
}

pub async fn run_create(app: &App, report: NewReport) -> Result<()> {
    app.enter(Route::Reports).await?;
    let request = report.into_request();

    let spinner = app.spinner("Generating...");
    let result = app.services.reports.create(&request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result.alert("Failed to generate report")?;

    if app.print_json(&report)? {
        return Ok(());
    }
    println!("Created report {}\n", report.id);
    println!("{}", format_report_info(&report, false));
    Ok(())
}

pub async fn run_list(app: &App) -> Result<()> {
    app.enter(Route::Reports).await?;
    let mut reports = app
        .services
        .reports
        .list()
        .await
        .alert("Failed to load reports")?;
    reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    println!(
        "{}",
        format_report_table(&reports, app.output.json, app.output.no_color)
    );
    Ok(())
}

pub async fn run_show(app: &App, id: &str) -> Result<()> {
    app.enter(Route::Reports).await?;
    let report = app
        .services
        .reports
        .get(id)
        .await
        .alert("Failed to load report")?;
    println!("{}", format_report_info(&report, app.output.json));
    Ok(())
}
