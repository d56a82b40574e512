//! Dashboard: greeting plus recent analyses, datasets, visualizations and reports

use crate::cli::{AlertExt, App};
use crate::components::tables::{
    format_analysis_table, format_dataset_table, format_report_table, format_visualization_table,
};
use crate::components::heading;
use anyhow::Result;
use doctorstats_core::ClientError;
use serde_json::json;

const RECENT: usize = 5;

const NO_ANALYSES: &str =
    "No recent analyses found. Start by uploading a dataset in the Analysis section.";
const NO_VISUALIZATIONS: &str = "Your saved visualizations will appear here. Create new visualizations with 'doctorstats visualize'.";
const NO_REPORTS: &str =
    "Your generated reports will appear here. Create new reports with 'doctorstats reports create'.";

pub async fn run(app: &App) -> Result<()> {
    app.enter(doctorstats_core::Route::Dashboard).await?;
    let services = &app.services;

    let user = match app.session().user() {
        Some(user) => user,
        None => services.users.me().await.alert("Failed to load your profile")?,
    };

    // Sections load independently; one failing endpoint does not hide the others
    let (datasets, analyses, visualizations, reports) = tokio::join!(
        services.datasets.list(),
        services.analysis.list(),
        services.visualizations.list(),
        services.reports.list(),
    );

    if app.output.json {
        let section = |r: Result<serde_json::Value, ClientError>, fallback: &str| match r {
            Ok(v) => v,
            Err(e) => json!({ "error": e.alert_message(fallback) }),
        };
        let value = json!({
            "user": user,
            "datasets": section(datasets.map(|d| json!(d)), "Failed to load datasets"),
            "analyses": section(analyses.map(|a| json!(a)), "Failed to load analyses"),
            "visualizations": section(visualizations.map(|v| json!(v)), "Failed to load visualizations"),
            "reports": section(reports.map(|r| json!(r)), "Failed to load reports"),
        });
        app.print_json(&value)?;
        return Ok(());
    }

    let no_color = app.output.no_color;
    println!("{}", heading(&format!("Welcome, {}!", user.name)));
    println!("Plan: {}", user.subscription_tier);

    println!("\n{}", heading("Recent Analyses"));
    match analyses {
        Ok(list) if list.is_empty() => println!("{}", NO_ANALYSES),
        Ok(mut list) => {
            list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            list.truncate(RECENT);
            println!("{}", format_analysis_table(&list, false, no_color));
        }
        Err(e) => println!("Error: {}", e.alert_message("Failed to load analyses")),
    }

    println!("\n{}", heading("Datasets"));
    match datasets {
        Ok(mut list) => {
            list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            list.truncate(RECENT);
            println!("{}", format_dataset_table(&list, false, no_color));
        }
        Err(e) => println!("Error: {}", e.alert_message("Failed to load datasets")),
    }

    println!("\n{}", heading("Saved Visualizations"));
    match visualizations {
        Ok(list) if list.is_empty() => println!("{}", NO_VISUALIZATIONS),
        Ok(mut list) => {
            list.truncate(RECENT);
            println!("{}", format_visualization_table(&list, false, no_color));
        }
        Err(e) => println!("Error: {}", e.alert_message("Failed to load visualizations")),
    }

    println!("\n{}", heading("Recent Reports"));
    match reports {
        Ok(list) if list.is_empty() => println!("{}", NO_REPORTS),
        Ok(mut list) => {
            list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            list.truncate(RECENT);
            println!("{}", format_report_table(&list, false, no_color));
        }
        Err(e) => println!("Error: {}", e.alert_message("Failed to load reports")),
    }

    Ok(())
}
