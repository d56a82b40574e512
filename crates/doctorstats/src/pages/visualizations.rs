//! Visualizations page: generate a chart server-side and preview it as text

use super::datasets::{check_columns, column_names};
use crate::cli::{AlertExt, App, CliError};
use crate::components::charts::{bar_chart, heatmap, sparkline};
use crate::components::tables::format_visualization_table;
use anyhow::Result;
use doctorstats_core::forms::parse_chart_type;
use doctorstats_core::types::{DatasetId, Visualization, VisualizationRequest};
use doctorstats_core::Route;
use serde_json::Value;

const BAR_WIDTH: usize = 30;

pub struct ChartRequest {
    pub dataset_id: String,
    pub chart_type: String,
    pub columns: Vec<String>,
    pub name: Option<String>,
}

pub async fn run_create(app: &App, chart: ChartRequest) -> Result<()> {
    app.enter(Route::Visualizations).await?;

    if chart.dataset_id.trim().is_empty() {
        return Err(CliError::message("Please select a dataset").into());
    }
    let kind = parse_chart_type(&chart.chart_type).map_err(|e| CliError::message(e.message))?;
    let dataset_id = DatasetId::new(chart.dataset_id);

    let known = column_names(app, &dataset_id).await?;
    let wanted: Vec<&str> = chart.columns.iter().map(String::as_str).collect();
    check_columns(&known, &wanted)?;

    let request = VisualizationRequest {
        name: chart
            .name
            .unwrap_or_else(|| format!("{} of {}", kind, chart.columns.join(" vs "))),
        dataset_id,
        kind,
        columns: chart.columns,
        parameters: None,
    };

    let spinner = app.spinner("Generating...");
    let result = app.services.visualizations.create(&request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let viz = result.alert("Failed to generate chart")?;

    if app.print_json(&viz)? {
        return Ok(());
    }
    println!(
        "Created visualization {} ({})",
        viz.id,
        viz.title().unwrap_or_else(|| viz.name.clone())
    );
    println!("\n{}", preview(&viz));
    Ok(())
}

pub async fn run_list(app: &App) -> Result<()> {
    app.enter(Route::Visualizations).await?;
    let list = app
        .services
        .visualizations
        .list()
        .await
        .alert("Failed to load visualizations")?;
    println!(
        "{}",
        format_visualization_table(&list, app.output.json, app.output.no_color)
    );
    Ok(())
}

pub async fn run_delete(app: &App, id: &str) -> Result<()> {
    app.enter(Route::Visualizations).await?;
    app.services
        .visualizations
        .delete(id)
        .await
        .alert("Failed to delete visualization")?;
    if !app.output.json {
        println!("Deleted visualization {}", id);
    }
    Ok(())
}

// ============================================================================
// Figure preview
// ============================================================================

fn numbers(value: Option<&Value>) -> Vec<f64> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|v| v.as_f64().unwrap_or(f64::NAN)).collect())
        .unwrap_or_default()
}

fn labels(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Text rendering of each trace of a plotly-style figure
pub fn preview(viz: &Visualization) -> String {
    let traces = viz
        .plot_data
        .get("data")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if traces.is_empty() {
        return "(empty figure)".to_string();
    }

    let mut out = Vec::new();
    for (idx, trace) in traces.iter().enumerate() {
        let kind = trace
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or(viz.kind.as_str());
        let name = trace
            .get("name")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("trace {}", idx + 1));
        out.push(format!("[{}] {}", kind, name));
        out.push(render_trace(kind, trace));
    }
    out.join("\n")
}

fn render_trace(kind: &str, trace: &Value) -> String {
    match kind {
        "bar" => {
            let items: Vec<(String, f64)> = labels(trace.get("x"))
                .into_iter()
                .zip(numbers(trace.get("y")))
                .collect();
            bar_chart(&items, BAR_WIDTH)
        }
        "pie" => {
            let items: Vec<(String, f64)> = labels(trace.get("labels"))
                .into_iter()
                .zip(numbers(trace.get("values")))
                .collect();
            bar_chart(&items, BAR_WIDTH)
        }
        "heatmap" => {
            let x = labels(trace.get("x"));
            let y = labels(trace.get("y"));
            let z: Vec<Vec<f64>> = trace
                .get("z")
                .and_then(Value::as_array)
                .map(|rows| rows.iter().map(|row| numbers(Some(row))).collect())
                .unwrap_or_default();
            // Square correlation-style matrices only; anything else falls back to a summary
            if x.is_empty() || x != y || z.len() != x.len() {
                return format!("{}x{} matrix", z.len(), z.first().map_or(0, Vec::len));
            }
            heatmap(&x, |a, b| {
                let row = x.iter().position(|l| l == a)?;
                let col = x.iter().position(|l| l == b)?;
                z.get(row)?.get(col).copied()
            })
        }
        "box" => {
            let values = numbers(trace.get("y").or_else(|| trace.get("x")));
            let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
            if finite.is_empty() {
                return "(no data)".to_string();
            }
            let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
            let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            format!("n = {}, min = {:.3}, max = {:.3}", finite.len(), min, max)
        }
        // line, scatter and anything else with a y series
        _ => {
            let y = numbers(trace.get("y"));
            if y.is_empty() {
                "(no data)".to_string()
            } else {
                sparkline(&y)
            }
        }
    }
}
