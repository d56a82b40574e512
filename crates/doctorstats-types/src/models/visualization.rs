//! Visualization models (plot specifications generated server-side)

use super::dataset::DatasetId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationKind {
    Bar,
    Pie,
    Line,
    Scatter,
    Box,
    Heatmap,
}

impl VisualizationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualizationKind::Bar => "bar",
            VisualizationKind::Pie => "pie",
            VisualizationKind::Line => "line",
            VisualizationKind::Scatter => "scatter",
            VisualizationKind::Box => "box",
            VisualizationKind::Heatmap => "heatmap",
        }
    }

    /// Minimum number of columns: x/y (or values/names) for most charts, a pair for heatmaps
    pub fn min_columns(&self) -> usize {
        2
    }
}

impl fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualizationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bar" => Ok(VisualizationKind::Bar),
            "pie" => Ok(VisualizationKind::Pie),
            "line" => Ok(VisualizationKind::Line),
            "scatter" => Ok(VisualizationKind::Scatter),
            "box" => Ok(VisualizationKind::Box),
            "heatmap" => Ok(VisualizationKind::Heatmap),
            other => Err(format!("Unsupported visualization type: {}", other)),
        }
    }
}

/// Body of `POST /visualizations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationRequest {
    pub dataset_id: DatasetId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VisualizationKind,
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visualization {
    #[serde(deserialize_with = "crate::serde_helpers::string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Plot specification (figure dict with `data` traces and `layout`)
    #[serde(default)]
    pub plot_data: Value,
}

impl Visualization {
    /// Number of traces in the figure
    pub fn trace_count(&self) -> usize {
        self.plot_data
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Figure title, if the layout has one
    pub fn title(&self) -> Option<String> {
        let title = self.plot_data.get("layout")?.get("title")?;
        match title {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("text").and_then(Value::as_str).map(String::from),
            _ => None,
        }
    }
}
