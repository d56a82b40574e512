//! Analysis job models: requests, records and lifecycle status

use super::dataset::DatasetId;
use super::results::AnalysisResults;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The five canned analyses the backend can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    Basic,
    Correlation,
    Comparative,
    #[serde(alias = "chi-square")]
    ChiSquare,
    Regression,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 5] = [
        AnalysisType::Basic,
        AnalysisType::Correlation,
        AnalysisType::Comparative,
        AnalysisType::ChiSquare,
        AnalysisType::Regression,
    ];

    /// Wire name (`chi_square`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Basic => "basic",
            AnalysisType::Correlation => "correlation",
            AnalysisType::Comparative => "comparative",
            AnalysisType::ChiSquare => "chi_square",
            AnalysisType::Regression => "regression",
        }
    }

    /// Human-readable title
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisType::Basic => "Descriptive Statistics",
            AnalysisType::Correlation => "Correlation Analysis",
            AnalysisType::Comparative => "Comparative Analysis",
            AnalysisType::ChiSquare => "Chi-Square Test",
            AnalysisType::Regression => "Linear Regression",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" | "descriptive" => Ok(AnalysisType::Basic),
            "correlation" => Ok(AnalysisType::Correlation),
            "comparative" => Ok(AnalysisType::Comparative),
            "chi_square" | "chi-square" | "chisquare" => Ok(AnalysisType::ChiSquare),
            "regression" => Ok(AnalysisType::Regression),
            other => Err(format!(
                "Unknown analysis type '{}' (expected: basic, correlation, comparative, chi_square, regression)",
                other
            )),
        }
    }
}

/// Server-side job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Pending,
    #[serde(alias = "running")]
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    /// Completed or failed: no further status changes
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column selection plus type-specific options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    #[serde(default)]
    pub target_columns: Vec<String>,
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

impl AnalysisConfig {
    pub fn new(target_columns: Vec<String>) -> Self {
        Self {
            target_columns,
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Body of `POST /analysis`; immutable once sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub dataset_id: DatasetId,
    pub analysis_type: AnalysisType,
    pub config: AnalysisConfig,
}

/// Analysis job as tracked by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(deserialize_with = "crate::serde_helpers::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub dataset_id: Option<DatasetId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", alias = "analysis_type")]
    pub kind: AnalysisType,
    pub status: AnalysisStatus,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub results: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AnalysisRecord {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Typed results. Only a completed record has valid results; anything else yields `None`.
    pub fn completed_results(&self) -> Option<Result<AnalysisResults, serde_json::Error>> {
        if self.status != AnalysisStatus::Completed {
            return None;
        }
        let raw = self.results.as_ref()?;
        Some(AnalysisResults::parse(self.kind, raw))
    }

    /// Server error message, only meaningful for failed records
    pub fn failure(&self) -> Option<&str> {
        match self.status {
            AnalysisStatus::Failed => Some(self.error.as_deref().unwrap_or("Analysis failed")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_running_alias() {
        let status: AnalysisStatus = serde_json::from_str(r#""running""#).unwrap();
        assert_eq!(status, AnalysisStatus::Processing);
        assert!(!status.is_terminal());
        assert!(AnalysisStatus::Failed.is_terminal());
        assert!(AnalysisStatus::Completed.is_terminal());
    }

    #[test]
    fn test_analysis_type_parse_and_wire_name() {
        assert_eq!("chi-square".parse::<AnalysisType>().unwrap(), AnalysisType::ChiSquare);
        assert_eq!("descriptive".parse::<AnalysisType>().unwrap(), AnalysisType::Basic);
        assert!("anova".parse::<AnalysisType>().is_err());
        assert_eq!(
            serde_json::to_value(AnalysisType::ChiSquare).unwrap(),
            json!("chi_square")
        );
    }

    #[test]
    fn test_request_wire_format() {
        let request = AnalysisRequest {
            dataset_id: DatasetId::new("3"),
            analysis_type: AnalysisType::Regression,
            config: AnalysisConfig::new(vec!["bmi".into(), "age".into()])
                .with_option("dependent_variable", "bmi"),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "dataset_id": "3",
                "analysis_type": "regression",
                "config": {
                    "targetColumns": ["bmi", "age"],
                    "options": {"dependent_variable": "bmi"}
                }
            })
        );
    }

    #[test]
    fn test_results_only_valid_when_completed() {
        let pending: AnalysisRecord = serde_json::from_value(json!({
            "id": "a-1",
            "type": "chi_square",
            "status": "pending",
            "results": {"chi_square_statistic": 1.0}
        }))
        .unwrap();
        assert!(pending.completed_results().is_none());
        assert!(pending.failure().is_none());

        let failed: AnalysisRecord = serde_json::from_value(json!({
            "id": "a-2",
            "type": "basic",
            "status": "failed",
            "error": "Dataset not found"
        }))
        .unwrap();
        assert_eq!(failed.failure(), Some("Dataset not found"));
    }
}
