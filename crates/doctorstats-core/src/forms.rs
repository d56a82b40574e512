//! Client-side form validation
//!
//! Every check runs before a request is built. Messages are the exact text a
//! page shows in its inline alert.

use crate::error::ValidationError;
use doctorstats_types::{
    AnalysisConfig, AnalysisRequest, AnalysisType, DatasetId, ReportRequest, VisualizationKind,
    VisualizationRequest,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.is_empty() {
            return Err(ValidationError::for_field("email", "Email is required"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::for_field("password", "Password is required"));
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::for_field(
                "email",
                "Please enter a valid email address",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.is_empty() || self.password.is_empty() || self.name.is_empty() {
            return Err(ValidationError::new("Please fill in all required fields"));
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::for_field(
                "email",
                "Please enter a valid email address",
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::for_field(
                "password",
                format!(
                    "Password must be at least {} characters long",
                    MIN_PASSWORD_LEN
                ),
            ));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::for_field(
                "confirm_password",
                "Passwords do not match",
            ));
        }
        Ok(())
    }
}

/// Column selections for one analysis submission
///
/// Which fields matter depends on `analysis_type`:
/// basic and correlation read `columns`, comparative reads
/// `target_column`/`group_column`, chi-square reads `variable1`/`variable2`,
/// regression reads `dependent`/`independent`.
#[derive(Debug, Clone)]
pub struct AnalysisForm {
    pub analysis_type: AnalysisType,
    pub columns: Vec<String>,
    pub target_column: Option<String>,
    pub group_column: Option<String>,
    pub variable1: Option<String>,
    pub variable2: Option<String>,
    pub dependent: Option<String>,
    pub independent: Option<String>,
}

impl AnalysisForm {
    pub fn new(analysis_type: AnalysisType) -> Self {
        Self {
            analysis_type,
            columns: Vec::new(),
            target_column: None,
            group_column: None,
            variable1: None,
            variable2: None,
            dependent: None,
            independent: None,
        }
    }

    /// Validate and build the backend config
    pub fn to_config(&self) -> Result<AnalysisConfig, ValidationError> {
        match self.analysis_type {
            AnalysisType::Basic => {
                if self.columns.is_empty() {
                    return Err(ValidationError::for_field(
                        "columns",
                        "Please select at least one column for analysis",
                    ));
                }
                Ok(AnalysisConfig::new(self.columns.clone())
                    .with_option("columns", string_list(&self.columns)))
            }
            AnalysisType::Correlation => {
                if self.columns.len() < 2 {
                    return Err(ValidationError::for_field(
                        "columns",
                        "Please select at least two columns for correlation analysis",
                    ));
                }
                Ok(AnalysisConfig::new(self.columns.clone())
                    .with_option("columns", string_list(&self.columns)))
            }
            AnalysisType::Comparative => {
                let (Some(target), Some(group)) =
                    (selected(&self.target_column), selected(&self.group_column))
                else {
                    return Err(ValidationError::new(
                        "Please select both target and group columns",
                    ));
                };
                Ok(AnalysisConfig::new(vec![target.to_string()])
                    .with_option("target_column", target)
                    .with_option("group_column", group))
            }
            AnalysisType::ChiSquare => {
                let (Some(v1), Some(v2)) = (selected(&self.variable1), selected(&self.variable2))
                else {
                    return Err(ValidationError::new(
                        "Please select both variables for chi-square analysis",
                    ));
                };
                if v1 == v2 {
                    return Err(ValidationError::new("Please select different variables"));
                }
                Ok(AnalysisConfig::new(vec![v1.to_string(), v2.to_string()])
                    .with_option("variable1", v1)
                    .with_option("variable2", v2))
            }
            AnalysisType::Regression => {
                let (Some(dep), Some(indep)) =
                    (selected(&self.dependent), selected(&self.independent))
                else {
                    return Err(ValidationError::new(
                        "Please select both dependent and independent variables",
                    ));
                };
                if dep == indep {
                    return Err(ValidationError::new("Please select different variables"));
                }
                Ok(AnalysisConfig::new(vec![dep.to_string(), indep.to_string()])
                    .with_option("dependent_variable", dep)
                    .with_option("independent_variable", indep))
            }
        }
    }

    pub fn to_request(&self, dataset_id: DatasetId) -> Result<AnalysisRequest, ValidationError> {
        Ok(AnalysisRequest {
            dataset_id,
            analysis_type: self.analysis_type,
            config: self.to_config()?,
        })
    }
}

/// Validate a chart request before it is sent
pub fn validate_visualization(request: &VisualizationRequest) -> Result<(), ValidationError> {
    if request.dataset_id.as_str().is_empty() {
        return Err(ValidationError::for_field("dataset", "Please select a dataset"));
    }
    let needed = request.kind.min_columns();
    if request.columns.len() < needed {
        return Err(ValidationError::for_field(
            "columns",
            format!(
                "A {} chart needs at least {} columns",
                request.kind, needed
            ),
        ));
    }
    Ok(())
}

pub fn validate_report(request: &ReportRequest) -> Result<(), ValidationError> {
    if request.dataset_id.as_str().is_empty() {
        return Err(ValidationError::for_field("dataset", "Please select a dataset"));
    }
    if request.title.trim().is_empty() {
        return Err(ValidationError::for_field("title", "Please enter a report title"));
    }
    Ok(())
}

/// Chart type from user input
pub fn parse_chart_type(raw: &str) -> Result<VisualizationKind, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::for_field("type", "Please select a chart type"));
    }
    raw.parse()
        .map_err(|e: String| ValidationError::for_field("type", e))
}

fn selected(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn string_list(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}
