//! Typed result payloads for each analysis type
//!
//! The backend stores results as free-form JSON; these shapes mirror what its
//! analysis engine emits so renderers can work with named fields.

use super::analysis::AnalysisType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Map of row -> (column -> value)
pub type Matrix<T> = BTreeMap<String, BTreeMap<String, T>>;

/// Parsed results of a completed analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResults {
    Basic(BasicStatistics),
    Correlation(CorrelationAnalysis),
    Comparative(ComparativeStatistics),
    ChiSquare(ChiSquareAnalysis),
    Regression(RegressionAnalysis),
}

impl AnalysisResults {
    /// Parse raw results for `kind`. Accepts the bare shape or one wrapped under its type key.
    pub fn parse(kind: AnalysisType, raw: &Value) -> Result<Self, serde_json::Error> {
        let inner = raw.get(kind.as_str()).unwrap_or(raw).clone();
        Ok(match kind {
            AnalysisType::Basic => AnalysisResults::Basic(serde_json::from_value(inner)?),
            AnalysisType::Correlation => {
                AnalysisResults::Correlation(serde_json::from_value(inner)?)
            }
            AnalysisType::Comparative => {
                AnalysisResults::Comparative(serde_json::from_value(inner)?)
            }
            AnalysisType::ChiSquare => AnalysisResults::ChiSquare(serde_json::from_value(inner)?),
            AnalysisType::Regression => {
                AnalysisResults::Regression(serde_json::from_value(inner)?)
            }
        })
    }

    pub fn kind(&self) -> AnalysisType {
        match self {
            AnalysisResults::Basic(_) => AnalysisType::Basic,
            AnalysisResults::Correlation(_) => AnalysisType::Correlation,
            AnalysisResults::Comparative(_) => AnalysisType::Comparative,
            AnalysisResults::ChiSquare(_) => AnalysisType::ChiSquare,
            AnalysisResults::Regression(_) => AnalysisType::Regression,
        }
    }
}

// ===================
// Descriptive
// ===================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicStatistics {
    /// column -> (statistic -> value), e.g. "age" -> {"mean": 41.2, "std": 9.8}
    #[serde(default)]
    pub descriptive_statistics: Matrix<f64>,
    /// column -> {"count": .., "percentage": ..}
    #[serde(default)]
    pub missing_data: Matrix<f64>,
    #[serde(default)]
    pub column_types: BTreeMap<String, String>,
}

// ===================
// Comparative
// ===================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalTest {
    pub name: String,
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseTest {
    pub statistic: f64,
    #[serde(alias = "p_value")]
    pub pvalue: f64,
    pub significant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeStatistics {
    /// group -> (statistic -> value)
    #[serde(default)]
    pub group_statistics: Matrix<f64>,
    pub statistical_test: StatisticalTest,
    #[serde(default)]
    pub pairwise_tests: Option<BTreeMap<String, PairwiseTest>>,
}

// ===================
// Correlation
// ===================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantCorrelation {
    pub variable1: String,
    pub variable2: String,
    pub correlation: f64,
    pub p_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    #[serde(default)]
    pub correlation_matrix: Matrix<f64>,
    #[serde(default)]
    pub p_values: Matrix<f64>,
    #[serde(default)]
    pub significant_correlations: Vec<SignificantCorrelation>,
}

impl CorrelationAnalysis {
    /// Variables in matrix order
    pub fn variables(&self) -> Vec<String> {
        self.correlation_matrix.keys().cloned().collect()
    }

    pub fn coefficient(&self, a: &str, b: &str) -> Option<f64> {
        self.correlation_matrix.get(a)?.get(b).copied()
    }
}

// ===================
// Chi-square
// ===================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareAnalysis {
    /// row label -> (column label -> observed count)
    #[serde(default)]
    pub contingency_table: Matrix<u64>,
    pub chi_square_statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: u32,
    #[serde(default)]
    pub cramers_v: f64,
    pub significant: bool,
}

impl ChiSquareAnalysis {
    pub fn row_labels(&self) -> Vec<String> {
        self.contingency_table.keys().cloned().collect()
    }

    /// Union of column labels across all rows
    pub fn col_labels(&self) -> Vec<String> {
        self.contingency_table
            .values()
            .flat_map(|row| row.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn cell(&self, row: &str, col: &str) -> u64 {
        self.contingency_table
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0)
    }
}

// ===================
// Regression
// ===================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegressionCoefficients {
    pub intercept: f64,
    pub slope: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidualsSummary {
    pub mean: f64,
    pub std: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionAnalysis {
    pub coefficients: RegressionCoefficients,
    #[serde(default)]
    pub standard_errors: RegressionCoefficients,
    #[serde(default)]
    pub t_statistics: RegressionCoefficients,
    #[serde(default)]
    pub p_values: RegressionCoefficients,
    pub r_squared: f64,
    #[serde(default)]
    pub adjusted_r_squared: f64,
    #[serde(default)]
    pub sample_size: u64,
    #[serde(default)]
    pub residuals_summary: ResidualsSummary,
}

impl RegressionAnalysis {
    /// Fitted value for `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.coefficients.intercept + self.coefficients.slope * x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_wrapped_chi_square() {
        let raw = json!({
            "chi_square": {
                "contingency_table": {
                    "female": {"no": 30, "yes": 10},
                    "male": {"no": 25, "yes": 20, "unknown": 1}
                },
                "chi_square_statistic": 4.21,
                "p_value": 0.04,
                "degrees_of_freedom": 1,
                "cramers_v": 0.21,
                "significant": true
            }
        });
        let parsed = AnalysisResults::parse(AnalysisType::ChiSquare, &raw).unwrap();
        let AnalysisResults::ChiSquare(chi) = parsed else {
            panic!("expected chi-square results");
        };
        assert_eq!(chi.row_labels(), vec!["female", "male"]);
        assert_eq!(chi.col_labels(), vec!["no", "unknown", "yes"]);
        assert_eq!(chi.cell("female", "unknown"), 0);
        assert_eq!(chi.cell("male", "yes"), 20);
    }

    #[test]
    fn test_parse_bare_regression() {
        let raw = json!({
            "coefficients": {"intercept": 1.5, "slope": 2.0},
            "standard_errors": {"intercept": 0.1, "slope": 0.2},
            "t_statistics": {"intercept": 15.0, "slope": 10.0},
            "p_values": {"intercept": 0.001, "slope": 0.002},
            "r_squared": 0.81,
            "adjusted_r_squared": 0.8,
            "sample_size": 50,
            "residuals_summary": {"mean": 0.0, "std": 1.1, "skewness": 0.1, "kurtosis": 2.9}
        });
        let parsed = AnalysisResults::parse(AnalysisType::Regression, &raw).unwrap();
        assert_eq!(parsed.kind(), AnalysisType::Regression);
        let AnalysisResults::Regression(reg) = parsed else {
            panic!("expected regression results");
        };
        assert_eq!(reg.predict(2.0), 5.5);
        assert_eq!(reg.sample_size, 50);
    }

    #[test]
    fn test_parse_mismatched_shape_fails() {
        let raw = json!({"descriptive_statistics": {}});
        assert!(AnalysisResults::parse(AnalysisType::Regression, &raw).is_err());
    }
}
