//! Data models for the Doctor Stats REST API

pub mod analysis;
pub mod dataset;
pub mod report;
pub mod results;
pub mod user;
pub mod visualization;

pub use analysis::{AnalysisConfig, AnalysisRecord, AnalysisRequest, AnalysisStatus, AnalysisType};
pub use dataset::{Column, ColumnKind, Dataset, DatasetId};
pub use report::{Report, ReportRequest, ReportSection, ReportSectionRequest, SectionContentType};
pub use results::{
    AnalysisResults, BasicStatistics, ChiSquareAnalysis, ComparativeStatistics,
    CorrelationAnalysis, PairwiseTest, RegressionAnalysis, RegressionCoefficients,
    ResidualsSummary, SignificantCorrelation, StatisticalTest,
};
pub use user::{Subscription, TokenResponse, UserProfile, UserUpdate};
pub use visualization::{Visualization, VisualizationKind, VisualizationRequest};
