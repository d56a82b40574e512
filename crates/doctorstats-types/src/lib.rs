//! doctorstats-types - Wire types for the Doctor Stats API
//!
//! This crate contains pure data structures without heavy dependencies.
//! No tokio, no HTTP client - just serde-serializable types matching the
//! JSON the analysis backend sends and accepts.
//!
//! Used by:
//! - doctorstats-core (session, HTTP client, services)
//! - doctorstats (CLI pages and renderers)

pub mod models;
pub mod serde_helpers;

pub use models::{
    AnalysisConfig, AnalysisRecord, AnalysisRequest, AnalysisResults, AnalysisStatus,
    AnalysisType, BasicStatistics, ChiSquareAnalysis, Column, ColumnKind, ComparativeStatistics,
    CorrelationAnalysis, Dataset, DatasetId, PairwiseTest, RegressionAnalysis,
    RegressionCoefficients, Report, ReportRequest, ReportSection, ReportSectionRequest,
    ResidualsSummary, SectionContentType, SignificantCorrelation, StatisticalTest, Subscription,
    TokenResponse, UserProfile, UserUpdate, Visualization, VisualizationKind,
    VisualizationRequest,
};
