//! Report models

use super::dataset::DatasetId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a report section points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionContentType {
    Analysis,
    Visualization,
}

/// Section as submitted in `POST /reports`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSectionRequest {
    pub title: String,
    pub content_type: SectionContentType,
    pub content_id: String,
    pub order: u32,
}

/// Body of `POST /reports`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dataset_id: DatasetId,
    pub sections: Vec<ReportSectionRequest>,
}

/// Section as returned by the backend, with its embedded content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    #[serde(rename = "type", alias = "content_type")]
    pub kind: SectionContentType,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    #[serde(deserialize_with = "crate::serde_helpers::string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub dataset_id: DatasetId,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sections: Vec<ReportSection>,
}

impl Report {
    /// Sections in display order
    pub fn ordered_sections(&self) -> Vec<&ReportSection> {
        let mut sections: Vec<_> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order);
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_sections_ordered() {
        let json = r#"{
            "id": 4,
            "title": "Quarterly review",
            "dataset_id": 2,
            "created_at": "2024-02-01T08:00:00",
            "sections": [
                {"title": "Chart", "type": "visualization", "content": {}, "order": 2},
                {"title": "Stats", "type": "analysis", "content": {"type": "basic"}, "order": 1}
            ]
        }"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.id, "4");
        let sections = report.ordered_sections();
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Stats", "Chart"]);
    }
}
