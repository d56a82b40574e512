//! Dataset models for uploaded CSV files

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Newtype for Dataset ID
///
/// The backend numbers datasets with integers while analysis requests carry
/// the id as a string. Both forms deserialize; the id always serializes as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for DatasetId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        crate::serde_helpers::string_or_number(deserializer).map(Self)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DatasetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DatasetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Uploaded dataset metadata (`DatasetResponse` on the backend)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub row_count: u64,
    /// Column name -> pandas dtype (e.g. "int64", "object")
    #[serde(default)]
    pub column_info: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Dataset {
    /// Columns derived from the backend dtype map, sorted by name
    pub fn columns(&self) -> Vec<Column> {
        self.column_info
            .iter()
            .map(|(name, dtype)| Column {
                name: name.clone(),
                kind: ColumnKind::from_dtype(dtype),
                unique_values: None,
                has_null: None,
            })
            .collect()
    }

    /// Names of columns usable as numeric variables
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns()
            .into_iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .map(|c| c.name)
            .collect()
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    #[serde(default)]
    pub unique_values: Option<u64>,
    #[serde(default)]
    pub has_null: Option<bool>,
}

/// Column value family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Datetime,
    Text,
}

impl ColumnKind {
    /// Classify a pandas dtype string
    pub fn from_dtype(dtype: &str) -> Self {
        let dtype = dtype.to_ascii_lowercase();
        if dtype.starts_with("int") || dtype.starts_with("uint") || dtype.starts_with("float") {
            ColumnKind::Numeric
        } else if dtype.starts_with("datetime") {
            ColumnKind::Datetime
        } else if dtype == "bool" || dtype == "category" {
            ColumnKind::Categorical
        } else {
            ColumnKind::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Datetime => "datetime",
            ColumnKind::Text => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_id_from_number_and_string() {
        let from_int: DatasetId = serde_json::from_str("42").unwrap();
        let from_str: DatasetId = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(from_int, from_str);
        assert_eq!(serde_json::to_string(&from_int).unwrap(), r#""42""#);
    }

    #[test]
    fn test_dataset_columns_from_dtypes() {
        let json = r#"{
            "id": 7,
            "name": "patients.csv",
            "description": "CSV file upload",
            "row_count": 120,
            "column_info": {"age": "int64", "bmi": "float64", "sex": "object", "visit": "datetime64[ns]", "smoker": "bool"},
            "created_at": "2024-05-01T09:00:00.000001"
        }"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.id.as_str(), "7");
        assert!(dataset.created_at.is_some());

        let columns = dataset.columns();
        assert_eq!(columns.len(), 5);
        let kind_of = |name: &str| columns.iter().find(|c| c.name == name).unwrap().kind;
        assert_eq!(kind_of("age"), ColumnKind::Numeric);
        assert_eq!(kind_of("sex"), ColumnKind::Text);
        assert_eq!(kind_of("visit"), ColumnKind::Datetime);
        assert_eq!(kind_of("smoker"), ColumnKind::Categorical);
        assert_eq!(dataset.numeric_columns(), vec!["age", "bmi"]);
    }
}
