//! Source-side records (OSDU data staged as assets and sequences)

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// An asset as returned by the source system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAsset {
    /// Internal numeric id
    pub id: i64,
    /// Stable external identifier
    #[serde(default)]
    pub external_id: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// External id of the parent asset
    #[serde(default)]
    pub parent_external_id: Option<String>,
    /// Origin of the record, e.g. `EDM`
    #[serde(default)]
    pub source: Option<String>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl SourceAsset {
    /// External id if present and non-blank
    pub fn identifier(&self) -> Option<&str> {
        self.external_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Metadata value if present and non-blank
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// Filter for listing assets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFilter {
    /// Exact-match metadata constraints
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Restrict to a source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl AssetFilter {
    /// Filter on metadata only
    pub fn metadata(metadata: BTreeMap<String, String>) -> Self {
        Self {
            metadata,
            source: None,
        }
    }

    /// Restrict the filter to a source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Check whether an asset satisfies the filter
    pub fn matches(&self, asset: &SourceAsset) -> bool {
        if let Some(ref source) = self.source {
            if asset.source.as_deref() != Some(source.as_str()) {
                return false;
            }
        }
        self.metadata
            .iter()
            .all(|(k, v)| asset.metadata.get(k) == Some(v))
    }
}

/// Column definition of a sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceColumn {
    /// Column external id (mnemonic)
    pub external_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl SequenceColumn {
    /// Unit stored in column metadata, lowercased
    pub fn unit(&self) -> String {
        self.metadata
            .get("unit")
            .map(|u| u.trim().to_lowercase())
            .unwrap_or_default()
    }
}

/// A sequence header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSequence {
    pub id: i64,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Owning asset (the wellbore)
    #[serde(default)]
    pub asset_id: Option<i64>,
    #[serde(default)]
    pub columns: Vec<SequenceColumn>,
}

impl SourceSequence {
    /// External id, falling back to the numeric id
    pub fn display_id(&self) -> String {
        self.external_id
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// One row of sequence data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceRow {
    pub row_number: i64,
    pub values: Vec<serde_json::Value>,
}

/// Rows of a sequence, with the column order they are laid out in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceData {
    /// Column external ids, in value order
    pub columns: Vec<String>,
    pub rows: Vec<SequenceRow>,
}

impl SequenceData {
    /// Position of a column by external id
    pub fn column_index(&self, external_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == external_id)
    }

    /// Numeric cell value. Null, NaN and non-numeric cells are `None`.
    pub fn number(row: &SequenceRow, index: usize) -> Option<f64> {
        let value = match row.values.get(index)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }

    /// Textual cell value
    pub fn text(row: &SequenceRow, index: usize) -> Option<String> {
        match row.values.get(index)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
