//! Catalog record documents.
//!
//! A record is the persisted JSON representation of one namespace of
//! colormaps: a `namespace` string, optional shared defaults, and a
//! `colormaps` map from short name to either a concrete entry or an alias
//! pointing at another namespace-qualified entry.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::stops::Interpolation;

/// One namespace of colormap definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub namespace: String,
    /// Defaults applied to entries that do not set their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub colormaps: BTreeMap<String, RecordEntry>,
}

impl CatalogRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

/// A single `colormaps` entry: concrete data or an alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordEntry {
    Alias(AliasEntry),
    Item(ItemEntry),
}

/// A pointer to another entry's qualified name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasEntry {
    pub alias: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,
}

/// A concrete colormap definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEntry {
    pub data: DataRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<Interpolation>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    /// Same-namespace alternate spellings, addressable only as
    /// `namespace:alias`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
}

/// Where an entry's stop data lives: a reference into the built-in data
/// registry, or rows inlined in the record itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataRef {
    Reference(String),
    /// Rows of `(r, g, b)`, `(r, g, b, a)`, or `(position, r, g, b, a)`.
    Inline(Vec<Vec<f64>>),
}

/// Load every record file named `pattern` under `root` (recursively),
/// sorted by path for deterministic registration order.
pub fn load_records_dir(root: &Path, pattern: &str) -> Result<Vec<CatalogRecord>> {
    let mut files = Vec::new();
    collect_record_files(root, pattern, &mut files)?;
    files.sort();
    files.iter().map(|p| CatalogRecord::from_path(p)).collect()
}

fn collect_record_files(dir: &Path, pattern: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_record_files(&path, pattern, out)?;
        } else if path.file_name().map(|n| n == pattern).unwrap_or(false) {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "namespace": "demo",
        "license": "MIT",
        "category": "sequential",
        "colormaps": {
            "fade": {"data": [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]},
            "steps": {
                "data": "demo:steps",
                "category": "qualitative",
                "interpolation": false
            },
            "faded": {"alias": "demo:fade"}
        }
    }"#;

    #[test]
    fn test_parse_record_document() {
        let record = CatalogRecord::from_json(RECORD).unwrap();
        assert_eq!(record.namespace, "demo");
        assert_eq!(record.license.as_deref(), Some("MIT"));
        assert_eq!(record.colormaps.len(), 3);

        match &record.colormaps["fade"] {
            RecordEntry::Item(item) => {
                assert!(matches!(item.data, DataRef::Inline(_)));
                assert!(item.interpolation.is_none());
            }
            RecordEntry::Alias(_) => panic!("expected a concrete entry"),
        }
        match &record.colormaps["steps"] {
            RecordEntry::Item(item) => {
                assert!(matches!(item.data, DataRef::Reference(_)));
                assert_eq!(item.interpolation, Some(Interpolation::Nearest));
            }
            RecordEntry::Alias(_) => panic!("expected a concrete entry"),
        }
        assert!(matches!(
            record.colormaps["faded"],
            RecordEntry::Alias(AliasEntry { ref alias, .. }) if alias == "demo:fade"
        ));
    }

    #[test]
    fn test_record_round_trip() {
        let record = CatalogRecord::from_json(RECORD).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back = CatalogRecord::from_json(&json).unwrap();
        assert_eq!(back.namespace, record.namespace);
        assert_eq!(back.colormaps.len(), record.colormaps.len());
    }

    #[test]
    fn test_load_records_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("demo");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("record.json"), RECORD).unwrap();
        fs::write(nested.join("unrelated.json"), "{}").unwrap();

        let records = load_records_dir(dir.path(), "record.json").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].namespace, "demo");
    }
}
