//! Catalog Data Loading
//!
//! Defines the record schema (attribute positions → names) and loads the
//! course catalog from CSV with Polars.
//!
//! One row per section. Rows are keyed by department + number + type, so
//! several sections of the same course collapse onto one key; the first row
//! seen for a key is kept.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::path::Path;

/// Field names of a Record, by position.
pub const ATTRIBUTE_NAMES: [&str; 15] = [
    "department",
    "number",
    "section",
    "type",
    "units",
    "instructor",
    "days",
    "room",
    "title",
    "topic",
    "status",
    "enrollment",
    "enrollment_limit",
    "wait_list",
    "description",
];

/// Number of leading fields kept in a preview.
pub const PREVIEW_LEN: usize = 10;

/// Unique identifier of one course offering, e.g. `cs2110lecture`
pub type SectionKey = String;

/// Ordered scalar fields, positionally aligned with [`ATTRIBUTE_NAMES`]
pub type Record = Vec<Value>;

/// Insertion-ordered mapping from section key to its full record.
pub type CatalogStore = IndexMap<SectionKey, Record>;

/// Position → field name map sent to clients as `meta.attr_map`.
///
/// Serializes as a JSON object keyed by position (`{"0": "department", ...}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeMap;

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ATTRIBUTE_NAMES.len()))?;
        for (position, name) in ATTRIBUTE_NAMES.iter().enumerate() {
            map.serialize_entry(&position, name)?;
        }
        map.end()
    }
}

/// Domain failures while building the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog '{path}' is missing column '{column}'")]
    MissingColumn { path: String, column: &'static str },

    #[error("catalog '{path}' contains no usable sections")]
    Empty { path: String },
}

/// Build a section key from its department, number and type.
///
/// Whitespace is dropped and the result lower-cased:
/// `("CS", "2110", "Lecture")` → `"cs2110lecture"`.
pub fn section_key(department: &str, number: &str, kind: &str) -> SectionKey {
    [department, number, kind]
        .iter()
        .flat_map(|part| part.chars())
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Load the catalog from a CSV file with one column per attribute name.
///
/// Extra columns are ignored. Empty cells become `null`.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogStore> {
    let path = path.as_ref();
    let path_str = path.display().to_string();
    tracing::info!("Loading catalog from {}", path_str);

    // Schema inference disabled: every column is read as a string
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to create CSV reader: {}", path_str))?
        .finish()
        .with_context(|| format!("Failed to load catalog CSV: {}", path_str))?;

    let mut columns = Vec::with_capacity(ATTRIBUTE_NAMES.len());
    for name in ATTRIBUTE_NAMES {
        let column = df
            .column(name)
            .map_err(|_| CatalogError::MissingColumn {
                path: path_str.clone(),
                column: name,
            })?
            .str()
            .with_context(|| format!("Column '{}' is not string type", name))?;
        columns.push(column);
    }

    let mut store = CatalogStore::with_capacity(df.height());
    let mut duplicates: FxHashMap<SectionKey, usize> = FxHashMap::default();

    for idx in 0..df.height() {
        let record: Record = columns
            .iter()
            .map(|column| match column.get(idx) {
                Some(cell) if !cell.trim().is_empty() => Value::String(cell.to_string()),
                _ => Value::Null,
            })
            .collect();

        let key = section_key(
            record[0].as_str().unwrap_or_default(),
            record[1].as_str().unwrap_or_default(),
            record[3].as_str().unwrap_or_default(),
        );
        if key.is_empty() {
            tracing::debug!("Skipping row {} without department/number/type", idx);
            continue;
        }

        if store.contains_key(&key) {
            *duplicates.entry(key).or_default() += 1;
        } else {
            store.insert(key, record);
        }
    }

    if store.is_empty() {
        return Err(CatalogError::Empty { path: path_str }.into());
    }

    let extra_sections: usize = duplicates.values().sum();
    tracing::info!(
        "Loaded {} sections ({} rows, {} additional sections folded into {} keys)",
        store.len(),
        df.height(),
        extra_sections,
        duplicates.len(),
    );

    Ok(store)
}
