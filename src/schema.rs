//! Schema descriptors as delivered by the IDE's database explorer.
//!
//! These are consumed, never produced: the explorer refreshes them whenever
//! the database connection changes, and the canvas copies what it needs when
//! a table is dropped onto it. Field names follow the explorer's JSON feed.
use crate::error::Error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub table_name: String,
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub is_primary_key: bool,
}

/// Reads the full descriptor list out of the explorer's JSON payload.
pub fn parse_descriptors(json: &str) -> Result<Vec<TableSchema>, Error> {
    serde_json::from_str(json).map_err(|error| Error::BadDescriptor(error.to_string()))
}
