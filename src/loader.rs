// loader.rs — Record loading for the student and web pipelines.
//
// Tabular input arrives as CSV with a header row; header names are normalized
// so templates can reference stable keys. Web input arrives as two JSON arrays
// (text chunks and media records) with loosely-shaped metadata from scraping.
// A structurally broken source aborts the whole load, no partial recovery.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};

/// One row of the student dataset, keyed by normalized header names.
#[derive(Debug, Clone)]
pub struct StudentRecord {
    /// Zero-based row index in the source file, used in error reports.
    pub index: usize,
    fields: HashMap<String, String>,
}

impl StudentRecord {
    pub fn new(index: usize, fields: HashMap<String, String>) -> Self {
        Self { index, fields }
    }

    /// Look up a required field. An absent or empty-after-trim value is a
    /// per-record fatal error in the student pipeline.
    pub fn require(&self, field: &'static str) -> PipelineResult<&str> {
        match self.fields.get(field).map(String::as_str) {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(PipelineError::FieldMissing {
                index: self.index,
                field,
            }),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// One pre-chunked web text record. `text` stays a raw JSON value: scrapers
/// occasionally emit nulls or numbers there, and a non-string is a validity
/// skip downstream, not a load failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkRecord {
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkMetadata {
    /// Appears as either a JSON string or a number in scraped metadata.
    #[serde(default)]
    pub chunk_id: Option<Value>,
    #[serde(default)]
    pub page_url: Option<String>,
}

/// One scraped media record. Only the source page matters for embedding.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaRecord {
    #[serde(default)]
    pub source_page: Option<String>,
}

/// Normalize a header name the way templates expect it:
/// trimmed, lowercased, spaces replaced with underscores.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Load the student dataset from a CSV file with a header row.
pub fn load_students(path: &Path) -> PipelineResult<Vec<StudentRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| PipelineError::load(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::load(path, e))?
        .iter()
        .map(normalize_header)
        .collect();
    log::info!("Columns detected: {:?}", headers);

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| PipelineError::load(path, e))?;
        let fields: HashMap<String, String> = headers
            .iter()
            .cloned()
            .zip(row.iter().map(|v| v.to_string()))
            .collect();
        records.push(StudentRecord::new(index, fields));
    }
    log::info!("Total rows: {}", records.len());
    Ok(records)
}

/// Load the pre-chunked web text from a JSON array file.
pub fn load_chunks(path: &Path) -> PipelineResult<Vec<ChunkRecord>> {
    load_json_array(path)
}

/// Load the scraped media records from a JSON array file.
pub fn load_media(path: &Path) -> PipelineResult<Vec<MediaRecord>> {
    load_json_array(path)
}

fn load_json_array<T: for<'de> Deserialize<'de>>(path: &Path) -> PipelineResult<Vec<T>> {
    let file = File::open(path).map_err(|e| PipelineError::load(path, e))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| PipelineError::load(path, e))
}
