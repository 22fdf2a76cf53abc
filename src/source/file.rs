use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::application::AppError;
use crate::domain::DateRange;

use super::TransactionSource;

/// Reads transactions from a local export: a JSON array, or a CSV file whose
/// header row names the same fields as the backend
/// (`id,description,amount,type,category,transaction_date`).
#[derive(Debug, Clone)]
pub struct FileTransactionSource {
    path: PathBuf,
}

impl FileTransactionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    }
}

#[async_trait]
impl TransactionSource for FileTransactionSource {
    async fn fetch(&self, _range: &DateRange) -> Result<Value, AppError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        if self.is_csv() {
            return Ok(csv_to_json(contents.as_bytes(), &self.path)?);
        }

        serde_json::from_str(&contents).map_err(|e| {
            AppError::InvalidPayload(format!("{} is not valid JSON: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Convert CSV rows into an array of JSON objects keyed by header name.
/// Empty cells are left out so they read as missing fields.
fn csv_to_json<R: Read>(reader: R, path: &Path) -> Result<Value> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader
        .headers()
        .with_context(|| format!("Failed to read CSV header of {}", path.display()))?
        .clone();

    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.records().enumerate() {
        let line = line_num + 2; // +2 for header and 0-indexing
        let record = result.with_context(|| format!("CSV parse error on line {}", line))?;

        let object: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.trim().to_string(), Value::String(cell.to_string())))
            .collect();
        rows.push(Value::Object(object));
    }

    Ok(Value::Array(rows))
}
