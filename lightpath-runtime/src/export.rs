//! Tabular export of analysis records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use lightpath_core::{PathRecord, RecordStatus};

/// Header row of the CSV export
pub const CSV_HEADER: &str = "path,latency_s,noise_w,snr_db,status,detail";

/// Output format for analysis records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Errors from exporting records
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown export format {0:?} (expected csv or json)")]
    UnknownFormat(String),
}

/// One CSV row; field names double as the header
#[derive(Debug, Serialize)]
struct CsvRow {
    path: String,
    latency_s: f64,
    noise_w: f64,
    snr_db: Option<f64>,
    status: &'static str,
    detail: Option<String>,
}

impl CsvRow {
    fn new(record: &PathRecord, path_separator: &str) -> Self {
        let detail = match &record.status {
            RecordStatus::Ok => None,
            RecordStatus::Degenerate(e) => Some(e.to_string()),
            RecordStatus::Failed(e) => Some(e.to_string()),
        };

        Self {
            path: record.path_label(path_separator),
            latency_s: record.latency,
            noise_w: record.noise,
            snr_db: record.snr_db,
            status: record.status.label(),
            detail,
        }
    }
}

/// Write records as CSV, one row per path
///
/// Rows without a finite SNR leave `snr_db` empty; `status` holds the
/// outcome label and `detail` the reason.
pub fn write_csv<W: Write>(
    records: &[PathRecord],
    path_separator: &str,
    writer: W,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    // Headers are only emitted alongside the first serialized row
    if records.is_empty() {
        wtr.write_record(CSV_HEADER.split(','))?;
    }
    for record in records {
        wtr.serialize(CsvRow::new(record, path_separator))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write records as a pretty-printed JSON array
pub fn write_json<W: Write>(records: &[PathRecord], mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write records in the requested format
pub fn export_records<W: Write>(
    records: &[PathRecord],
    format: ExportFormat,
    path_separator: &str,
    writer: W,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_csv(records, path_separator, writer),
        ExportFormat::Json => write_json(records, writer),
    }
}

/// Write records to a file
pub fn export_to_path<P: AsRef<Path>>(
    records: &[PathRecord],
    format: ExportFormat,
    path_separator: &str,
    path: P,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    export_records(records, format, path_separator, BufWriter::new(file))
}
