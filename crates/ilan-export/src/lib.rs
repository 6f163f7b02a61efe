//! Export sink for scraped listing records.
//!
//! Writes the final record sequence to disk as pretty-printed JSON or
//! as CSV with a fixed header. Export failures never invalidate the
//! in-memory records; the caller keeps them and may retry with a
//! different path or format.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod error;

pub use error::{ExportError, Result};

use chrono::Local;
use ilan_core::ListingRecord;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON array
    Json,
    /// CSV with a header row
    Csv,
}

impl ExportFormat {
    /// File extension for this format, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Write records to `path` in the given format.
///
/// Parent directories are created as needed. An existing file at
/// `path` is replaced.
pub fn export_records(
    records: &[ListingRecord],
    path: &Path,
    format: ExportFormat,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    match format {
        ExportFormat::Json => write_json(records, path)?,
        ExportFormat::Csv => write_csv(records, path)?,
    }

    tracing::info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}

/// Timestamped output path inside the export directory, e.g.
/// `exports/sahibinden_20260829_142501.json`.
#[must_use]
pub fn timestamped_path(directory: &Path, format: ExportFormat) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    directory.join(format!("sahibinden_{stamp}.{}", format.extension()))
}

fn write_json(records: &[ListingRecord], path: &Path) -> Result<()> {
    let mut file = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, records)?;
    file.write_all(b"\n")?;
    Ok(())
}

fn write_csv(records: &[ListingRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
