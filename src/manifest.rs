use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// One audit row per section written, appended in processing order.
#[derive(Debug, Serialize)]
pub struct ManifestRow {
    pub source_pdf: String,
    pub section_index: usize,
    pub page_start_1based: usize,
    pub page_end_1based: usize,
    pub page_count: usize,
    pub client_name: String,
    pub fiscal_year: String,
    pub output_pdf: String,
}

const COLUMNS: [&str; 8] = [
    "source_pdf",
    "section_index",
    "page_start_1based",
    "page_end_1based",
    "page_count",
    "client_name",
    "fiscal_year",
    "output_pdf",
];

/// Append-only CSV audit log. The header is written once, when the file is
/// created or found empty; later runs extend the same file under the same
/// header.
pub struct Manifest {
    writer: csv::Writer<File>,
}

impl Manifest {
    pub fn open_append(path: &Path) -> Result<Self> {
        let needs_header = match std::fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .with_context(|| format!("Failed to open manifest {}", path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(COLUMNS)?;
        }
        Ok(Self { writer })
    }

    /// Serialize one row and flush, so rows for completed sections survive
    /// a later abort.
    pub fn append(&mut self, row: &ManifestRow) -> Result<()> {
        self.writer.serialize(row)?;
        self.writer.flush()?;
        Ok(())
    }
}

// ── Tests ──
