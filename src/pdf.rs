use std::path::Path;

use anyhow::{Context, Result};
use lopdf::Document;

use crate::splitter::boundaries::PageRange;

/// Read-only view of a paginated document: page count plus the extracted
/// text of each page. A page whose text cannot be extracted yields an empty
/// string rather than an error.
pub trait PageText {
    fn page_count(&self) -> usize;
    /// Text of the page at `index` (0-based); empty when out of bounds or
    /// unreadable.
    fn page_text(&self, index: usize) -> String;
}

/// The batch PDF, opened once per run and shared read-only by boundary
/// scanning, metadata extraction, and section copy-out.
pub struct SourcePdf {
    doc: Document,
    page_count: usize,
}

impl SourcePdf {
    pub fn open(path: &Path) -> Result<Self> {
        let doc = Document::load(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let page_count = doc.get_pages().len();
        Ok(Self { doc, page_count })
    }

    /// Copy the pages of `range` (in original order, nothing added or
    /// dropped) into a new PDF at `path`.
    pub fn write_section(&self, range: &PageRange, path: &Path) -> Result<()> {
        let mut out = self.doc.clone();
        // lopdf numbers pages from 1
        let delete: Vec<u32> = (1..=self.page_count as u32)
            .filter(|&p| (p as usize) < range.start + 1 || (p as usize) > range.end + 1)
            .collect();
        if !delete.is_empty() {
            out.delete_pages(&delete);
        }
        out.prune_objects();
        out.renumber_objects();
        out.compress();
        out.save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

impl PageText for SourcePdf {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> String {
        if index >= self.page_count {
            return String::new();
        }
        self.doc.extract_text(&[index as u32 + 1]).unwrap_or_default()
    }
}


// ── Tests ──
