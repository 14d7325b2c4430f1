use indicatif::{ProgressBar, ProgressStyle};

use crate::pdf::PageText;

/// A page containing this marker starts a new record.
pub const PRODUCT_MARKER: &str = "Product:";

/// Contiguous run of pages belonging to one record. 0-based, both ends
/// inclusive, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl PageRange {
    pub fn page_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Scan every page once, in order, collecting the indices whose text
/// contains the record marker. A page with no extractable text never
/// matches; a document without a single marker yields an empty set.
pub fn detect_boundaries(source: &impl PageText) -> Vec<usize> {
    let pb = ProgressBar::new(source.page_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut starts = Vec::new();
    for i in 0..source.page_count() {
        if source.page_text(i).contains(PRODUCT_MARKER) {
            starts.push(i);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    starts
}

/// Turn boundary indices into page ranges: each boundary runs up to the page
/// before the next boundary, the last one up to the end of the document.
/// Pages before the first boundary belong to no range.
pub fn build_ranges(starts: &[usize], page_count: usize) -> Vec<PageRange> {
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = match starts.get(i + 1) {
                Some(&next) => next - 1,
                None => page_count - 1,
            };
            PageRange { start, end }
        })
        .collect()
}

// ── Tests ──
