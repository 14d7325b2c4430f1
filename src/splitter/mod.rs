pub mod boundaries;
pub mod metadata;

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::manifest::{Manifest, ManifestRow};
use crate::pdf::{PageText, SourcePdf};
use metadata::SectionMeta;

/// Everything one run touches on disk. Passed in explicitly; the pipeline
/// holds no global state.
pub struct SplitConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
}

#[derive(Debug)]
pub struct RunStats {
    pub sections: usize,
    pub pages: usize,
}

/// Full pipeline: scan for record boundaries, build page ranges, then for
/// each range in order extract metadata, write the section PDF, and append
/// a manifest row. The first missing field or I/O failure aborts the run;
/// the failing section gets neither an output file nor a row, while
/// sections already written stay valid on disk.
pub fn run(config: &SplitConfig) -> Result<RunStats> {
    let source = SourcePdf::open(&config.input)?;
    let starts = boundaries::detect_boundaries(&source);
    let ranges = boundaries::build_ranges(&starts, source.page_count());
    if ranges.is_empty() {
        info!(
            "No record marker found in {}; nothing to split",
            config.input.display()
        );
        return Ok(RunStats {
            sections: 0,
            pages: 0,
        });
    }
    info!(
        "{} sections across {} pages",
        ranges.len(),
        source.page_count()
    );

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;
    let mut manifest = Manifest::open_append(&config.manifest_path)?;

    let source_pdf = config.input.display().to_string();
    let mut taken: HashSet<String> = HashSet::new();
    let mut pages = 0usize;

    for (idx, range) in ranges.iter().enumerate() {
        let section_index = idx + 1;
        let meta = metadata::extract(&source.page_text(range.start)).with_context(|| {
            format!(
                "Section {} starting at page {}",
                section_index,
                range.start + 1
            )
        })?;

        let filename = resolve_filename(&meta, &mut taken);
        let path = config.output_dir.join(&filename);
        source.write_section(range, &path)?;
        manifest.append(&ManifestRow {
            source_pdf: source_pdf.clone(),
            section_index,
            page_start_1based: range.start + 1,
            page_end_1based: range.end + 1,
            page_count: range.page_count(),
            client_name: meta.client_name,
            fiscal_year: meta.fiscal_year,
            output_pdf: path.display().to_string(),
        })?;

        pages += range.page_count();
        println!("Wrote: {}", path.display());
    }

    Ok(RunStats {
        sections: ranges.len(),
        pages,
    })
}

/// Collision-aware output name: a repeat of the same {name, year} pair in
/// one run gets `_2`, `_3`, ... instead of silently overwriting the
/// earlier file.
fn resolve_filename(meta: &SectionMeta, taken: &mut HashSet<String>) -> String {
    let stem = metadata::output_stem(meta);
    let first = format!("{}.pdf", stem);
    if taken.insert(first.clone()) {
        return first;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}.pdf", stem, n);
        if taken.insert(candidate.clone()) {
            warn!(
                "Duplicate output name {}; writing {} instead",
                first, candidate
            );
            return candidate;
        }
        n += 1;
    }
}

// ── Tests ──
