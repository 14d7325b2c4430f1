mod manifest;
mod pdf;
mod splitter;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use pdf::PageText;

#[derive(Parser)]
#[command(name = "rhr_split", about = "Split a multi-record RHR batch PDF into per-client PDFs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a batch PDF and append one manifest row per section
    Split {
        /// Source batch PDF
        input: PathBuf,
        /// Directory for the per-section PDFs (created if absent)
        #[arg(short, long, default_value = "RHR_output")]
        out_dir: PathBuf,
        /// Manifest CSV path (default: <out-dir>/manifest.csv)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
    /// Detect boundaries and preview per-section metadata without writing
    Scan {
        /// Source batch PDF
        input: PathBuf,
    },
    /// Dump the first 200 characters of each page's text
    Preview {
        /// Source batch PDF
        input: PathBuf,
        /// Max pages to dump (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Split {
            input,
            out_dir,
            manifest,
        } => {
            let manifest_path = manifest.unwrap_or_else(|| out_dir.join("manifest.csv"));
            let config = splitter::SplitConfig {
                input,
                output_dir: out_dir,
                manifest_path,
            };
            let stats = splitter::run(&config)?;
            if stats.sections == 0 {
                println!("No sections found. Is this an RHR batch PDF?");
            } else {
                println!(
                    "Split {} sections ({} pages) into {}",
                    stats.sections,
                    stats.pages,
                    config.output_dir.display()
                );
            }
            Ok(())
        }
        Commands::Scan { input } => scan(&input),
        Commands::Preview { input, limit } => preview(&input, limit),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Dry run: show detected sections and the metadata each would produce.
/// Missing fields are shown as "-" here rather than aborting.
fn scan(input: &Path) -> anyhow::Result<()> {
    use splitter::{boundaries, metadata};

    let source = pdf::SourcePdf::open(input)?;
    let starts = boundaries::detect_boundaries(&source);
    let ranges = boundaries::build_ranges(&starts, source.page_count());
    if ranges.is_empty() {
        println!(
            "No record marker found across {} pages.",
            source.page_count()
        );
        return Ok(());
    }

    println!(
        "{:>3} | {:>5} | {:>5} | {:>5} | {:<30} | {:>4}",
        "#", "start", "end", "pages", "Client", "FY"
    );
    println!("{}", "-".repeat(66));

    for (i, range) in ranges.iter().enumerate() {
        let text = source.page_text(range.start);
        let name = metadata::find_name(&text).unwrap_or_else(|| "-".into());
        let year = metadata::find_year(&text).unwrap_or_else(|| "-".into());
        println!(
            "{:>3} | {:>5} | {:>5} | {:>5} | {:<30} | {:>4}",
            i + 1,
            range.start + 1,
            range.end + 1,
            range.page_count(),
            truncate(&name, 30),
            year
        );
    }

    println!("\n{} sections | pages shown 1-based", ranges.len());
    Ok(())
}

fn preview(input: &Path, limit: Option<usize>) -> anyhow::Result<()> {
    let source = pdf::SourcePdf::open(input)?;
    let count = limit
        .unwrap_or(source.page_count())
        .min(source.page_count());
    for i in 0..count {
        let text = source.page_text(i);
        let head: String = text.chars().take(200).collect();
        println!("Page {}:\n{}...\n", i + 1, head);
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
