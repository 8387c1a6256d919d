//! # CLI Module
//!
//! Command-line interface for the EXIF date auditor.
//!
//! ## Usage
//! ```bash
//! # Scan a folder and list every photo with its date status
//! exif-audit scan ~/Photos
//!
//! # Walk subfolders, flag dates more than a week apart
//! exif-audit scan ~/Photos --recursive --threshold 7
//!
//! # Only photos without a capture date, as JSON
//! exif-audit scan ~/Photos --missing-only --output json
//!
//! # Fix the capture date of one photo
//! exif-audit set-date ~/Photos/IMG_0001.jpg "2020:01:01 12:00:00"
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use exif_date_auditor::core::metadata::{write_date, DateTag};
use exif_date_auditor::core::session::{
    inspect, parse_threshold, ImageRecord, ScanConfiguration, ScanSession,
};
use exif_date_auditor::error::Result;
use exif_date_auditor::events::{ScanEvent, ScanSummary};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How often the result queue is drained while a scan runs
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// EXIF Date Auditor - find and fix photos with missing or conflicting dates
#[derive(Parser, Debug)]
#[command(name = "exif-audit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a folder and report the date fields of every photo
    Scan {
        /// Folder to scan
        root: PathBuf,

        /// Include subfolders
        #[arg(short, long)]
        recursive: bool,

        /// Days two dates may differ before they count as a discrepancy
        #[arg(short, long, default_value = "30")]
        threshold: String,

        /// Tag checked by --missing-only
        #[arg(long, default_value = "DateTimeOriginal")]
        filter_tag: DateTag,

        /// Only list photos missing the filter tag
        #[arg(long)]
        missing_only: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Write a date into one photo
    SetDate {
        /// Photo to update
        file: PathBuf,

        /// New value, formatted YYYY:MM:DD HH:MM:SS
        value: String,

        /// Tag to write (embedded tags only)
        #[arg(long, default_value = "DateTimeOriginal")]
        tag: DateTag,

        /// Days two dates may differ before they count as a discrepancy
        #[arg(short, long, default_value = "30")]
        threshold: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (paths only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            root,
            recursive,
            threshold,
            filter_tag,
            missing_only,
            output,
            verbose,
        } => {
            exif_date_auditor::init_tracing(if verbose { "debug" } else { "warn" });
            let config = ScanConfiguration::builder(root)
                .recursive(recursive)
                .threshold_text(&threshold)
                .filter_tag(filter_tag)
                .build();
            run_scan(config, missing_only, output, verbose)
        }
        Commands::SetDate {
            file,
            value,
            tag,
            threshold,
        } => {
            exif_date_auditor::init_tracing("warn");
            run_set_date(&file, tag, &value, parse_threshold(&threshold))
        }
    }
}

fn run_scan(
    config: ScanConfiguration,
    missing_only: bool,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();
    let filter_tag = config.filter_tag();
    let threshold = config.threshold_days();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("EXIF Date Auditor").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let mut session = ScanSession::new();
    session.start(config)?;

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(session.total() as u64);
        let template = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
        if let Ok(bar_style) = ProgressStyle::default_bar().template(template) {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    while !session.is_done() {
        for event in session.poll_timeout(POLL_INTERVAL) {
            let Some(ref pb) = progress else { continue };
            match event {
                ScanEvent::Started { total_files, .. } => pb.set_length(total_files as u64),
                ScanEvent::FileProcessed(p) => {
                    pb.set_position(p.index as u64 + 1);
                    if verbose {
                        pb.set_message(p.record.file_name());
                    }
                }
                ScanEvent::Completed { .. } => pb.finish_and_clear(),
            }
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let rows = session.visible_rows(missing_only, filter_tag);
    let summary = session.summary().unwrap_or_default();

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &rows, &summary, filter_tag, threshold),
        OutputFormat::Json => print_json_results(&rows, &summary, filter_tag, threshold),
        OutputFormat::Minimal => print_minimal_results(&rows),
    }

    Ok(())
}

fn run_set_date(file: &Path, tag: DateTag, value: &str, threshold: u32) -> Result<()> {
    let term = Term::stderr();

    write_date(file, tag, value)?;

    let record = inspect(file.to_path_buf(), threshold);
    term.write_line(&format!(
        "{} {} set to {} on {}",
        style("✓").green().bold(),
        style(tag).cyan(),
        style(value).yellow(),
        display_path(file)
    ))
    .ok();
    let status = match record.discrepancy {
        Some(d) => format!("  {} {}", style("Still disagrees:").red(), d),
        None if record.problematic => format!("  {}", style("File could not be re-read").red()),
        None => format!("  {}", style("All dates agree").green()),
    };
    term.write_line(&status).ok();

    Ok(())
}

fn print_pretty_results(
    term: &Term,
    rows: &[&ImageRecord],
    summary: &ScanSummary,
    filter_tag: DateTag,
    threshold: u32,
) {
    term.write_line(&format!(
        "{} Scan {}",
        style("✓").green().bold(),
        if summary.cancelled { "Cancelled" } else { "Complete" }
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!("  {} photos scanned", style(summary.processed).cyan()))
        .ok();
    term.write_line(&format!(
        "  {} with dates more than {} days apart",
        style(summary.with_discrepancy).cyan(),
        threshold
    ))
    .ok();
    if summary.problematic > 0 {
        term.write_line(&format!(
            "  {} could not be opened",
            style(summary.problematic).red()
        ))
        .ok();
    }
    term.write_line("").ok();

    for record in rows {
        let marker = if record.problematic {
            style("✗").red().to_string()
        } else if record.discrepancy.is_some() {
            style("!").yellow().bold().to_string()
        } else {
            style("○").dim().to_string()
        };
        let has_tag = if record.is_missing(filter_tag) {
            style("no").red().to_string()
        } else {
            style("yes").green().to_string()
        };

        term.write_line(&format!(
            "  {} {}  {}: {}",
            marker,
            display_path(&record.path),
            style(filter_tag).dim(),
            has_tag
        ))
        .ok();

        if let Some(discrepancy) = record.discrepancy {
            term.write_line(&format!("      {}", style(discrepancy).yellow()))
                .ok();
        }
    }
}

fn print_json_results(
    rows: &[&ImageRecord],
    summary: &ScanSummary,
    filter_tag: DateTag,
    threshold: u32,
) {
    let output = serde_json::json!({
        "processed": summary.processed,
        "problematic": summary.problematic,
        "with_discrepancy": summary.with_discrepancy,
        "cancelled": summary.cancelled,
        "threshold_days": threshold,
        "filter_tag": filter_tag,
        "photos": rows.iter().map(|r| {
            serde_json::json!({
                "path": r.path,
                "problematic": r.problematic,
                "fields": r.fields.iter()
                    .map(|(tag, value)| (tag.name().to_string(), serde_json::Value::from(value)))
                    .collect::<serde_json::Map<_, _>>(),
                "discrepancy": r.discrepancy,
            })
        }).collect::<Vec<_>>()
    });

    println!("{output:#}");
}

fn print_minimal_results(rows: &[&ImageRecord]) {
    for record in rows {
        println!("{}", record.path.display());
    }
}

fn display_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| path.strip_prefix(home).ok().map(|p| format!("~/{}", p.display())))
        .unwrap_or_else(|| path.display().to_string())
}
