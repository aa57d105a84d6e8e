//! deltacode - Compare two file-inventory scans.
//!
//! Usage:
//!   deltacode --new NEW.json --old OLD.json             Summary of changes
//!   deltacode -n NEW.json -o OLD.json --format json     Machine-readable report
//!   deltacode -n NEW.json -o OLD.json --all-deltas      List every change
//!   deltacode --help                                    Show help

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use deltacode_analyze::{DeltaCode, DeltaConfig, DeltaStatus};
use deltacode_core::Delta;
use deltacode_scan::{JsonScanLoader, ScanLoader};

#[derive(Parser)]
#[command(
    name = "deltacode",
    version,
    about = "Compare two file-inventory scans",
    long_about = "deltacode reconciles a new and an old scan of a codebase and \
                  classifies every file as added, removed, modified, unchanged \
                  or (with --detect-moves) moved."
)]
struct Cli {
    /// Scan report of the new codebase
    #[arg(short, long)]
    new: Option<PathBuf>,

    /// Scan report of the old codebase
    #[arg(short, long)]
    old: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Include every delta, not only the counters
    #[arg(short, long)]
    all_deltas: bool,

    /// Report files with identical content at a different path as moved
    #[arg(long)]
    detect_moves: bool,

    /// Leave directories out of the counters
    #[arg(long)]
    files_only: bool,

    /// Compare paths as scanned, without root alignment
    #[arg(long)]
    no_align: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    let loader = JsonScanLoader::new();
    let new = loader.load(cli.new.as_deref());
    let old = loader.load(cli.old.as_deref());

    let result = DeltaCode::with_config(new, old, config).context("Delta consistency check failed")?;

    let rendered = match cli.format {
        OutputFormat::Text => render_text(&result, cli.all_deltas),
        OutputFormat::Json => serde_json::to_string_pretty(&result.to_report(cli.all_deltas))?,
    };

    match cli.output {
        Some(output_path) => {
            std::fs::write(&output_path, rendered)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            eprintln!("Wrote {}", output_path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// File config first, then command-line overrides.
fn build_config(cli: &Cli) -> Result<DeltaConfig> {
    let mut config = match &cli.config {
        Some(path) => DeltaConfig::load(path)
            .with_context(|| format!("Invalid config file {}", path.display()))?,
        None => DeltaConfig::default(),
    };

    if cli.detect_moves {
        config.detect_moves = true;
    }
    if cli.files_only {
        config.count_directories = false;
    }
    if cli.no_align {
        config.align_paths = false;
    }
    Ok(config)
}

/// Render a human-readable summary.
fn render_text(result: &DeltaCode, all_deltas: bool) -> String {
    let mut out = String::new();
    let rule = "─".repeat(60);

    let Some(stats) = result.get_stats() else {
        out.push_str(" No comparison possible: ");
        out.push_str(&unavailable_reason(result));
        return out;
    };

    out.push_str(&format!("{rule}\n"));
    out.push_str(&format!(
        " new: {} ({} files)\n",
        display_source(result.new.source_path()),
        result.new.files_count.unwrap_or(0)
    ));
    out.push_str(&format!(
        " old: {} ({} files)\n",
        display_source(result.old.source_path()),
        result.old.files_count.unwrap_or(0)
    ));
    if let Some(alignment) = result.alignment().filter(|a| !a.is_identity()) {
        out.push_str(&format!(
            " aligned roots: new -{} / old -{} segments\n",
            alignment.new_strip, alignment.old_strip
        ));
    }
    out.push_str(&format!("{rule}\n"));

    let added_size = total_size(result, DeltaStatus::Added, |d| d.new_file.as_ref().map(|f| f.size));
    let removed_size = total_size(result, DeltaStatus::Removed, |d| d.old_file.as_ref().map(|f| f.size));

    out.push_str(&format!("   {:<10} {:>8}  {}\n", "added", stats.added, format_size(added_size)));
    out.push_str(&format!("   {:<10} {:>8}\n", "modified", stats.modified));
    out.push_str(&format!("   {:<10} {:>8}  {}\n", "removed", stats.removed, format_size(removed_size)));
    out.push_str(&format!("   {:<10} {:>8}\n", "unchanged", stats.unchanged));
    if let Some(moved) = stats.moved {
        out.push_str(&format!("   {:<10} {:>8}\n", "moved", moved));
    }
    out.push_str(&format!("{rule}\n"));
    let listed = result.deltas.as_ref().map_or(0, Vec::len);
    out.push_str(&format!(" {listed} deltas"));
    if stats.total() != listed {
        out.push_str(&format!(" ({} counted)", stats.total()));
    }

    if all_deltas {
        out.push('\n');
        for delta in result.deltas.iter().flatten() {
            if delta.status != DeltaStatus::Unchanged {
                out.push('\n');
                out.push_str(&format_delta(delta));
            }
        }
    }

    out
}

fn unavailable_reason(result: &DeltaCode) -> String {
    let side = |label: &str, available: bool, path: &Path| {
        (!available).then(|| format!("{label} scan '{}' could not be loaded", display_source(path)))
    };
    [
        side("new", result.new.is_available(), result.new.source_path()),
        side("old", result.old.is_available(), result.old.source_path()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("; ")
}

fn format_delta(delta: &Delta) -> String {
    let path = |f: &Option<deltacode_core::FileRecord>| {
        f.as_ref().map(|f| f.original_path.to_string()).unwrap_or_default()
    };
    let status: &'static str = delta.status.into();
    match delta.status {
        DeltaStatus::Moved => format!(
            "   {status:<10} {} -> {}",
            path(&delta.old_file),
            path(&delta.new_file)
        ),
        DeltaStatus::Removed => format!("   {status:<10} {}", path(&delta.old_file)),
        _ => format!("   {status:<10} {}", path(&delta.new_file)),
    }
}

fn total_size(result: &DeltaCode, status: DeltaStatus, size: impl Fn(&Delta) -> Option<u64>) -> u64 {
    result
        .deltas_with_status(status)
        .filter(|d| !d.is_dir())
        .filter_map(size)
        .sum()
}

fn display_source(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        "<none>".to_string()
    } else {
        path.display().to_string()
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
