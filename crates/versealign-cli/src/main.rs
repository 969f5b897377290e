use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use versealign_lib::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_PREFIX};
use versealign_lib::{check_alignment_files, inspect, CorpusBuilder, CorpusConfig, InspectError, OutputConfig};

#[derive(Parser)]
#[command(name = "versealign")]
#[command(version = "0.1.0")]
#[command(about = "Build line-synchronized parallel corpora and inspect word alignments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build source/target token files from a parallel table
    Build {
        /// Delimited table with a header row (CSV or TSV)
        #[arg(short, long)]
        table: PathBuf,

        /// Header of the source-language column
        #[arg(short, long)]
        source_col: String,

        /// Header of the target-language column
        #[arg(short = 'c', long)]
        target_col: String,

        /// Output directory
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Filename prefix for `source.txt` / `target.txt`
        #[arg(short, long, default_value = DEFAULT_PREFIX)]
        prefix: String,

        /// Field delimiter (inferred from the extension when omitted)
        #[arg(short, long)]
        delimiter: Option<char>,
    },

    /// Show the word alignments of one verse
    Inspect {
        /// Source token file
        source: PathBuf,

        /// Target token file
        target: PathBuf,

        /// Alignment file (Pharaoh `i-j` pairs, one line per verse)
        align: PathBuf,

        /// 0-based verse index
        index: usize,
    },

    /// Check that source, target, and alignment files are line-synchronized
    Check {
        /// Source token file
        source: PathBuf,

        /// Target token file
        target: PathBuf,

        /// Alignment file
        align: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing: use RUST_LOG if set, otherwise default to info
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { table, source_col, target_col, output_dir, prefix, delimiter } => {
            build_command(table, source_col, target_col, output_dir, prefix, delimiter)
        }
        Commands::Inspect { source, target, align, index } => inspect_command(source, target, align, index),
        Commands::Check { source, target, align } => check_command(source, target, align),
    }
}

/// Build the aligned corpus from a table
fn build_command(
    table: PathBuf,
    source_col: String,
    target_col: String,
    output_dir: PathBuf,
    prefix: String,
    delimiter: Option<char>,
) -> anyhow::Result<ExitCode> {
    info!("Building aligned corpus...");

    let delimiter = match delimiter {
        Some(d) if d.is_ascii() => Some(d as u8),
        Some(d) => anyhow::bail!("Delimiter {:?} must be an ASCII character", d),
        None => None,
    };

    let mut config = CorpusConfig::new(&table, &source_col, &target_col).map_err(|e| anyhow::anyhow!("{}", e))?;
    config.delimiter = delimiter;
    config.output = OutputConfig { output_dir, prefix };

    let (outcome, paths) = CorpusBuilder::new()
        .build_from_table(&config)
        .with_context(|| format!("Failed to build corpus from {}", table.display()))?;

    if outcome.corpus.is_empty() {
        warn!("No verse pairs were retained; {} and {} are empty", paths.source.display(), paths.target.display());
    }
    info!("Corpus built successfully!");

    Ok(ExitCode::SUCCESS)
}

/// Print the alignment report of one verse
fn inspect_command(source: PathBuf, target: PathBuf, align: PathBuf, index: usize) -> anyhow::Result<ExitCode> {
    match inspect(&source, &target, &align, index) {
        Ok(report) => {
            print!("{}", report.render());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_reportable() => {
            eprintln!("Error: {e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e @ InspectError::Io(_)) => Err(e).context("Failed to read alignment inputs"),
        Err(e) => Err(e).with_context(|| format!("Inconsistent alignment data for verse {index}")),
    }
}

/// Check synchronization of the three files
fn check_command(source: PathBuf, target: PathBuf, align: PathBuf) -> anyhow::Result<ExitCode> {
    info!("Checking synchronization...");
    info!("  Source: {}", source.display());
    info!("  Target: {}", target.display());
    info!("  Alignment: {}", align.display());

    let report = match check_alignment_files(&source, &target, &align) {
        Ok(report) => report,
        Err(e) if e.is_reportable() => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("Failed to read alignment inputs"),
    };
    report.print_summary();

    if !report.counts_match() {
        warn!(
            "LINE COUNT MISMATCH! source = {}, target = {}, alignment = {}",
            report.line_counts[0], report.line_counts[1], report.line_counts[2]
        );
    }
    for problem in &report.problems {
        warn!("  {}", problem);
    }
    if report.problem_verses > report.problems.len() {
        warn!("  ... ({} more verses with problems)", report.problem_verses - report.problems.len());
    }

    if report.is_consistent() {
        info!("All {} verses are synchronized", report.verses_checked);
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("SYNCHRONIZATION CHECK FAILED!");
        Ok(ExitCode::FAILURE)
    }
}
