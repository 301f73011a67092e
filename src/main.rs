// src/main.rs
use clap::Parser;
use numcheck::compare;
use numcheck::filters::load_filters;
use numcheck::storage::ArtifactStore;
use numcheck::utils::{self, AppError, CompareError};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command Line Interface for tolerance-aware output comparison
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with the list of filters to apply
    #[arg(short, long)]
    filters: PathBuf,

    /// Output produced by the program under test
    actual: PathBuf,

    /// Reference output to compare against
    reference: PathBuf,

    /// Print the full diff when the comparison fails (also NUMCHECK_VERBOSE=1)
    #[arg(short, long)]
    verbose: bool,

    /// Also write <actual>.summary.json
    #[arg(long)]
    summary: bool,
}

fn verbose_from_env() -> bool {
    std::env::var("NUMCHECK_VERBOSE")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn run(args: &Args) -> Result<(), AppError> {
    let verbose = args.verbose || verbose_from_env();
    tracing::debug!("Verbose diff output: {}", verbose);

    let filters = load_filters(&args.filters)?;

    if args.summary {
        // The summary is written on both outcomes, so split compare and verdict.
        let report = compare::compare_files(&filters, &args.actual, &args.reference)?;
        ArtifactStore::for_output(&args.actual).save_summary(&report, &args.reference)?;
        compare::verdict(&args.actual.display().to_string(), report, verbose)?;
        return Ok(());
    }

    compare::check(&filters, &args.actual, &args.reference, verbose)?;
    Ok(())
}

fn main() -> ExitCode {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting comparison for args: {:?}", args);

    match run(&args) {
        Ok(()) => {
            println!("PASSED: {}", args.actual.display());
            ExitCode::SUCCESS
        }
        Err(AppError::Compare(e @ CompareError::TestFailed { .. })) => {
            eprintln!("ERROR: {}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            // Broken filters and I/O problems are not test failures.
            tracing::error!("{}", e);
            eprintln!("ERROR: {}", e);
            ExitCode::from(2)
        }
    }
}
