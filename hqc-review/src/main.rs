//! hqc-review - manual QC of rat brain histology predictions
//!
//! Samples raw scans for one subject per region and hemisphere, pairs each
//! with its object-prediction mask, then records a reviewer score per pair
//! into `<subject>_QC_Scores.csv`.

use anyhow::{Context, Result};
use clap::Parser;
use hqc_common::config::{resolve_vocabulary_path, TomlConfig};
use hqc_common::logging::init_tracing;
use hqc_review::console::run_console;
use hqc_review::diagnostics::{diagnose_filename, selection_plan};
use hqc_review::services::{FileScanner, GroupedImages, RegionVocabulary};
use hqc_review::{CsvScoreSheet, PairingPipeline, ReviewSession};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{info, warn};

/// Command-line arguments for hqc-review
#[derive(Parser, Debug)]
#[command(name = "hqc-review")]
#[command(about = "Sample and score histology prediction masks for one subject")]
#[command(version)]
struct Args {
    /// Folder holding raw scans and prediction masks
    #[arg(short, long, env = "HQC_FOLDER")]
    folder: PathBuf,

    /// Subject identifier contained in filenames (e.g. Rat461707)
    #[arg(short, long, env = "HQC_SUBJECT")]
    subject: String,

    /// Config file (overrides HQC_CONFIG and the per-user config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Region vocabulary table (overrides HQC_VOCABULARY and the config)
    #[arg(long)]
    vocabulary: Option<PathBuf>,

    /// Images sampled per hemisphere per region
    #[arg(long)]
    samples_per_hemisphere: Option<usize>,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Score sheet path (default: <folder>/<subject>_QC_Scores.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the resolved pair list to a JSON file before reviewing
    #[arg(long, value_name = "FILE")]
    export_pairs: Option<PathBuf>,

    /// Show filename tokenization and the selection plan, then exit
    #[arg(long)]
    diagnose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, config_source) =
        TomlConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(n) = args.samples_per_hemisphere {
        config.samples_per_hemisphere = n;
        config.validate()?;
    }

    init_tracing(&config.logging)?;

    info!(
        "Starting hqc-review v{} [{}] ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE")
    );
    config_source.log();

    // Vocabulary failures end the session before any discovery
    let vocabulary_path = resolve_vocabulary_path(args.vocabulary.as_deref(), &config);
    let vocabulary = RegionVocabulary::load(&vocabulary_path, config.vocabulary_has_header)
        .context("Cannot start review without a region vocabulary")?;
    info!("Targeting regions: {:?}", vocabulary.labels());

    let pipeline = PairingPipeline::new(vocabulary, &config);

    if args.diagnose {
        return diagnose(&pipeline, &args);
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let report = pipeline
        .run(&args.folder, &args.subject, &mut rng)
        .context("Image discovery failed")?;

    if report.no_files_found() {
        warn!(
            "No raw images for {} in {}. Nothing to review.",
            args.subject,
            args.folder.display()
        );
        return Ok(());
    }

    if let Some(path) = &args.export_pairs {
        report
            .write_json(path)
            .with_context(|| format!("Failed to export pairs to {}", path.display()))?;
    }

    if report.pairs.is_empty() {
        info!("No valid pairs found.");
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| CsvScoreSheet::default_path(&args.folder, &args.subject));
    let mut sheet = CsvScoreSheet::new(output);

    let mut session = ReviewSession::new(args.subject.clone(), report.pairs);
    let stdin = std::io::stdin();
    run_console(&mut session, &mut sheet, stdin.lock(), std::io::stdout())?;

    info!(
        "{} of {} pairs scored",
        session.results().len(),
        session.total()
    );
    if !session.results().is_empty() {
        info!("File saved: {}", sheet.path().display());
    }

    Ok(())
}

/// Print tokenization of the first discovered file and the selection plan
fn diagnose(pipeline: &PairingPipeline, args: &Args) -> Result<()> {
    let files = pipeline
        .scanner()
        .discover(&args.folder, &args.subject)
        .context("Image discovery failed")?;

    if files.is_empty() {
        println!("No raw images found for {} in {}", args.subject, args.folder.display());
        println!("First entries in the folder, for reference:");
        for name in FileScanner::sample_entries(&args.folder, 5)? {
            println!("  {}", name);
        }
        return Ok(());
    }

    println!("Found {} raw images.\n", files.len());

    let first_name = files[0]
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("{}\n", diagnose_filename(&first_name, pipeline.vocabulary()));

    let grouped = GroupedImages::build(files, pipeline.vocabulary());
    println!(
        "{} images excluded (region or hemisphere not recognized)",
        grouped.unresolved.len()
    );

    let plan = selection_plan(&grouped, pipeline.samples_per_hemisphere());
    let total: usize = plan.iter().map(|p| p.rh_selected + p.lh_selected).sum();
    for region in &plan {
        println!("{}", region);
    }
    println!("\nTotal to be selected: {}", total);

    Ok(())
}
