use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, Level};

use seams_gold::{GoldConfig, PipelineOptions, RunSummary, SelectionMode};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Selection {
    /// Balanced across disagreement kind, complexity tags and comparison method
    Stratified,
    /// High-priority disagreements first, in discovery order
    Prioritized,
}

#[derive(Parser, Debug)]
#[command(name = "seams-gold")]
#[command(about = "Builds a sentence-boundary disagreement dataset from seams output and reference segmenters")]
#[command(version)]
struct Args {
    /// Root directory to scan for *_<primary>.txt files
    root_dir: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset output path
    #[arg(long, default_value = "gold_set.json")]
    output: PathBuf,

    /// Number of examples to select
    #[arg(long)]
    target_size: Option<usize>,

    /// Random seed for file and example selection
    #[arg(long)]
    seed: Option<u64>,

    /// Analyze at most this many file pairs
    #[arg(long)]
    max_files: Option<usize>,

    /// Primary method name (file suffix)
    #[arg(long)]
    primary: Option<String>,

    /// Concurrent documents (default: min(num_cpus, 8))
    #[arg(long)]
    jobs: Option<usize>,

    /// Example selection strategy
    #[arg(long, value_enum, default_value_t = Selection::Stratified)]
    selection: Selection,

    /// Export every retained disagreement, ignoring the target size
    #[arg(long)]
    export_all: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Debug-level logging
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn load_config(&self) -> Result<GoldConfig> {
        let mut config = match &self.config {
            Some(path) => GoldConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => GoldConfig::default(),
        };

        // WHY: command-line flags override file values
        if let Some(target_size) = self.target_size {
            config.dataset.target_size = target_size;
        }
        if let Some(seed) = self.seed {
            config.dataset.seed = seed;
        }
        if let Some(max_files) = self.max_files {
            config.dataset.max_files = Some(max_files);
        }
        if let Some(primary) = &self.primary {
            config.dataset.primary_method = primary.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn selection_mode(&self) -> SelectionMode {
        match (self.export_all, self.selection) {
            (true, _) => SelectionMode::All,
            (false, Selection::Stratified) => SelectionMode::Stratified,
            (false, Selection::Prioritized) => SelectionMode::Prioritized,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // WHY: structured JSON logging on stderr keeps stdout for the run summary
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!("Starting seams-gold");
    info!(?args, "Parsed CLI arguments");

    if !args.root_dir.exists() {
        anyhow::bail!("Root directory does not exist: {}", args.root_dir.display());
    }
    if !args.root_dir.is_dir() {
        anyhow::bail!("Root path is not a directory: {}", args.root_dir.display());
    }

    let config = args.load_config()?;
    let options = PipelineOptions {
        root_dir: args.root_dir.clone(),
        output: args.output.clone(),
        jobs: args.jobs,
        selection: args.selection_mode(),
        show_progress: !args.no_progress,
    };

    let summary = seams_gold::run(config, &options).await?;
    print_summary(&summary, &options);

    Ok(())
}

fn print_summary(summary: &RunSummary, options: &PipelineOptions) {
    println!("seams-gold v{} - dataset complete", env!("CARGO_PKG_VERSION"));
    println!("  File pairs discovered: {}", summary.pairs_discovered);
    println!("  Documents analyzed: {}", summary.documents_analyzed);
    println!("  Chunks compared: {}", summary.chunks_compared);
    println!("  Regions filtered: {}", summary.regions_filtered);
    println!("  Disagreements retained: {}", summary.records_retained);
    println!("  Examples selected: {}", summary.examples_selected);
    if summary.total_skipped() > 0 {
        println!("  Skipped:");
        for (kind, count) in &summary.skipped {
            println!("    {}: {count}", kind.as_str());
        }
    }
    println!("  Output: {}", options.output.display());

    info!(
        documents = summary.documents_analyzed,
        retained = summary.records_retained,
        selected = summary.examples_selected,
        skipped = summary.total_skipped(),
        "Run complete"
    );
}
