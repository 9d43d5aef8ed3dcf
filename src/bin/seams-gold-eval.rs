// Gold-set evaluation utility
// Scores the configured reference segmenters against an exported gold_set.json, per complexity tag

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};

use seams_gold::evaluation::TagMetrics;
use seams_gold::reference::ReferenceSet;
use seams_gold::{DatasetFile, EvaluationReport, Evaluator, GoldConfig};

#[derive(Parser, Debug)]
#[command(name = "seams-gold-eval")]
#[command(about = "Scores reference segmenters against an exported gold set")]
#[command(version)]
struct Args {
    /// Dataset written by seams-gold
    gold_set: PathBuf,

    /// TOML configuration whose [[references]] are evaluated
    #[arg(long)]
    config: Option<PathBuf>,

    /// Method whose sentences count as correct (default: the dataset's primary method)
    #[arg(long)]
    gold_method: Option<String>,

    /// Write the per-tag results as JSON
    #[arg(long)]
    output: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = match &args.config {
        Some(path) => GoldConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => GoldConfig::default(),
    };
    config.validate()?;

    let dataset = DatasetFile::load(&args.gold_set)
        .await
        .with_context(|| format!("Failed to read gold set {}", args.gold_set.display()))?;
    let references = ReferenceSet::from_config(&config)?;

    let report = Evaluator::new(references, args.gold_method.clone()).evaluate(&dataset);
    if report.metadata.methods.is_empty() {
        anyhow::bail!("No reference methods left to evaluate besides '{}'", report.metadata.gold_method);
    }
    print_report(&report);

    if let Some(output) = &args.output {
        report.write(output).await?;
        println!("\nResults exported to {}", output.display());
    }

    info!(
        examples = report.metadata.dataset_size,
        methods = report.metadata.methods.len(),
        "Evaluation finished"
    );
    Ok(())
}

fn print_report(report: &EvaluationReport) {
    println!("seams-gold-eval v{} - gold method '{}'", env!("CARGO_PKG_VERSION"), report.metadata.gold_method);
    println!(
        "  Examples: {} ({} without gold sentences)",
        report.metadata.dataset_size, report.metadata.examples_without_gold
    );

    for tag in &report.metadata.tags {
        println!("\n{}", tag.to_uppercase());
        print_header();
        for method in &report.metadata.methods {
            if let Some(metrics) = report.results.get(method).and_then(|r| r.by_tag.get(tag)) {
                print_row(method, metrics);
            }
        }
    }

    println!("\nOVERALL");
    print_header();
    for method in &report.metadata.methods {
        if let Some(results) = report.results.get(method) {
            print_row(method, &results.overall);
            if results.failed > 0 {
                println!("  {method}: {} examples could not be segmented", results.failed);
            }
        }
    }
}

fn print_header() {
    println!(
        "{:<15} {:<10} {:<10} {:<10} {:<8} {:<8} {:<8} {:<8}",
        "Method", "Precision", "Recall", "F1", "Correct", "Over", "Under", "Total"
    );
    println!("{}", "-".repeat(82));
}

fn print_row(method: &str, metrics: &TagMetrics) {
    println!(
        "{:<15} {:<10.3} {:<10.3} {:<10.3} {:<8} {:<8} {:<8} {:<8}",
        method,
        metrics.precision,
        metrics.recall,
        metrics.f1,
        metrics.correctly_segmented,
        metrics.over_segmented,
        metrics.under_segmented,
        metrics.gold_sentences
    );
}
