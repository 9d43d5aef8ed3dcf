// WHY: documents are independent, so they fan out over a bounded worker pool; results are gathered
// in discovery order so the candidate list, and with it the seeded selection, does not depend on
// scheduling

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::analysis::{Analyzer, DisagreementRecord, DocumentAnalysis, RunSummary};
use crate::config::GoldConfig;
use crate::discovery::{collect_pairs, DiscoveryConfig, FilePair};
use crate::error::{GoldError, SkipKind};
use crate::export::{ExportContext, GoldDataset};
use crate::pairing::method_file_path;
use crate::progress::ProgressReporter;
use crate::reader::AsyncFileReader;
use crate::reference::{AnnotationReference, ReferenceSet};
use crate::sampler::{all, prioritized, GoldExample, Sampler};

/// How retained records become dataset examples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Seeded, balanced across strata
    #[default]
    Stratified,
    /// High-priority kinds first, in discovery order
    Prioritized,
    /// Every retained record
    All,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub root_dir: PathBuf,
    pub output: PathBuf,
    /// Concurrent documents; `None` uses `min(num_cpus, 8)`
    pub jobs: Option<usize>,
    pub selection: SelectionMode,
    pub show_progress: bool,
}

impl PipelineOptions {
    pub fn new(root_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            output: output.into(),
            jobs: None,
            selection: SelectionMode::default(),
            show_progress: false,
        }
    }

    fn worker_count(&self) -> usize {
        self.jobs.unwrap_or_else(|| num_cpus::get().min(8)).max(1)
    }
}

/// Discover, analyze, select and export; returns the run summary written to the dataset
pub async fn run(config: GoldConfig, options: &PipelineOptions) -> Result<RunSummary> {
    config.validate()?;
    let config = Arc::new(config);

    let references = Arc::new(ReferenceSet::from_config(&config).context("Failed to initialize reference methods")?);
    let analyzer = Arc::new(Analyzer::new(Arc::clone(&config), references)?);

    let discovery_config = DiscoveryConfig {
        primary_method: config.dataset.primary_method.clone(),
    };
    info!("Starting pair discovery in: {}", options.root_dir.display());
    let mut pairs = collect_pairs(&options.root_dir, discovery_config).await?;
    if pairs.is_empty() {
        anyhow::bail!(
            "No *_{}.txt files found under {}",
            config.dataset.primary_method,
            options.root_dir.display()
        );
    }

    let mut summary = RunSummary {
        pairs_discovered: pairs.len(),
        ..RunSummary::default()
    };

    let mut sampler = Sampler::new(config.dataset.seed);
    if let Some(max_files) = config.dataset.max_files {
        pairs = sampler.select_files(&pairs, max_files);
        info!("Limited run to {} of {} pairs", pairs.len(), summary.pairs_discovered);
    }

    let records = analyze_pairs(&analyzer, pairs, options, &mut summary).await;
    info!(
        "Analysis complete: {} documents, {} chunks compared, {} disagreements retained",
        summary.documents_analyzed, summary.chunks_compared, summary.records_retained
    );

    let target_size = config.dataset.target_size;
    let examples: Vec<GoldExample> = match options.selection {
        SelectionMode::Stratified => sampler.sample(records, target_size),
        SelectionMode::Prioritized => prioritized(records, target_size),
        SelectionMode::All => all(records),
    };
    summary.examples_selected = examples.len();
    info!("Selected {} examples ({:?})", examples.len(), options.selection);

    let context = ExportContext {
        root_dir: &options.root_dir,
        seed: config.dataset.seed,
        primary_method: &config.dataset.primary_method,
        reference_methods: config.reference_names(),
        run_summary: summary.clone(),
    };
    GoldDataset::build(&examples, context)
        .write(&options.output)
        .await
        .with_context(|| format!("Failed to write {}", options.output.display()))?;

    Ok(summary)
}

/// Analyze every pair on the worker pool and fold the outcomes into `summary`
async fn analyze_pairs(
    analyzer: &Arc<Analyzer>,
    pairs: Vec<FilePair>,
    options: &PipelineOptions,
    summary: &mut RunSummary,
) -> Vec<DisagreementRecord> {
    let max_concurrent = options.worker_count();
    let semaphore = Arc::new(Semaphore::new(max_concurrent));
    let progress = Arc::new(if options.show_progress {
        ProgressReporter::new(true, pairs.len() as u64)
    } else {
        ProgressReporter::hidden()
    });
    info!("Analyzing {} documents with {} workers", pairs.len(), max_concurrent);

    let mut tasks = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let semaphore = Arc::clone(&semaphore);
        let analyzer = Arc::clone(analyzer);
        let progress = Arc::clone(&progress);

        let task = tokio::spawn(async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(e) => return (pair, Err(GoldError::Io(std::io::Error::other(e)))),
            };
            let result = analyze_pair(analyzer, &pair).await;
            progress.document_completed(&display_name(&pair.source));
            (pair, result)
        });
        tasks.push(task);
    }

    let mut records = Vec::new();
    for outcome in futures::future::join_all(tasks).await {
        match outcome {
            Ok((_, Ok(analysis))) => {
                summary.absorb(&analysis);
                records.extend(analysis.records);
            }
            Ok((pair, Err(e))) => {
                warn!("Skipping {}: {}", pair.source.display(), e);
                summary.record_skip(e.kind());
            }
            Err(e) => {
                warn!("Document task failed: {}", e);
                summary.record_skip(SkipKind::Io);
            }
        }
    }

    progress.finish();
    records
}

/// Read one pair and its annotation files, then run the CPU-bound analysis off the async workers
async fn analyze_pair(analyzer: Arc<Analyzer>, pair: &FilePair) -> crate::error::Result<DocumentAnalysis> {
    let reader = AsyncFileReader::default();
    let document = reader.read_document(&pair.source).await?;
    let primary = reader.read_tagged(&pair.primary).await?;

    let mut annotations = HashMap::new();
    let mut annotation_errors = 0;
    for name in analyzer.references().annotation_names() {
        let parsed = reader.read_tagged(method_file_path(&pair.source, &name)).await?;
        annotation_errors += parsed.errors.len();
        let reference = AnnotationReference::new(name.clone(), parsed, &analyzer.config().alignment);
        annotations.insert(name, reference);
    }

    let source = pair.source.clone();
    let mut analysis = tokio::task::spawn_blocking(move || analyzer.analyze(&source, &document, &primary, annotations))
        .await
        .map_err(|e| GoldError::Io(std::io::Error::other(e)))?;

    for _ in 0..annotation_errors {
        analysis.skip(SkipKind::ParseError);
    }
    Ok(analysis)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
