// WHY: the dataset file is read by people and by later evaluation scripts, so it carries enough
// metadata to reproduce and audit the selection without rerunning the build

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::analysis::RunSummary;
use crate::classifier::{DisagreementKind, Priority};
use crate::complexity::ComplexityTag;
use crate::document::Span;
use crate::error::Result;
use crate::sampler::GoldExample;

#[derive(Debug, Serialize)]
pub struct GoldDataset {
    pub metadata: DatasetMetadata,
    pub examples: Vec<ExportedExample>,
}

#[derive(Debug, Serialize)]
pub struct DatasetMetadata {
    pub total_examples: usize,
    pub seed: u64,
    pub primary_method: String,
    pub reference_methods: Vec<String>,
    pub kind_distribution: BTreeMap<DisagreementKind, usize>,
    pub tag_distribution: BTreeMap<ComplexityTag, usize>,
    pub comparison_method_distribution: BTreeMap<String, usize>,
    pub stratum_distribution: BTreeMap<String, usize>,
    pub high_priority_count: usize,
    pub run_summary: RunSummary,
    /// Unix seconds
    pub generated_at: u64,
    pub generator: String,
}

#[derive(Debug, Serialize)]
pub struct ExportedExample {
    pub id: String,
    pub original_text: String,
    pub sentences: BTreeMap<String, Vec<String>>,
    pub sentence_counts: BTreeMap<String, usize>,
    pub disagreement_kind: DisagreementKind,
    pub priority: Priority,
    pub complexity_tags: Vec<ComplexityTag>,
    pub comparison_method: String,
    pub stratum: String,
    pub source_file: String,
    pub span: Span,
    pub chunk_index: usize,
}

/// Run-level facts recorded alongside the examples
pub struct ExportContext<'a> {
    pub root_dir: &'a Path,
    pub seed: u64,
    pub primary_method: &'a str,
    pub reference_methods: Vec<String>,
    pub run_summary: RunSummary,
}

impl GoldDataset {
    pub fn build(examples: &[GoldExample], context: ExportContext<'_>) -> Self {
        let mut kind_distribution = BTreeMap::new();
        let mut tag_distribution = BTreeMap::new();
        let mut comparison_method_distribution = BTreeMap::new();
        let mut stratum_distribution = BTreeMap::new();
        let mut high_priority_count = 0;

        let exported: Vec<ExportedExample> = examples
            .iter()
            .map(|example| {
                let record = &example.record;
                *kind_distribution.entry(record.kind).or_insert(0) += 1;
                for tag in &record.tags {
                    *tag_distribution.entry(*tag).or_insert(0) += 1;
                }
                *comparison_method_distribution
                    .entry(record.comparison_method.clone())
                    .or_insert(0) += 1;
                let stratum = example.stratum.to_string();
                *stratum_distribution.entry(stratum.clone()).or_insert(0) += 1;
                if record.kind.priority() == Priority::High {
                    high_priority_count += 1;
                }

                let source_file = record
                    .source_file
                    .strip_prefix(context.root_dir)
                    .unwrap_or(&record.source_file)
                    .display()
                    .to_string();

                ExportedExample {
                    id: format!("gold_{:04}", example.id),
                    original_text: record.original_text.clone(),
                    sentence_counts: record.sentences.iter().map(|(m, s)| (m.clone(), s.len())).collect(),
                    sentences: record.sentences.clone(),
                    disagreement_kind: record.kind,
                    priority: record.kind.priority(),
                    complexity_tags: record.tags.iter().copied().collect(),
                    comparison_method: record.comparison_method.clone(),
                    stratum,
                    source_file,
                    span: record.span,
                    chunk_index: record.chunk_index,
                }
            })
            .collect();

        let generated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            metadata: DatasetMetadata {
                total_examples: exported.len(),
                seed: context.seed,
                primary_method: context.primary_method.to_string(),
                reference_methods: context.reference_methods,
                kind_distribution,
                tag_distribution,
                comparison_method_distribution,
                stratum_distribution,
                high_priority_count,
                run_summary: context.run_summary,
                generated_at,
                generator: format!("seams-gold {}", env!("CARGO_PKG_VERSION")),
            },
            examples: exported,
        }
    }

    /// Write as pretty-printed JSON
    pub async fn write(&self, output: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).map_err(std::io::Error::from)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(output).await?;
        file.write_all(&json).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;

        info!("Exported {} examples to {}", self.examples.len(), output.display());
        Ok(())
    }
}
