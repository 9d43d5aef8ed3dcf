// WHY: an exported dataset is only useful once segmenters are scored against it; scoring reads the
// same JSON the exporter writes and reports per complexity tag so regressions on dialog or
// abbreviations are not hidden by plain prose

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::complexity::ComplexityTag;
use crate::error::Result;
use crate::normalization::normalize_whitespace;
use crate::reference::{ReferenceSet, ReferenceSource};

/// Bucket for examples that carry no complexity tag
pub const PLAIN_TAG: &str = "plain";

/// The parts of an exported dataset that scoring needs
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetFile {
    pub metadata: DatasetHeader,
    pub examples: Vec<DatasetExample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetHeader {
    pub primary_method: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetExample {
    pub id: String,
    pub original_text: String,
    pub sentences: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub complexity_tags: Vec<ComplexityTag>,
}

impl DatasetFile {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let dataset: Self = serde_json::from_str(&content).map_err(std::io::Error::from)?;
        info!("Loaded {} examples from {}", dataset.examples.len(), path.display());
        Ok(dataset)
    }
}

/// Segmentation outcome counts for one example or an aggregate of them
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    pub gold_sentences: usize,
    pub predicted_sentences: usize,
    /// Gold sentences produced exactly
    pub correct: usize,
    /// Gold sentences cut into pieces
    pub over_segmented: usize,
    /// Gold sentences merged into a longer segment
    pub under_segmented: usize,
}

/// Compare predicted segments with gold sentences after whitespace normalization
pub fn score<G: AsRef<str>, P: AsRef<str>>(gold: &[G], predicted: &[P]) -> Tally {
    let predicted: Vec<String> = predicted
        .iter()
        .map(|s| normalize_whitespace(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect();
    let exact: HashSet<&str> = predicted.iter().map(String::as_str).collect();

    let mut tally = Tally { predicted_sentences: predicted.len(), ..Tally::default() };
    for sentence in gold {
        let sentence = normalize_whitespace(sentence.as_ref());
        if sentence.is_empty() {
            continue;
        }
        tally.gold_sentences += 1;
        if exact.contains(sentence.as_str()) {
            tally.correct += 1;
        } else if predicted.iter().any(|segment| segment.contains(sentence.as_str())) {
            tally.under_segmented += 1;
        } else {
            tally.over_segmented += 1;
        }
    }
    tally
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagMetrics {
    pub examples: usize,
    pub gold_sentences: usize,
    pub predicted_sentences: usize,
    pub correctly_segmented: usize,
    pub over_segmented: usize,
    pub under_segmented: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl TagMetrics {
    fn record(&mut self, tally: &Tally) {
        self.examples += 1;
        self.gold_sentences += tally.gold_sentences;
        self.predicted_sentences += tally.predicted_sentences;
        self.correctly_segmented += tally.correct;
        self.over_segmented += tally.over_segmented;
        self.under_segmented += tally.under_segmented;
        self.refresh();
    }

    fn refresh(&mut self) {
        // duplicate gold sentences may match the same predicted segment
        let matched = self.correctly_segmented.min(self.predicted_sentences) as f64;
        self.precision = ratio(matched, self.predicted_sentences);
        self.recall = ratio(self.correctly_segmented as f64, self.gold_sentences);
        self.f1 = if self.precision + self.recall > 0.0 {
            2.0 * self.precision * self.recall / (self.precision + self.recall)
        } else {
            0.0
        };
    }
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MethodResults {
    pub by_tag: BTreeMap<String, TagMetrics>,
    pub overall: TagMetrics,
    /// Examples the method could not segment
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationMetadata {
    pub dataset_size: usize,
    pub gold_method: String,
    pub methods: Vec<String>,
    pub tags: Vec<String>,
    /// Examples with no sentences from the gold method
    pub examples_without_gold: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub metadata: EvaluationMetadata,
    pub results: BTreeMap<String, MethodResults>,
}

impl EvaluationReport {
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

        info!("Exported evaluation of {} methods to {}", self.results.len(), output.display());
        Ok(())
    }
}

/// Scores reference methods against one method's sentences in an exported dataset
pub struct Evaluator {
    references: ReferenceSet,
    gold_method: Option<String>,
}

impl Evaluator {
    /// `gold_method` defaults to the dataset's primary method
    pub fn new(references: ReferenceSet, gold_method: Option<String>) -> Self {
        Self { references, gold_method }
    }

    pub fn evaluate(&self, dataset: &DatasetFile) -> EvaluationReport {
        let gold_method = self
            .gold_method
            .clone()
            .unwrap_or_else(|| dataset.metadata.primary_method.clone());
        let methods: Vec<String> = self.references.names().into_iter().filter(|name| *name != gold_method).collect();

        let mut results: BTreeMap<String, MethodResults> =
            methods.iter().map(|name| (name.clone(), MethodResults::default())).collect();
        let mut tags = BTreeSet::new();
        let mut examples_without_gold = 0;

        for example in &dataset.examples {
            let Some(gold) = example.sentences.get(&gold_method).filter(|s| !s.is_empty()) else {
                warn!("Example {} has no '{}' sentences", example.id, gold_method);
                examples_without_gold += 1;
                continue;
            };
            let buckets = tag_buckets(&example.complexity_tags);
            tags.extend(buckets.iter().cloned());

            for reference in self.references.iter().filter(|r| r.name != gold_method) {
                let Some(method_results) = results.get_mut(&reference.name) else {
                    continue;
                };
                let Some(predicted) = predicted_sentences(&reference.source, &reference.name, example) else {
                    method_results.failed += 1;
                    continue;
                };

                let tally = score(gold, &predicted);
                debug!(example = %example.id, method = %reference.name, ?tally, "Scored example");
                for bucket in &buckets {
                    method_results.by_tag.entry(bucket.clone()).or_default().record(&tally);
                }
                method_results.overall.record(&tally);
            }
        }

        info!(
            examples = dataset.examples.len(),
            methods = methods.len(),
            without_gold = examples_without_gold,
            "Evaluation complete"
        );

        EvaluationReport {
            metadata: EvaluationMetadata {
                dataset_size: dataset.examples.len(),
                gold_method,
                methods,
                tags: tags.into_iter().collect(),
                examples_without_gold,
            },
            results,
        }
    }
}

fn tag_buckets(tags: &[ComplexityTag]) -> Vec<String> {
    if tags.is_empty() {
        return vec![PLAIN_TAG.to_string()];
    }
    let mut buckets: Vec<String> = tags.iter().map(|t| t.as_str().to_string()).collect();
    buckets.sort();
    buckets.dedup();
    buckets
}

/// Live methods segment the example text; annotation methods reuse the sentences the dataset stored
fn predicted_sentences(source: &ReferenceSource, name: &str, example: &DatasetExample) -> Option<Vec<String>> {
    match source {
        ReferenceSource::Live(segmenter) => match segmenter.segment(&example.original_text) {
            Ok(sentences) => Some(sentences),
            Err(e) => {
                warn!("Segmenter '{}' failed on {}: {}", segmenter.name(), example.id, e);
                None
            }
        },
        ReferenceSource::Annotation => {
            let stored = example.sentences.get(name).filter(|s| !s.is_empty()).cloned();
            if stored.is_none() {
                warn!("Example {} stores no '{}' sentences", example.id, name);
            }
            stored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GoldConfig, ReferenceConfig, ReferenceKind};
    use tempfile::TempDir;

    fn example(id: &str, text: &str, gold: &[&str], tags: &[ComplexityTag]) -> DatasetExample {
        let mut sentences = BTreeMap::new();
        sentences.insert("seams".to_string(), gold.iter().map(|s| s.to_string()).collect());
        DatasetExample {
            id: id.to_string(),
            original_text: text.to_string(),
            sentences,
            complexity_tags: tags.to_vec(),
        }
    }

    fn dataset(examples: Vec<DatasetExample>) -> DatasetFile {
        DatasetFile {
            metadata: DatasetHeader { primary_method: "seams".to_string() },
            examples,
        }
    }

    fn uax29_only() -> ReferenceSet {
        let mut config = GoldConfig::default();
        config.references = vec![ReferenceConfig::new("uax29", ReferenceKind::Uax29)];
        ReferenceSet::from_config(&config).unwrap()
    }

    #[test]
    fn test_score_counts_each_outcome() {
        let gold = ["It rained.", "We stayed in.", "Mr. Brown called."];
        let predicted = ["It rained. We stayed in.", "Mr.", "Brown called."];
        let tally = score(&gold, &predicted);

        assert_eq!(tally.gold_sentences, 3);
        assert_eq!(tally.predicted_sentences, 3);
        assert_eq!(tally.correct, 0);
        assert_eq!(tally.under_segmented, 2);
        assert_eq!(tally.over_segmented, 1);
    }

    #[test]
    fn test_score_ignores_whitespace_differences() {
        let tally = score(&["The road went\non."], &["The road went  on."]);
        assert_eq!(tally.correct, 1);
        assert_eq!(tally.over_segmented + tally.under_segmented, 0);
    }

    #[test]
    fn test_metrics_from_tallies() {
        let mut metrics = TagMetrics::default();
        metrics.record(&Tally { gold_sentences: 2, predicted_sentences: 4, correct: 2, ..Tally::default() });
        metrics.record(&Tally { gold_sentences: 2, predicted_sentences: 1, under_segmented: 2, ..Tally::default() });

        assert_eq!(metrics.examples, 2);
        assert!((metrics.precision - 0.4).abs() < 1e-9);
        assert!((metrics.recall - 0.5).abs() < 1e-9);
        assert!((metrics.f1 - 4.0 / 9.0).abs() < 1e-9);

        let empty = TagMetrics::default();
        assert_eq!(empty.f1, 0.0);
    }

    #[test]
    fn test_evaluate_groups_by_tag() {
        let data = dataset(vec![
            example("gold_0000", "It rained. We stayed in.", &["It rained.", "We stayed in."], &[]),
            example(
                "gold_0001",
                "\u{201C}Go home,\u{201D} she said. He went.",
                &["\u{201C}Go home,\u{201D} she said.", "He went."],
                &[ComplexityTag::Dialog, ComplexityTag::DialogAttribution],
            ),
        ]);
        let report = Evaluator::new(uax29_only(), None).evaluate(&data);

        assert_eq!(report.metadata.gold_method, "seams");
        assert_eq!(report.metadata.methods, vec!["uax29".to_string()]);
        assert_eq!(report.metadata.tags, vec!["dialog", "dialog_attribution", PLAIN_TAG]);

        let uax29 = &report.results["uax29"];
        assert_eq!(uax29.by_tag[PLAIN_TAG].examples, 1);
        assert_eq!(uax29.by_tag[PLAIN_TAG].correctly_segmented, 2);
        assert_eq!(uax29.by_tag["dialog"].examples, 1);
        assert_eq!(uax29.overall.examples, 2);
        assert_eq!(uax29.overall.gold_sentences, 4);
        assert_eq!(uax29.failed, 0);
    }

    #[test]
    fn test_gold_method_is_not_scored_against_itself() {
        let mut ex = example("gold_0000", "One here. Two here.", &["One here. Two here."], &[]);
        ex.sentences.insert("spacy".to_string(), vec!["One here.".to_string(), "Two here.".to_string()]);

        let mut config = GoldConfig::default();
        config.references = vec![
            ReferenceConfig::new("uax29", ReferenceKind::Uax29),
            ReferenceConfig::new("spacy", ReferenceKind::Annotation),
        ];
        let references = ReferenceSet::from_config(&config).unwrap();
        let report = Evaluator::new(references, Some("spacy".to_string())).evaluate(&dataset(vec![ex]));

        assert_eq!(report.metadata.methods, vec!["uax29".to_string()]);
        assert!(!report.results.contains_key("spacy"));
        assert_eq!(report.results["uax29"].overall.correctly_segmented, 2);
    }

    #[test]
    fn test_missing_sentences_are_counted() {
        let mut config = GoldConfig::default();
        config.references = vec![ReferenceConfig::new("spacy", ReferenceKind::Annotation)];
        let references = ReferenceSet::from_config(&config).unwrap();

        let mut no_gold = example("gold_0001", "Alone.", &[], &[]);
        no_gold.sentences.clear();
        let data = dataset(vec![example("gold_0000", "Solo here.", &["Solo here."], &[]), no_gold]);
        let report = Evaluator::new(references, None).evaluate(&data);

        assert_eq!(report.metadata.examples_without_gold, 1);
        assert_eq!(report.results["spacy"].failed, 1);
        assert_eq!(report.results["spacy"].overall.examples, 0);
    }

    #[tokio::test]
    async fn test_load_exported_shape_and_write_report() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("gold_set.json");
        let json = serde_json::json!({
            "metadata": { "primary_method": "seams", "reference_methods": ["uax29"], "seed": 42 },
            "examples": [{
                "id": "gold_0000",
                "original_text": "It rained.\nWe stayed in.\n",
                "sentences": { "seams": ["It rained.", "We stayed in."] },
                "complexity_tags": ["hard_separator"],
                "disagreement_kind": "UNDER_SPLIT"
            }]
        });
        std::fs::write(&input, json.to_string()).unwrap();

        let data = DatasetFile::load(&input).await.unwrap();
        assert_eq!(data.examples[0].complexity_tags, vec![ComplexityTag::HardSeparator]);

        let report = Evaluator::new(uax29_only(), None).evaluate(&data);
        let output = temp_dir.path().join("reports/eval.json");
        report.write(&output).await.unwrap();

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["metadata"]["dataset_size"], 1);
        assert_eq!(written["results"]["uax29"]["by_tag"]["hard_separator"]["gold_sentences"], 2);
        assert!(written["results"]["uax29"]["overall"]["f1"].is_number());
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("broken.json");
        std::fs::write(&input, "{\"metadata\": ").unwrap();
        assert!(DatasetFile::load(&input).await.is_err());
    }
}
