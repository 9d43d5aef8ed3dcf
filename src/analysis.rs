// WHY: every per-chunk failure stays inside the chunk; a document always yields an analysis with
// its skip counts, never an error

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::chunker::{BoundaryChunker, Chunk};
use crate::classifier::{classify_three_way, classify_two_way, DisagreementKind};
use crate::complexity::{ComplexityTag, ComplexityTagger};
use crate::config::GoldConfig;
use crate::document::{Document, Span};
use crate::error::{GoldError, Result, SkipKind};
use crate::reference::{AnnotationReference, ReferenceSet, ReferenceSource};
use crate::tagged::ParsedSentences;

/// Region where at least one reference segments differently from the primary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisagreementRecord {
    /// Region text with line breaks replaced by spaces
    pub original_text: String,
    /// Method name to its segmentation of the region, primary included
    pub sentences: BTreeMap<String, Vec<String>>,
    pub kind: DisagreementKind,
    pub tags: BTreeSet<ComplexityTag>,
    /// Reference names that took part, joined by `+`
    pub comparison_method: String,
    pub source_file: PathBuf,
    pub span: Span,
    pub chunk_index: usize,
}

/// Outcome of analyzing one document
#[derive(Debug, Default)]
pub struct DocumentAnalysis {
    pub records: Vec<DisagreementRecord>,
    pub chunks_compared: usize,
    pub regions_filtered: usize,
    pub skipped: BTreeMap<SkipKind, usize>,
}

impl DocumentAnalysis {
    pub fn skip(&mut self, kind: SkipKind) {
        *self.skipped.entry(kind).or_default() += 1;
    }

    fn skip_error(&mut self, source: &Path, error: &GoldError) {
        warn!("Skipping in {}: {}", source.display(), error);
        self.skip(error.kind());
    }
}

/// Corpus-wide counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub pairs_discovered: usize,
    pub documents_analyzed: usize,
    pub chunks_compared: usize,
    pub regions_filtered: usize,
    pub records_retained: usize,
    pub examples_selected: usize,
    pub skipped: BTreeMap<SkipKind, usize>,
}

impl RunSummary {
    pub fn record_skip(&mut self, kind: SkipKind) {
        *self.skipped.entry(kind).or_default() += 1;
    }

    /// Fold one document's counters into the run totals
    pub fn absorb(&mut self, analysis: &DocumentAnalysis) {
        self.documents_analyzed += 1;
        self.chunks_compared += analysis.chunks_compared;
        self.regions_filtered += analysis.regions_filtered;
        self.records_retained += analysis.records.len();
        for (kind, count) in &analysis.skipped {
            *self.skipped.entry(*kind).or_default() += count;
        }
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Region text prepared for comparison
struct Region {
    span: Span,
    verbatim: String,
    display: String,
}

/// Shared, immutable per-run analysis state
pub struct Analyzer {
    config: Arc<GoldConfig>,
    references: Arc<ReferenceSet>,
    chunker: BoundaryChunker,
    tagger: ComplexityTagger,
}

impl Analyzer {
    pub fn new(config: Arc<GoldConfig>, references: Arc<ReferenceSet>) -> Result<Self> {
        Ok(Self {
            chunker: BoundaryChunker::new(&config.chunking)?,
            tagger: ComplexityTagger::new()?,
            config,
            references,
        })
    }

    pub fn config(&self) -> &GoldConfig {
        &self.config
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    /// Compare every chunk of one document and keep the disagreements
    ///
    /// `annotations` holds this document's sentences for each annotation reference.
    pub fn analyze(
        &self,
        source: &Path,
        document: &Document,
        primary: &ParsedSentences,
        mut annotations: HashMap<String, AnnotationReference>,
    ) -> DocumentAnalysis {
        let mut analysis = DocumentAnalysis::default();
        for _ in &primary.errors {
            analysis.skip(SkipKind::ParseError);
        }

        let chunks = self.chunker.chunk(&primary.sentences);
        debug!("{}: {} sentences in {} chunks", source.display(), primary.sentences.len(), chunks.len());

        for chunk in &chunks {
            let region = match self.region(document, primary, chunk) {
                Ok(region) => region,
                Err(e) => {
                    analysis.skip_error(source, &e);
                    continue;
                }
            };

            if !self.worth_comparing(&region.display) {
                analysis.regions_filtered += 1;
                continue;
            }
            analysis.chunks_compared += 1;

            if let Some(record) = self.compare(source, chunk, primary, region, &mut annotations, &mut analysis) {
                analysis.records.push(record);
            }
        }

        analysis
    }

    fn region(&self, document: &Document, primary: &ParsedSentences, chunk: &Chunk) -> Result<Region> {
        let sentences = &primary.sentences[chunk.range.clone()];
        let first = sentences.first().and_then(|s| s.span);
        let last = sentences.last().and_then(|s| s.span);

        let span = match (first, last) {
            (Some(first), Some(last)) => Span::covering(&first, &last)?,
            (None, _) => return Err(GoldError::MissingSpan { index: chunk.range.start }),
            (_, None) => return Err(GoldError::MissingSpan { index: chunk.range.end - 1 }),
        };

        Ok(Region {
            span,
            verbatim: document.extract_verbatim(&span)?,
            display: document.extract_display(&span)?,
        })
    }

    fn worth_comparing(&self, text: &str) -> bool {
        let chunking = &self.config.chunking;
        if text.trim().chars().count() < chunking.min_region_chars {
            return false;
        }
        !chunking.require_lowercase || text.chars().any(char::is_lowercase)
    }

    fn compare(
        &self,
        source: &Path,
        chunk: &Chunk,
        primary: &ParsedSentences,
        region: Region,
        annotations: &mut HashMap<String, AnnotationReference>,
        analysis: &mut DocumentAnalysis,
    ) -> Option<DisagreementRecord> {
        let alignment = &self.config.alignment;
        let primary_texts: Vec<String> = primary.sentences[chunk.range.clone()]
            .iter()
            .map(|s| s.text.clone())
            .collect();

        let mut segmentations: Vec<(String, Vec<String>)> = Vec::new();
        for reference in self.references.iter() {
            let result = match &reference.source {
                ReferenceSource::Live(segmenter) => segmenter.segment(&region.verbatim),
                ReferenceSource::Annotation => match annotations.get_mut(&reference.name) {
                    Some(annotation) => {
                        annotation.segment_region(&region.span, &primary_texts, &region.display, alignment)
                    }
                    None => Err(GoldError::segmenter(&reference.name, "annotation not loaded")),
                },
            };

            match result {
                Ok(sentences) => segmentations.push((reference.name.clone(), sentences)),
                Err(e) => analysis.skip_error(source, &e),
            }
        }

        let threshold = alignment.equivalence_threshold;
        let kind = match segmentations.as_slice() {
            [] => return None,
            [(_, only)] => classify_two_way(&primary_texts, only, threshold),
            [(_, a), (_, b), ..] => classify_three_way(&primary_texts, a, b, threshold),
        };

        debug!("{} chunk {} at {}: {}", source.display(), chunk.index, region.span, kind);
        if !kind.is_disagreement() {
            return None;
        }

        let comparison_method = segmentations
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join("+");

        let mut sentences: BTreeMap<String, Vec<String>> = segmentations.into_iter().collect();
        sentences.insert(self.config.dataset.primary_method.clone(), primary_texts);

        Some(DisagreementRecord {
            tags: self.tagger.tag(&region.verbatim),
            original_text: region.display,
            sentences,
            kind,
            comparison_method,
            source_file: source.to_path_buf(),
            span: region.span,
            chunk_index: chunk.index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReferenceConfig, ReferenceKind};
    use crate::reference::Reference;
    use crate::segmenter::Segmenter;
    use crate::tagged::parse_tagged_sentences;

    /// Splits on a fixed marker so tests control reference output exactly
    struct MarkerSegmenter {
        name: String,
        marker: &'static str,
    }

    impl Segmenter for MarkerSegmenter {
        fn name(&self) -> &str {
            &self.name
        }

        fn segment(&self, text: &str) -> Result<Vec<String>> {
            let sentences: Vec<String> = text
                .split(self.marker)
                .map(|s| crate::normalization::normalize_whitespace(s))
                .filter(|s| !s.is_empty())
                .collect();
            if sentences.is_empty() {
                return Err(GoldError::segmenter(&self.name, "empty"));
            }
            Ok(sentences)
        }
    }

    struct FailingSegmenter;

    impl Segmenter for FailingSegmenter {
        fn name(&self) -> &str {
            "broken"
        }

        fn segment(&self, _text: &str) -> Result<Vec<String>> {
            Err(GoldError::segmenter("broken", "always fails"))
        }
    }

    fn live(name: &str, segmenter: impl Segmenter + 'static) -> Reference {
        Reference { name: name.to_string(), source: ReferenceSource::Live(Box::new(segmenter)) }
    }

    fn whole(name: &str) -> Reference {
        live(name, MarkerSegmenter { name: name.to_string(), marker: "\u{0}" })
    }

    fn analyzer_with(config: GoldConfig, references: Vec<Reference>) -> Analyzer {
        Analyzer::new(Arc::new(config), Arc::new(ReferenceSet::from_references(references))).unwrap()
    }

    fn analyzer(references: Vec<Reference>) -> Analyzer {
        analyzer_with(GoldConfig::default(), references)
    }

    const TEXT: &str = "It rained all day. We stayed inside.\n";
    const PRIMARY: &str = "0\tIt rained all day.\t(1,1,1,19)\n1\tWe stayed inside.\t(1,20,1,37)\n";

    #[test]
    fn test_under_split_with_single_reference() {
        let analyzer = analyzer(vec![whole("joined")]);
        let document = Document::from_text(TEXT);
        let primary = parse_tagged_sentences(PRIMARY);

        let analysis = analyzer.analyze(Path::new("book.txt"), &document, &primary, HashMap::new());
        assert_eq!(analysis.chunks_compared, 1);
        assert_eq!(analysis.records.len(), 1);

        let record = &analysis.records[0];
        assert_eq!(record.kind, DisagreementKind::UnderSplit);
        assert_eq!(record.comparison_method, "joined");
        assert_eq!(record.original_text, "It rained all day. We stayed inside.");
        assert_eq!(record.sentences["seams"].len(), 2);
        assert_eq!(record.sentences["joined"], vec!["It rained all day. We stayed inside."]);
        assert!(record.tags.is_empty());
        assert_eq!(record.span, Span::new(1, 1, 1, 37).unwrap());
    }

    #[test]
    fn test_agreement_is_not_retained() {
        let analyzer = analyzer(vec![live("dots", MarkerSegmenter { name: "dots".into(), marker: ". " })]);
        let document = Document::from_text(TEXT);
        let primary = parse_tagged_sentences(PRIMARY);

        let analysis = analyzer.analyze(Path::new("book.txt"), &document, &primary, HashMap::new());
        assert_eq!(analysis.chunks_compared, 1);
        assert!(analysis.records.is_empty());
    }

    #[test]
    fn test_primary_vs_both() {
        let analyzer = analyzer(vec![whole("a"), whole("b")]);
        let document = Document::from_text(TEXT);
        let primary = parse_tagged_sentences(PRIMARY);

        let analysis = analyzer.analyze(Path::new("book.txt"), &document, &primary, HashMap::new());
        let record = &analysis.records[0];
        assert_eq!(record.kind, DisagreementKind::PrimaryVsBoth);
        assert_eq!(record.comparison_method, "a+b");
        assert_eq!(record.sentences.len(), 3);
    }

    #[test]
    fn test_failing_reference_falls_back_to_two_way() {
        let analyzer = analyzer(vec![live("broken", FailingSegmenter), whole("joined")]);
        let document = Document::from_text(TEXT);
        let primary = parse_tagged_sentences(PRIMARY);

        let analysis = analyzer.analyze(Path::new("book.txt"), &document, &primary, HashMap::new());
        assert_eq!(analysis.skipped.get(&SkipKind::SegmenterFailure), Some(&1));
        assert_eq!(analysis.records[0].kind, DisagreementKind::UnderSplit);
        assert_eq!(analysis.records[0].comparison_method, "joined");
    }

    #[test]
    fn test_all_references_failing_skips_chunk() {
        let analyzer = analyzer(vec![live("broken", FailingSegmenter)]);
        let document = Document::from_text(TEXT);
        let primary = parse_tagged_sentences(PRIMARY);

        let analysis = analyzer.analyze(Path::new("book.txt"), &document, &primary, HashMap::new());
        assert!(analysis.records.is_empty());
        assert_eq!(analysis.skipped.get(&SkipKind::SegmenterFailure), Some(&1));
    }

    #[test]
    fn test_region_problems_skip_only_their_chunk() {
        let mut config = GoldConfig::default();
        config.chunking.max_sentences = 2;
        let analyzer = analyzer_with(config, vec![whole("joined")]);
        let document = Document::from_text("One two three. Four five six.\n\nSeven eight nine. Ten eleven.\n");
        let primary = parse_tagged_sentences(
            "0\tOne two three.\t(1,1,1,15)\n1\tFour five six.\t(1,16,1,30)\n\
             2\tSeven eight nine.\n3\tTen eleven.\t(3,19,3,30)\n\
             4\tPast the end.\t(9,1,9,5)\n",
        );

        let analysis = analyzer.analyze(Path::new("book.txt"), &document, &primary, HashMap::new());
        assert_eq!(analysis.records.len(), 1);
        assert_eq!(analysis.records[0].chunk_index, 0);
        assert_eq!(analysis.skipped.get(&SkipKind::MissingSpan), Some(&1));
        assert_eq!(analysis.skipped.get(&SkipKind::OutOfRangeSpan), Some(&1));
    }

    #[test]
    fn test_last_sentence_ending_at_end_of_file() {
        let analyzer = analyzer(vec![whole("joined")]);
        let document = Document::from_text(TEXT);
        let primary = parse_tagged_sentences("0\tIt rained all day.\t(1,1,1,19)\n1\tWe stayed inside.\t(1,20,2,1)\n");

        let analysis = analyzer.analyze(Path::new("book.txt"), &document, &primary, HashMap::new());
        assert!(analysis.skipped.is_empty());
        assert_eq!(analysis.chunks_compared, 1);

        let record = &analysis.records[0];
        assert_eq!(record.kind, DisagreementKind::UnderSplit);
        assert_eq!(record.span, Span::new(1, 1, 2, 1).unwrap());
        assert_eq!(record.original_text, "It rained all day. We stayed inside.");
    }

    #[test]
    fn test_short_and_uppercase_regions_are_filtered() {
        let analyzer = analyzer(vec![whole("joined")]);
        let document = Document::from_text("Hi. Yo.\n\nCHAPTER ONE. THE START.\n");
        let primary = parse_tagged_sentences(
            "0\tHi.\t(1,1,1,4)\n1\tYo.\t(1,5,1,8)\n2\tCHAPTER ONE.\t(3,1,3,13)\n3\tTHE START.\t(3,14,3,24)\n",
        );

        let analysis = analyzer.analyze(Path::new("book.txt"), &document, &primary, HashMap::new());
        assert_eq!(analysis.regions_filtered, 2);
        assert_eq!(analysis.chunks_compared, 0);
        assert!(analysis.records.is_empty());
    }

    #[test]
    fn test_annotation_reference() {
        let mut config = GoldConfig::default();
        config.references = vec![ReferenceConfig::new("spacy", ReferenceKind::Annotation)];
        let config = Arc::new(config);
        let references = Arc::new(ReferenceSet::from_config(&config).unwrap());
        let analyzer = Analyzer::new(config.clone(), references).unwrap();

        let document = Document::from_text(TEXT);
        let primary = parse_tagged_sentences(PRIMARY);
        let annotation = parse_tagged_sentences("0\tIt rained all day. We stayed inside.\t(1,1,1,37)\n");

        let mut annotations = HashMap::new();
        annotations.insert("spacy".to_string(), AnnotationReference::new("spacy", annotation, &config.alignment));

        let analysis = analyzer.analyze(Path::new("book.txt"), &document, &primary, annotations);
        assert_eq!(analysis.records.len(), 1);
        assert_eq!(analysis.records[0].kind, DisagreementKind::UnderSplit);
        assert_eq!(analysis.records[0].comparison_method, "spacy");
    }

    #[test]
    fn test_run_summary_absorbs_documents() {
        let mut document = DocumentAnalysis { chunks_compared: 4, regions_filtered: 1, ..Default::default() };
        document.skip(SkipKind::ParseError);
        document.skip(SkipKind::ParseError);

        let mut summary = RunSummary::default();
        summary.absorb(&document);
        summary.absorb(&document);
        summary.record_skip(SkipKind::MissingCollaborator);

        assert_eq!(summary.documents_analyzed, 2);
        assert_eq!(summary.chunks_compared, 8);
        assert_eq!(summary.skipped.get(&SkipKind::ParseError), Some(&4));
        assert_eq!(summary.total_skipped(), 5);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["skipped"]["missing_collaborator"], 1);
    }
}
