// WHY: live segmenters and precomputed annotation files answer the same question for a region;
// the analysis loop sees one ordered list of named references and never branches on where the
// sentences came from beyond this module

use tracing::info;

use crate::aligner::{select_by_span, OverlapWindow};
use crate::config::{AlignmentConfig, GoldConfig, ReferenceKind};
use crate::document::Span;
use crate::error::{GoldError, Result};
use crate::normalization::normalize_whitespace;
use crate::segmenter::{CommandSegmenter, RuleSegmenter, Segmenter, UnicodeSegmenter};
use crate::tagged::{ParsedSentences, TaggedSentence};

pub enum ReferenceSource {
    Live(Box<dyn Segmenter>),
    /// Sentences read per document from `<stem>_<name>.txt`
    Annotation,
}

pub struct Reference {
    pub name: String,
    pub source: ReferenceSource,
}

/// Reference methods in configured order
pub struct ReferenceSet {
    references: Vec<Reference>,
}

impl ReferenceSet {
    /// Build every configured reference, probing external programs once
    pub fn from_config(config: &GoldConfig) -> Result<Self> {
        let mut references = Vec::with_capacity(config.references.len());

        for reference in &config.references {
            let source = match &reference.kind {
                ReferenceKind::Uax29 => ReferenceSource::Live(Box::new(UnicodeSegmenter::new(&reference.name))),
                ReferenceKind::Rule => ReferenceSource::Live(Box::new(RuleSegmenter::new(&reference.name)?)),
                ReferenceKind::Command { program, args } => {
                    let segmenter = CommandSegmenter::new(&reference.name, program, args.clone());
                    segmenter.probe()?;
                    ReferenceSource::Live(Box::new(segmenter))
                }
                ReferenceKind::Annotation => ReferenceSource::Annotation,
            };
            references.push(Reference { name: reference.name.clone(), source });
        }

        info!("Initialized {} reference methods", references.len());
        Ok(Self { references })
    }

    pub fn from_references(references: Vec<Reference>) -> Self {
        Self { references }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.references.iter().map(|r| r.name.clone()).collect()
    }

    /// Names of references that need a per-document annotation file
    pub fn annotation_names(&self) -> Vec<String> {
        self.references
            .iter()
            .filter(|r| matches!(r.source, ReferenceSource::Annotation))
            .map(|r| r.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// One document's annotation sentences, aligned region by region in document order
pub struct AnnotationReference {
    name: String,
    sentences: Vec<TaggedSentence>,
    located: bool,
    window: OverlapWindow,
}

impl AnnotationReference {
    pub fn new(name: impl Into<String>, parsed: ParsedSentences, config: &AlignmentConfig) -> Self {
        let located = parsed.fully_located();
        Self {
            name: name.into(),
            sentences: parsed.sentences,
            located,
            window: OverlapWindow::from_config(config),
        }
    }

    /// Annotation sentences belonging to a region
    ///
    /// Uses coordinates when every sentence has them, otherwise the overlap window against the
    /// primary sentences and the region's display text.
    pub fn segment_region<P: AsRef<str>>(
        &mut self,
        region: &Span,
        primary: &[P],
        region_text: &str,
        config: &AlignmentConfig,
    ) -> Result<Vec<String>> {
        let sentences = if self.located {
            select_by_span(&self.sentences, region).unwrap_or_default()
        } else {
            let normalized = normalize_whitespace(region_text);
            self.window.collect(&self.sentences, primary, &normalized, config)
        };

        if sentences.is_empty() {
            return Err(GoldError::segmenter(&self.name, format!("no annotation sentences align with {region}")));
        }
        Ok(sentences)
    }
}
