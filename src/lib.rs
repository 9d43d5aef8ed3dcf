pub mod abbreviations;
pub mod aligner;
pub mod analysis;
pub mod chunker;
pub mod classifier;
pub mod complexity;
pub mod config;
pub mod discovery;
pub mod document;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod normalization;
pub mod pairing;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod reference;
pub mod sampler;
pub mod segmenter;
pub mod tagged;

// Re-export main types for convenient access
pub use analysis::{Analyzer, DisagreementRecord, DocumentAnalysis, RunSummary};
pub use classifier::{classify_three_way, classify_two_way, DisagreementKind, Priority};
pub use complexity::{ComplexityTag, ComplexityTagger};
pub use config::GoldConfig;
pub use document::{Document, Span};
pub use error::{GoldError, SkipKind};
pub use evaluation::{DatasetFile, EvaluationReport, Evaluator};
pub use tagged::{parse_tagged_sentences, ParsedSentences, TaggedSentence};

// Re-export comparison primitives for benchmarking
pub use aligner::{equivalent, similarity_ratio};

// Re-export run orchestration
pub use pipeline::{run, PipelineOptions, SelectionMode};
pub use sampler::{GoldExample, Sampler, StratumKey};
