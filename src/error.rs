// WHY: every failure below is local to a line, chunk, reference or file pair; the run keeps going
// and reports how many of each kind it skipped

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a disagreement dataset
#[derive(Error, Debug)]
pub enum GoldError {
    /// Malformed tagged-sentence line
    #[error("parse error at line {line_number}: {reason}")]
    Parse { line_number: usize, reason: String },

    /// Span with zero coordinates or end before start
    #[error("invalid span ({start_line},{start_col},{end_line},{end_col})")]
    InvalidSpan {
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    },

    /// Paired annotation or original document absent
    #[error("missing collaborator file: {}", path.display())]
    MissingCollaborator { path: PathBuf },

    /// Span addresses lines past the end of the document
    #[error("span {span} exceeds document bounds ({line_count} lines)")]
    OutOfRangeSpan { span: String, line_count: usize },

    /// Chunk boundary sentence carries no coordinates
    #[error("sentence {index} has no coordinates")]
    MissingSpan { index: usize },

    /// Reference segmenter raised or returned nothing
    #[error("segmenter '{method}' failed: {reason}")]
    SegmenterFailure { method: String, reason: String },

    /// File is not valid UTF-8
    #[error("file is not valid UTF-8: {}", path.display())]
    Encoding { path: PathBuf },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Rule pattern failed to compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex_automata::meta::BuildError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GoldError {
    /// Skip category used by the run summary
    pub fn kind(&self) -> SkipKind {
        match self {
            GoldError::Parse { .. } | GoldError::InvalidSpan { .. } => SkipKind::ParseError,
            GoldError::MissingCollaborator { .. } => SkipKind::MissingCollaborator,
            GoldError::OutOfRangeSpan { .. } => SkipKind::OutOfRangeSpan,
            GoldError::MissingSpan { .. } => SkipKind::MissingSpan,
            GoldError::SegmenterFailure { .. } => SkipKind::SegmenterFailure,
            GoldError::Encoding { .. } => SkipKind::EncodingError,
            GoldError::Config(_) | GoldError::Pattern(_) | GoldError::Io(_) => SkipKind::Io,
        }
    }

    pub fn segmenter(method: &str, reason: impl Into<String>) -> Self {
        GoldError::SegmenterFailure {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

/// Category of a skipped unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    ParseError,
    MissingCollaborator,
    OutOfRangeSpan,
    MissingSpan,
    SegmenterFailure,
    EncodingError,
    Io,
}

impl SkipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipKind::ParseError => "parse_error",
            SkipKind::MissingCollaborator => "missing_collaborator",
            SkipKind::OutOfRangeSpan => "out_of_range_span",
            SkipKind::MissingSpan => "missing_span",
            SkipKind::SegmenterFailure => "segmenter_failure",
            SkipKind::EncodingError => "encoding_error",
            SkipKind::Io => "io",
        }
    }
}

/// Result type for dataset-building operations
pub type Result<T> = std::result::Result<T, GoldError>;
