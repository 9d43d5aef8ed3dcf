// WHY: tagged-sentence files are written by other tools; one bad line must never cost the rest
// of the file

use tracing::warn;

use crate::document::Span;
use crate::error::GoldError;

/// One sentence from a method's output, with coordinates when the format carries them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSentence {
    pub id: String,
    pub text: String,
    pub span: Option<Span>,
}

impl TaggedSentence {
    pub fn new(id: impl Into<String>, text: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            span,
        }
    }
}

/// Sentences parsed from one file in file order, plus the lines that were skipped
#[derive(Debug, Default)]
pub struct ParsedSentences {
    pub sentences: Vec<TaggedSentence>,
    pub errors: Vec<GoldError>,
}

impl ParsedSentences {
    /// Whether every sentence carries coordinates
    pub fn fully_located(&self) -> bool {
        !self.sentences.is_empty() && self.sentences.iter().all(|s| s.span.is_some())
    }
}

/// Parse a whole tagged-sentence file held in memory
pub fn parse_tagged_sentences(content: &str) -> ParsedSentences {
    parse_tagged_lines(content.lines())
}

/// Parse tagged-sentence records line by line
///
/// Accepts `id<TAB>text<TAB>(sl,sc,el,ec)` and `id<TAB>text`. Blank lines and lines starting
/// with `#` are ignored.
pub fn parse_tagged_lines<I, S>(lines: I) -> ParsedSentences
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedSentences::default();

    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        match parse_record(line, idx + 1) {
            Ok(sentence) => parsed.sentences.push(sentence),
            Err(e) => {
                warn!("Skipping malformed tagged-sentence line: {}", e);
                parsed.errors.push(e);
            }
        }
    }

    parsed
}

fn parse_record(line: &str, line_number: usize) -> Result<TaggedSentence, GoldError> {
    let parse_error = |reason: String| GoldError::Parse { line_number, reason };

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 2 {
        return Err(parse_error("expected at least 2 tab-separated fields".to_string()));
    }

    let id = fields[0].trim();
    let text = fields[1].trim();
    if text.is_empty() {
        return Err(parse_error(format!("record '{id}' has empty text")));
    }

    let span = match fields.get(2).map(|f| f.trim()) {
        None | Some("") => None,
        Some(coords) => Some(coords.parse::<Span>().map_err(|e| match e {
            GoldError::Parse { reason, .. } => parse_error(reason),
            other => parse_error(other.to_string()),
        })?),
    };

    Ok(TaggedSentence::new(id, text, span))
}
