// WHY: one Document/Span pair is the only place that turns coordinates back into text; the two
// join policies are separate named operations because they feed different consumers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GoldError, Result};

/// Region of a document using 1-based lines and columns; the end column is excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Span {
    /// Create a span, rejecting zero coordinates and ends that precede the start
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Result<Self> {
        let span = Self { start_line, start_col, end_line, end_col };
        if start_line == 0 || start_col == 0 || end_line == 0 || end_col == 0 || span.end() < span.start() {
            return Err(GoldError::InvalidSpan { start_line, start_col, end_line, end_col });
        }
        Ok(span)
    }

    /// Span from the start of `first` to the end of `last`
    pub fn covering(first: &Span, last: &Span) -> Result<Self> {
        Self::new(first.start_line, first.start_col, last.end_line, last.end_col)
    }

    /// (line, col) of the first covered character
    pub fn start(&self) -> (usize, usize) {
        (self.start_line, self.start_col)
    }

    /// (line, col) one past the last covered character
    pub fn end(&self) -> (usize, usize) {
        (self.end_line, self.end_col)
    }

    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }

    /// Whether `other` begins inside this span
    pub fn contains_start_of(&self, other: &Span) -> bool {
        other.start() >= self.start() && other.start() < self.end()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.start_line, self.start_col, self.end_line, self.end_col)
    }
}

impl FromStr for Span {
    type Err = GoldError;

    /// Parse the `(start_line,start_col,end_line,end_col)` form used by tagged-sentence files
    fn from_str(s: &str) -> Result<Self> {
        let malformed = || GoldError::Parse {
            line_number: 0,
            reason: format!("malformed coordinates '{s}'"),
        };

        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(malformed)?;

        let mut values = [0usize; 4];
        let mut parts = inner.split(',');
        for value in values.iter_mut() {
            *value = parts
                .next()
                .and_then(|part| part.trim().parse().ok())
                .ok_or_else(malformed)?;
        }
        if parts.next().is_some() {
            return Err(malformed());
        }

        Span::new(values[0], values[1], values[2], values[3])
    }
}

/// Line terminator as it appeared in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineBreak {
    None,
    Lf,
    CrLf,
}

impl LineBreak {
    fn as_str(&self) -> &'static str {
        match self {
            LineBreak::None => "",
            LineBreak::Lf => "\n",
            LineBreak::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone)]
struct Line {
    content: String,
    line_break: LineBreak,
}

/// Source text addressed by 1-based (line, column) coordinates
///
/// Columns count characters, matching the coordinates written by the seams detector.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<Line>,
}

impl Document {
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split_inclusive('\n')
            .map(|raw| {
                if let Some(content) = raw.strip_suffix("\r\n") {
                    Line { content: content.to_string(), line_break: LineBreak::CrLf }
                } else if let Some(content) = raw.strip_suffix('\n') {
                    Line { content: content.to_string(), line_break: LineBreak::Lf }
                } else {
                    Line { content: raw.to_string(), line_break: LineBreak::None }
                }
            })
            .collect();

        Self { lines }
    }

    /// Covered text with line pieces joined by a single space, for human-readable display
    pub fn extract_display(&self, span: &Span) -> Result<String> {
        let (pieces, _) = self.walk(span)?;
        Ok(pieces.iter().map(|(piece, _)| *piece).collect::<Vec<_>>().join(" "))
    }

    /// Covered text with the original line breaks preserved, for feeding reference segmenters
    pub fn extract_verbatim(&self, span: &Span) -> Result<String> {
        let (pieces, trailing) = self.walk(span)?;
        let last = pieces.len().saturating_sub(1);

        let mut text = String::new();
        for (idx, (piece, line_break)) in pieces.iter().enumerate() {
            text.push_str(piece);
            if idx < last {
                text.push_str(line_break.as_str());
            }
        }
        text.push_str(trailing);
        Ok(text)
    }

    /// First-line suffix, interior lines, last-line prefix, each paired with its line break
    ///
    /// An exclusive end at `(line_count + 1, 1)` covers the whole last line and its terminator,
    /// which is returned separately so only verbatim extraction keeps it.
    fn walk(&self, span: &Span) -> Result<(Vec<(&str, LineBreak)>, &'static str)> {
        let line_count = self.lines.len();
        let to_end = line_count > 0 && span.end_line == line_count + 1 && span.end_col == 1;
        let addressable = span.start_line >= 1
            && span.start_col >= 1
            && span.start_line <= line_count
            && (span.end_line <= line_count || to_end)
            && span.end() >= span.start();
        if !addressable {
            return Err(GoldError::OutOfRangeSpan {
                span: span.to_string(),
                line_count,
            });
        }

        // last covered line and the exclusive character end on it, `None` for the whole line
        let (last_line, last_end) = if to_end {
            (line_count, None)
        } else {
            (span.end_line, Some(span.end_col.saturating_sub(1)))
        };
        let trailing = if to_end { self.lines[line_count - 1].line_break.as_str() } else { "" };

        let first = &self.lines[span.start_line - 1];
        if span.start_line == last_line {
            let piece = char_slice(&first.content, span.start_col - 1, last_end);
            return Ok((vec![(piece, first.line_break)], trailing));
        }

        let mut pieces = Vec::with_capacity(last_line - span.start_line + 1);
        pieces.push((char_slice(&first.content, span.start_col - 1, None), first.line_break));

        for line in &self.lines[span.start_line..last_line - 1] {
            pieces.push((line.content.as_str(), line.line_break));
        }

        let last = &self.lines[last_line - 1];
        pieces.push((char_slice(&last.content, 0, last_end), last.line_break));

        Ok((pieces, trailing))
    }
}

/// Slice by character positions, clamping both ends to the string
fn char_slice(text: &str, start: usize, end: Option<usize>) -> &str {
    let byte_at = |char_pos: usize| {
        text.char_indices()
            .nth(char_pos)
            .map(|(byte, _)| byte)
            .unwrap_or(text.len())
    };

    let start_byte = byte_at(start);
    let end_byte = end.map(byte_at).unwrap_or(text.len());
    if end_byte <= start_byte {
        return "";
    }
    &text[start_byte..end_byte]
}
