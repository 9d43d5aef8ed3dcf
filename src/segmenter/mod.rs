// WHY: reference methods are opaque to the comparison engine; anything that can turn a region
// into sentences plugs in behind one trait

pub mod command;
pub mod rule;
pub mod unicode;

use crate::error::Result;
use crate::normalization::normalize_whitespace;

pub use command::CommandSegmenter;
pub use rule::RuleSegmenter;
pub use unicode::UnicodeSegmenter;

/// Live sentence segmentation of a region's verbatim text
pub trait Segmenter: Send + Sync {
    fn name(&self) -> &str;

    /// Sentences in text order; an empty result is an error
    fn segment(&self, text: &str) -> Result<Vec<String>>;
}

/// Paragraphs separated by blank lines, each with its hard wraps collapsed to single spaces
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut current, &mut paragraphs);
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    flush_paragraph(&mut current, &mut paragraphs);

    paragraphs
}

fn flush_paragraph(current: &mut String, paragraphs: &mut Vec<String>) {
    let normalized = normalize_whitespace(current);
    if !normalized.is_empty() {
        paragraphs.push(normalized);
    }
    current.clear();
}
