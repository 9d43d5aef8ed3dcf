use unicode_segmentation::UnicodeSegmentation;

use super::{paragraphs, Segmenter};
use crate::error::{GoldError, Result};

/// Unicode UAX #29 sentence boundaries, applied per paragraph
///
/// UAX #29 treats every line feed as a paragraph separator, so hard-wrapped prose is unwrapped
/// before segmentation.
pub struct UnicodeSegmenter {
    name: String,
}

impl UnicodeSegmenter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Segmenter for UnicodeSegmenter {
    fn name(&self) -> &str {
        &self.name
    }

    fn segment(&self, text: &str) -> Result<Vec<String>> {
        let sentences: Vec<String> = paragraphs(text)
            .iter()
            .flat_map(|paragraph| {
                paragraph
                    .unicode_sentences()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .collect();

        if sentences.is_empty() {
            return Err(GoldError::segmenter(&self.name, "no sentences in region"));
        }
        Ok(sentences)
    }
}
