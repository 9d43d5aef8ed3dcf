use regex_automata::meta::Regex;

use super::{paragraphs, Segmenter};
use crate::abbreviations::AbbreviationChecker;
use crate::error::{GoldError, Result};

// terminal punctuation, optional closers, whitespace, optional openers, capital letter
const BOUNDARY_PATTERN: &str = r#"[.!?]+["'\u{201D}\u{2019})\]]*\s+["'\u{201C}\u{2018}(\[]*\p{Lu}"#;

/// Punctuation-rule baseline that keeps titles and initials attached to the following name
pub struct RuleSegmenter {
    name: String,
    boundary: Regex,
    abbreviations: AbbreviationChecker,
}

impl RuleSegmenter {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            boundary: Regex::new(BOUNDARY_PATTERN)?,
            abbreviations: AbbreviationChecker::new(),
        })
    }

    fn split_paragraph(&self, paragraph: &str, sentences: &mut Vec<String>) {
        let mut start = 0;

        for m in self.boundary.find_iter(paragraph) {
            let matched = &paragraph[m.range()];
            // sentence ends where the whitespace begins
            let Some(gap) = matched.find(char::is_whitespace) else {
                continue;
            };
            let end = m.start() + gap;
            let candidate = &paragraph[start..end];

            if self.abbreviations.suppresses_boundary(candidate) {
                continue;
            }

            let sentence = candidate.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = end;
        }

        let tail = paragraph[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }
    }
}

impl Segmenter for RuleSegmenter {
    fn name(&self) -> &str {
        &self.name
    }

    fn segment(&self, text: &str) -> Result<Vec<String>> {
        let mut sentences = Vec::new();
        for paragraph in paragraphs(text) {
            self.split_paragraph(&paragraph, &mut sentences);
        }

        if sentences.is_empty() {
            return Err(GoldError::segmenter(&self.name, "no sentences in region"));
        }
        Ok(sentences)
    }
}
