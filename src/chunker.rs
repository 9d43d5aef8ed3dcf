// WHY: regions are compared as a whole, so their edges must sit where every method is likely to
// break anyway; otherwise a boundary disagreement could be an artifact of where the chunk was cut

use regex_automata::meta::Regex;
use std::ops::Range;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::tagged::TaggedSentence;

const ATTRIBUTION_PATTERN: &str = r"\b(said|asked|replied|shouted|whispered)[.!?]?\s*$";

/// Consecutive run of primary sentences compared as one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub range: Range<usize>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

pub struct BoundaryChunker {
    max_sentences: usize,
    attribution: Regex,
}

impl BoundaryChunker {
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        Ok(Self {
            max_sentences: config.max_sentences.max(1),
            attribution: Regex::new(ATTRIBUTION_PATTERN)?,
        })
    }

    /// Split sentences into chunks covering every index exactly once, in order
    pub fn chunk(&self, sentences: &[TaggedSentence]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut start = 0;

        for idx in 0..sentences.len() {
            let next = sentences.get(idx + 1);
            let held = idx + 1 - start;
            if next.is_none() || held >= self.max_sentences || self.is_break(&sentences[idx], next) {
                chunks.push(Chunk { index: chunks.len(), range: start..idx + 1 });
                start = idx + 1;
            }
        }

        chunks
    }

    fn is_break(&self, current: &TaggedSentence, next: Option<&TaggedSentence>) -> bool {
        let Some(next) = next else {
            return true;
        };

        if let (Some(cur), Some(nxt)) = (current.span, next.span) {
            // paragraph gap
            if nxt.start_line > cur.end_line + 1 {
                return true;
            }
            if nxt.start() < cur.start() {
                return true;
            }
        }

        if self.attribution.is_match(current.text.to_lowercase().as_str()) {
            return true;
        }

        let text = current.text.trim_end();
        let closes_quote = text.ends_with('"') || text.ends_with('\u{201D}');
        let next_text = next.text.trim_start();
        let opens_quote = next_text.starts_with('"') || next_text.starts_with('\u{201C}');
        closes_quote && !opens_quote
    }
}
