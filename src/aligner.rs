// WHY: methods never agree byte-for-byte, so "same segmentation" is a similarity judgement over
// normalized text; count mismatches short-circuit before the expensive comparison

use std::collections::{HashMap, HashSet};

use crate::config::AlignmentConfig;
use crate::document::Span;
use crate::normalization::join_normalized;
use crate::tagged::TaggedSentence;

/// Default ratio at which two segmentations count as the same
pub const DEFAULT_EQUIVALENCE_THRESHOLD: f64 = 0.9;

/// Gestalt (Ratcliff/Obershelp) similarity: twice the matched characters over the combined length
///
/// Matched characters are found by taking the longest common substring and recursing on the
/// unmatched text either side of it. Symmetric in practice and bounded in [0, 1]; two empty
/// strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        positions.entry(*ch).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &positions, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        matched += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    matched
}

/// Longest common substring of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`, earliest in `a` on ties
fn longest_match(
    a: &[char],
    positions: &HashMap<char, Vec<usize>>,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0);
    // run length of the match ending at b[j] for the previous row of a
    let mut run_ending: HashMap<usize, usize> = HashMap::new();

    for (i, ch) in a.iter().enumerate().take(a_hi).skip(a_lo) {
        let mut next_run = HashMap::new();
        if let Some(js) = positions.get(ch) {
            for &j in js {
                if j < b_lo {
                    continue;
                }
                if j >= b_hi {
                    break;
                }
                let run = if j > 0 { run_ending.get(&(j - 1)).copied().unwrap_or(0) } else { 0 } + 1;
                next_run.insert(j, run);
                if run > best_size {
                    best_i = i + 1 - run;
                    best_j = j + 1 - run;
                    best_size = run;
                }
            }
        }
        run_ending = next_run;
    }

    (best_i, best_j, best_size)
}

/// Whether two segmentations of the same region are the same segmentation
///
/// Different sentence counts are decisive. Otherwise the whitespace-normalized concatenations
/// must reach `threshold` similarity.
pub fn equivalent<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B], threshold: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }

    similarity_ratio(&join_normalized(a), &join_normalized(b)) >= threshold
}

/// Permissive test for whether a candidate sentence belongs to a region
///
/// False positives are acceptable: output goes to human review.
pub fn overlaps<R: AsRef<str>>(
    candidate: &str,
    references: &[R],
    region_text: &str,
    config: &AlignmentConfig,
) -> bool {
    let candidate_lower = candidate.to_lowercase();
    let region_lower = region_text.to_lowercase();

    if region_lower.contains(&candidate_lower) {
        return true;
    }

    let similar_to_reference = references.iter().any(|reference| {
        similarity_ratio(&candidate_lower, &reference.as_ref().to_lowercase()) > config.overlap_similarity
    });
    if similar_to_reference {
        return true;
    }

    let long_words: HashSet<&str> = candidate_lower
        .split_whitespace()
        .filter(|word| word.chars().count() > 4)
        .collect();
    if long_words.is_empty() {
        return false;
    }

    let region_words: HashSet<&str> = region_lower.split_whitespace().collect();
    let shared = long_words.intersection(&region_words).count();
    shared as f64 / long_words.len() as f64 > config.overlap_word_ratio
}

/// Cursor over a flat reference list, aligned region by region against grouped primary sentences
///
/// Each region searches a bounded window around the cursor and advances it by the number of
/// matched candidates at or past the cursor, so a full pass stays linear in the list length.
#[derive(Debug, Clone)]
pub struct OverlapWindow {
    cursor: usize,
    lookback: usize,
    lookahead: usize,
}

impl OverlapWindow {
    pub fn new(lookback: usize, lookahead: usize) -> Self {
        Self { cursor: 0, lookback, lookahead }
    }

    pub fn from_config(config: &AlignmentConfig) -> Self {
        Self::new(config.overlap_lookback, config.overlap_lookahead)
    }

    /// Candidates overlapping the region described by `primary` and `region_text`, in list order
    pub fn collect<P: AsRef<str>>(
        &mut self,
        candidates: &[TaggedSentence],
        primary: &[P],
        region_text: &str,
        config: &AlignmentConfig,
    ) -> Vec<String> {
        let start = self.cursor.saturating_sub(self.lookback);
        let end = (self.cursor + self.lookahead).min(candidates.len());

        let mut selected = Vec::new();
        let mut consumed = 0;
        for (idx, candidate) in candidates.iter().enumerate().take(end).skip(start) {
            if overlaps(&candidate.text, primary, region_text, config) {
                selected.push(candidate.text.clone());
                if idx >= self.cursor {
                    consumed += 1;
                }
            }
        }

        self.cursor += consumed;
        selected
    }
}

/// Located reference sentences whose start falls inside `region`
///
/// Requires coordinate-monotonic input; returns `None` when any sentence lacks a span.
pub fn select_by_span(candidates: &[TaggedSentence], region: &Span) -> Option<Vec<String>> {
    let spans: Option<Vec<Span>> = candidates.iter().map(|c| c.span).collect();
    let spans = spans?;

    let first = spans.partition_point(|span| span.start() < region.start());
    Some(
        candidates[first..]
            .iter()
            .zip(&spans[first..])
            .take_while(|(_, span)| region.contains_start_of(span))
            .map(|(candidate, _)| candidate.text.clone())
            .collect(),
    )
}
