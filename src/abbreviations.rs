// WHY: the rule segmenter and the complexity tagger must agree on what counts as an abbreviation,
// otherwise regions tagged "abbreviation" would not be the ones the baseline mis-splits

use std::collections::HashSet;

/// Titles that precede proper nouns ("Dr. Smith") and must not end a sentence
pub const TITLE_ABBREVIATIONS: &[&str] = &["Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Sr.", "Jr."];

/// Common inline abbreviations that mark a region as abbreviation-heavy
pub const INLINE_ABBREVIATIONS: &[&str] = &["etc.", "vs.", "i.e.", "e.g."];

pub struct AbbreviationChecker {
    titles: HashSet<&'static str>,
}

impl AbbreviationChecker {
    pub fn new() -> Self {
        Self {
            titles: TITLE_ABBREVIATIONS.iter().copied().collect(),
        }
    }

    pub fn is_title_abbreviation(&self, word: &str) -> bool {
        self.titles.contains(word)
    }

    /// Whether the text before a candidate boundary ends in a title or a single-letter initial
    pub fn suppresses_boundary(&self, text: &str) -> bool {
        let Some(last_word) = text.split_whitespace().last() else {
            return false;
        };
        let word = last_word.trim_start_matches(|c: char| {
            matches!(c, '"' | '\'' | '(' | '[' | '\u{201C}' | '\u{2018}')
        });

        if self.is_title_abbreviation(word) {
            return true;
        }

        // "J." in "J. R. R. Tolkien"
        let mut chars = word.chars();
        matches!((chars.next(), chars.next(), chars.next()), (Some(c), Some('.'), None) if c.is_uppercase())
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Alternation of every abbreviation with dots escaped, for embedding in rule patterns
pub fn abbreviation_alternation() -> String {
    TITLE_ABBREVIATIONS
        .iter()
        .chain(INLINE_ABBREVIATIONS)
        .map(|abbr| abbr.replace('.', r"\."))
        .collect::<Vec<_>>()
        .join("|")
}
