// WHY: tags only steer stratification and reviewer attention; keeping them as one rule table
// means adding a tag is a single row, never a new branch in the analysis code

use regex_automata::meta::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::abbreviations::abbreviation_alternation;
use crate::error::Result;

const ATTRIBUTION_VERBS: &str = "said|asked|replied|shouted|whispered";

/// Linguistic feature present in a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTag {
    Dialog,
    Abbreviation,
    Complex,
    Parenthetical,
    HardSeparator,
    DialogAttribution,
    ComplexPunctuation,
    QuoteParenthetical,
}

impl ComplexityTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityTag::Dialog => "dialog",
            ComplexityTag::Abbreviation => "abbreviation",
            ComplexityTag::Complex => "complex",
            ComplexityTag::Parenthetical => "parenthetical",
            ComplexityTag::HardSeparator => "hard_separator",
            ComplexityTag::DialogAttribution => "dialog_attribution",
            ComplexityTag::ComplexPunctuation => "complex_punctuation",
            ComplexityTag::QuoteParenthetical => "quote_parenthetical",
        }
    }
}

impl fmt::Display for ComplexityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn rule_patterns() -> Vec<(ComplexityTag, String)> {
    vec![
        (
            ComplexityTag::Dialog,
            format!(r#"["\u{{201C}}\u{{201D}}]|(?:^|[\s(\[])['\u{{2018}}]\w|(?i:\b(?:{ATTRIBUTION_VERBS})\b)"#),
        ),
        (
            ComplexityTag::Abbreviation,
            format!(r"\b[A-Z]\.|(?:^|\W)(?:{})", abbreviation_alternation()),
        ),
        (
            ComplexityTag::Complex,
            r"[;:()]|--|(?i:\b(?:however|therefore|nevertheless|furthermore|moreover)\b)".to_string(),
        ),
        (ComplexityTag::Parenthetical, r"\([^()]*\)".to_string()),
        (ComplexityTag::HardSeparator, r"\r?\n[ \t]*\r?\n".to_string()),
        (
            ComplexityTag::DialogAttribution,
            format!(r#"["\u{{201D}}]\s*[,;]?\s*\w+\s+(?i:{ATTRIBUTION_VERBS})\b"#),
        ),
        (
            ComplexityTag::ComplexPunctuation,
            r"\.\.\.|\u{2026}|\u{2014}|\u{2013}".to_string(),
        ),
        (
            ComplexityTag::QuoteParenthetical,
            r#"["\u{201D}]\s*\([^)]*\)"#.to_string(),
        ),
    ]
}

/// Evaluates every rule against a region's verbatim text
pub struct ComplexityTagger {
    rules: Vec<(ComplexityTag, Regex)>,
}

impl ComplexityTagger {
    pub fn new() -> Result<Self> {
        let mut rules = Vec::new();
        for (tag, pattern) in rule_patterns() {
            rules.push((tag, Regex::new(&pattern)?));
        }
        Ok(Self { rules })
    }

    pub fn tag(&self, text: &str) -> BTreeSet<ComplexityTag> {
        self.rules
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(tag, _)| *tag)
            .collect()
    }
}
