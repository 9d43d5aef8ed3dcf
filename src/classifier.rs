// WHY: the verdict is a pure function of the segmentations and one threshold, so it can be
// re-run on stored records and tested without any I/O

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aligner::equivalent;

/// How the primary segmentation relates to the reference segmentations of one region
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisagreementKind {
    NoDisagreement,
    /// References agree with each other, primary matches neither
    PrimaryVsBoth,
    PrimaryVsA,
    PrimaryVsB,
    AllDisagree,
    /// Reference has more sentences than the primary
    OverSplit,
    /// Reference has fewer sentences than the primary
    UnderSplit,
    DifferentBoundaries,
}

impl DisagreementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisagreementKind::NoDisagreement => "NO_DISAGREEMENT",
            DisagreementKind::PrimaryVsBoth => "PRIMARY_VS_BOTH",
            DisagreementKind::PrimaryVsA => "PRIMARY_VS_A",
            DisagreementKind::PrimaryVsB => "PRIMARY_VS_B",
            DisagreementKind::AllDisagree => "ALL_DISAGREE",
            DisagreementKind::OverSplit => "OVER_SPLIT",
            DisagreementKind::UnderSplit => "UNDER_SPLIT",
            DisagreementKind::DifferentBoundaries => "DIFFERENT_BOUNDARIES",
        }
    }

    pub fn is_disagreement(&self) -> bool {
        *self != DisagreementKind::NoDisagreement
    }

    /// Review priority: both references against the primary is the strongest signal of a
    /// primary-method error
    pub fn priority(&self) -> Priority {
        match self {
            DisagreementKind::NoDisagreement => Priority::None,
            DisagreementKind::PrimaryVsBoth => Priority::High,
            _ => Priority::Medium,
        }
    }
}

impl fmt::Display for DisagreementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    None,
}

/// Classify the primary against two references
///
/// Primary equivalent to both references wins even if the references disagree with each other.
pub fn classify_three_way<P, A, B>(primary: &[P], ref_a: &[A], ref_b: &[B], threshold: f64) -> DisagreementKind
where
    P: AsRef<str>,
    A: AsRef<str>,
    B: AsRef<str>,
{
    let primary_a = equivalent(primary, ref_a, threshold);
    let primary_b = equivalent(primary, ref_b, threshold);

    match (primary_a, primary_b) {
        (true, true) => DisagreementKind::NoDisagreement,
        (true, false) => DisagreementKind::PrimaryVsB,
        (false, true) => DisagreementKind::PrimaryVsA,
        (false, false) => {
            if equivalent(ref_a, ref_b, threshold) {
                DisagreementKind::PrimaryVsBoth
            } else {
                DisagreementKind::AllDisagree
            }
        }
    }
}

/// Classify the primary against a single reference by sentence-count relation
pub fn classify_two_way<P, O>(primary: &[P], other: &[O], threshold: f64) -> DisagreementKind
where
    P: AsRef<str>,
    O: AsRef<str>,
{
    if equivalent(primary, other, threshold) {
        return DisagreementKind::NoDisagreement;
    }

    match other.len().cmp(&primary.len()) {
        std::cmp::Ordering::Greater => DisagreementKind::OverSplit,
        std::cmp::Ordering::Less => DisagreementKind::UnderSplit,
        std::cmp::Ordering::Equal => DisagreementKind::DifferentBoundaries,
    }
}
