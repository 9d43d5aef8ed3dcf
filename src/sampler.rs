// WHY: one owned, seeded generator is the only randomness in a run; every draw goes through it in
// a fixed order so the same corpus and seed always produce the same dataset

use rand::seq::{index, SliceRandom};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::analysis::DisagreementRecord;
use crate::classifier::DisagreementKind;
use crate::complexity::ComplexityTag;

/// Category a record is balanced on
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StratumKey {
    pub kind: DisagreementKind,
    pub tags: BTreeSet<ComplexityTag>,
    pub comparison_method: String,
}

impl StratumKey {
    pub fn of(record: &DisagreementRecord) -> Self {
        Self {
            kind: record.kind,
            tags: record.tags.clone(),
            comparison_method: record.comparison_method.clone(),
        }
    }
}

impl fmt::Display for StratumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags = if self.tags.is_empty() {
            "none".to_string()
        } else {
            self.tags.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(",")
        };
        write!(f, "{}|{}|{}", self.kind, tags, self.comparison_method)
    }
}

/// Record chosen for the dataset
#[derive(Debug, Clone)]
pub struct GoldExample {
    pub id: usize,
    pub stratum: StratumKey,
    pub record: DisagreementRecord,
}

pub struct Sampler {
    rng: ChaCha8Rng,
}

impl Sampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Reproducible subset of at most `max` items, kept in their original order
    pub fn select_files<T: Clone>(&mut self, items: &[T], max: usize) -> Vec<T> {
        if items.len() <= max {
            return items.to_vec();
        }

        let mut picked = index::sample(&mut self.rng, items.len(), max).into_vec();
        picked.sort_unstable();
        picked.into_iter().map(|idx| items[idx].clone()).collect()
    }

    /// Draw `min(n, records.len())` records balanced across strata, in shuffled order
    ///
    /// Each stratum contributes up to `n / strata` records; any shortfall is filled uniformly
    /// from the records not yet chosen.
    pub fn sample(&mut self, records: Vec<DisagreementRecord>, n: usize) -> Vec<GoldExample> {
        if records.is_empty() || n == 0 {
            return Vec::new();
        }

        let mut strata: BTreeMap<StratumKey, Vec<usize>> = BTreeMap::new();
        for (idx, record) in records.iter().enumerate() {
            strata.entry(StratumKey::of(record)).or_default().push(idx);
        }

        let per_stratum = n / strata.len();
        let mut chosen = vec![false; records.len()];
        let mut selected = Vec::with_capacity(n.min(records.len()));

        for members in strata.values() {
            let take = per_stratum.min(members.len());
            for pos in index::sample(&mut self.rng, members.len(), take).into_iter() {
                chosen[members[pos]] = true;
                selected.push(members[pos]);
            }
        }

        if selected.len() < n {
            let remaining: Vec<usize> = (0..records.len()).filter(|idx| !chosen[*idx]).collect();
            let extra = (n - selected.len()).min(remaining.len());
            for pos in index::sample(&mut self.rng, remaining.len(), extra).into_iter() {
                selected.push(remaining[pos]);
            }
        }

        selected.shuffle(&mut self.rng);

        let mut slots: Vec<Option<DisagreementRecord>> = records.into_iter().map(Some).collect();
        numbered(selected.into_iter().filter_map(|idx| slots[idx].take()).collect())
    }
}

/// Every `HIGH` record then every `MEDIUM` record, each in input order, truncated to `n`
pub fn prioritized(records: Vec<DisagreementRecord>, n: usize) -> Vec<GoldExample> {
    let mut records = records;
    // stable, so discovery order survives within a priority
    records.sort_by_key(|record| record.kind.priority());
    records.truncate(n);
    numbered(records)
}

/// Every record in input order
pub fn all(records: Vec<DisagreementRecord>) -> Vec<GoldExample> {
    numbered(records)
}

fn numbered(records: Vec<DisagreementRecord>) -> Vec<GoldExample> {
    records
        .into_iter()
        .enumerate()
        .map(|(id, record)| GoldExample {
            id,
            stratum: StratumKey::of(&record),
            record,
        })
        .collect()
}
