// WHY: thresholds and reference methods change between dataset builds; keeping them in one
// validated structure lets a TOML file and CLI flags feed the same run

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{GoldError, Result};

/// Full run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldConfig {
    pub dataset: DatasetConfig,
    pub alignment: AlignmentConfig,
    pub chunking: ChunkingConfig,
    pub references: Vec<ReferenceConfig>,
}

impl Default for GoldConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            alignment: AlignmentConfig::default(),
            chunking: ChunkingConfig::default(),
            references: vec![
                ReferenceConfig::new("uax29", ReferenceKind::Uax29),
                ReferenceConfig::new("rule", ReferenceKind::Rule),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Method whose `<stem>_<method>.txt` files drive discovery
    pub primary_method: String,
    pub target_size: usize,
    pub seed: u64,
    /// Cap on analyzed file pairs, drawn reproducibly from the seed
    pub max_files: Option<usize>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            primary_method: "seams".to_string(),
            target_size: 300,
            seed: 42,
            max_files: None,
        }
    }
}

/// Similarity thresholds and search window for aligning segmentations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    pub equivalence_threshold: f64,
    pub overlap_similarity: f64,
    pub overlap_word_ratio: f64,
    pub overlap_lookback: usize,
    pub overlap_lookahead: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            equivalence_threshold: 0.9,
            overlap_similarity: 0.7,
            overlap_word_ratio: 0.5,
            overlap_lookback: 5,
            overlap_lookahead: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_sentences: usize,
    /// Regions with fewer trimmed characters are not compared
    pub min_region_chars: usize,
    /// Skip regions with no lowercase letter (headings, tables of contents)
    pub require_lowercase: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_sentences: 10,
            min_region_chars: 10,
            require_lowercase: true,
        }
    }
}

/// One reference method compared against the primary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: ReferenceKind,
}

impl ReferenceConfig {
    pub fn new(name: impl Into<String>, kind: ReferenceKind) -> Self {
        Self { name: name.into(), kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Unicode sentence boundaries
    Uax29,
    /// Punctuation rules with abbreviation suppression
    Rule,
    /// External program: text on stdin, one sentence per stdout line
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Precomputed `<stem>_<name>.txt` files next to each document
    Annotation,
}

impl GoldConfig {
    /// Load from a TOML file; missing sections fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GoldConfig =
            toml::from_str(content).map_err(|e| GoldError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dataset.primary_method.trim().is_empty() {
            return Err(GoldError::Config("primary_method must not be empty".to_string()));
        }
        if self.references.is_empty() {
            return Err(GoldError::Config("at least one reference method is required".to_string()));
        }

        let mut names = HashSet::new();
        for reference in &self.references {
            if reference.name.trim().is_empty() {
                return Err(GoldError::Config("reference name must not be empty".to_string()));
            }
            if reference.name == self.dataset.primary_method {
                return Err(GoldError::Config(format!(
                    "reference '{}' has the same name as the primary method",
                    reference.name
                )));
            }
            if !names.insert(reference.name.as_str()) {
                return Err(GoldError::Config(format!("duplicate reference name '{}'", reference.name)));
            }
            if let ReferenceKind::Command { program, .. } = &reference.kind {
                if program.trim().is_empty() {
                    return Err(GoldError::Config(format!(
                        "reference '{}' has an empty command",
                        reference.name
                    )));
                }
            }
        }

        let thresholds = [
            ("equivalence_threshold", self.alignment.equivalence_threshold),
            ("overlap_similarity", self.alignment.overlap_similarity),
            ("overlap_word_ratio", self.alignment.overlap_word_ratio),
        ];
        for (name, value) in thresholds {
            if !(value > 0.0 && value <= 1.0) {
                return Err(GoldError::Config(format!("{name} must be in (0, 1], got {value}")));
            }
        }

        if self.chunking.max_sentences == 0 {
            return Err(GoldError::Config("max_sentences must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn reference_names(&self) -> Vec<String> {
        self.references.iter().map(|r| r.name.clone()).collect()
    }
}
