// src/config/mod.rs
//! Engine configuration (lexicons, windows, thresholds, paths).
//!
//! Loaded from TOML with the following resolution order:
//! 1) `$ANNOTATOR_CONFIG_PATH` (must exist)
//! 2) `config/annotator.toml`
//! 3) built-in defaults
//!
//! Every section is `#[serde(default)]`, so a file may override only what it
//! cares about. The loaded value is immutable and handed to each component at
//! construction.

mod defaults;

use crate::aspects::Aspect;
use crate::diet::Diet;
use crate::error::{AnnotateError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/annotator.toml";
pub const ENV_CONFIG_PATH: &str = "ANNOTATOR_CONFIG_PATH";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    pub negation: NegationConfig,
    pub diets: DietConfig,
    pub sentiment: SentimentConfig,
    pub confidence: ConfidenceWeights,
    pub aspects: AspectConfig,
    pub sampling: SamplingConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NegationConfig {
    pub cues: Vec<String>,
    /// Number of tokens marked after a cue.
    pub window: usize,
    /// Tokens that close an active window and are never marked.
    pub scope_resets: Vec<String>,
}

impl Default for NegationConfig {
    fn default() -> Self {
        Self {
            cues: defaults::negation_cues(),
            window: 3,
            scope_resets: defaults::scope_resets(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DietConfig {
    /// Tie-break order when several categories match.
    pub priority: Vec<Diet>,
    /// Ordered surface-form regexes per category (matched case-insensitively).
    pub patterns: BTreeMap<Diet, Vec<String>>,
}

impl Default for DietConfig {
    fn default() -> Self {
        Self {
            priority: Diet::ALL.to_vec(),
            patterns: defaults::diet_patterns(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub intensifiers: Vec<String>,
    pub attenuators: Vec<String>,
    pub contrast: Vec<String>,
    pub rating_confidence: f32,
    pub question_confidence: f32,
    /// Negated-token count at which a positive reading flips to negative.
    pub negation_override_min: usize,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            positive: defaults::positive_lexicon(),
            negative: defaults::negative_lexicon(),
            intensifiers: defaults::intensifiers(),
            attenuators: defaults::attenuators(),
            contrast: defaults::contrast_connectors(),
            rating_confidence: 0.9,
            question_confidence: 0.4,
            negation_override_min: 2,
        }
    }
}

/// Additive confidence terms for the heuristic path.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub base: f32,
    pub exclusive_vote: f32,
    pub intensifier: f32,
    pub attenuator: f32,
    pub last_clause: f32,
    pub negation_bias: f32,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            base: 0.6,
            exclusive_vote: 0.15,
            intensifier: 0.1,
            attenuator: 0.1,
            last_clause: 0.05,
            negation_bias: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AspectConfig {
    pub lexicons: BTreeMap<Aspect, Vec<String>>,
    /// Example phrases kept per polarity per (aspect, diet) cell.
    pub examples_per_cell: usize,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            lexicons: defaults::aspect_lexicons(),
            examples_per_cell: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub per_cell: usize,
    pub seed: u64,
    pub hard_cap: usize,
    pub hard_confidence_max: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            per_cell: 25,
            seed: 42,
            hard_cap: 400,
            hard_confidence_max: 0.6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub reports_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/interim"),
            reports_dir: PathBuf::from("reports"),
        }
    }
}

impl AnnotatorConfig {
    /// Resolve and load the configuration (env → default path → built-in).
    pub fn load() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let path = PathBuf::from(p);
            if !path.exists() {
                return Err(AnnotateError::Config(format!(
                    "{ENV_CONFIG_PATH} points to non-existent path {}",
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }
        let default = Path::new(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::load_from(default);
        }
        info!("no config file found, using built-in lexicons");
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&content)
            .map_err(|e| AnnotateError::Config(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), "loaded annotator config");
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).map_err(|e| AnnotateError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject vocabularies that would make a stage meaningless.
    pub fn validate(&self) -> Result<()> {
        let empty = |what: &str| Err(AnnotateError::EmptyVocabulary(what.to_string()));
        if self.negation.cues.is_empty() {
            return empty("negation cues");
        }
        if self.sentiment.positive.is_empty() {
            return empty("positive lexicon");
        }
        if self.sentiment.negative.is_empty() {
            return empty("negative lexicon");
        }
        if self.diets.patterns.values().all(Vec::is_empty) {
            return empty("diet patterns");
        }
        if self.aspects.lexicons.values().all(Vec::is_empty) {
            return empty("aspect lexicons");
        }
        Ok(())
    }
}
