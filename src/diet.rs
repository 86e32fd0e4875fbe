// src/diet.rs
//! Diet classifier: prioritized regex pattern sets over `texto_raw`.
//!
//! Every category whose ordered pattern list finds a hit anywhere in the text
//! lands in `matched`. The primary label is the first entry of the priority
//! list that is present in `matched`, so priority order (not match order)
//! decides ties.

use crate::config::DietConfig;
use crate::error::{AnnotateError, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of diet categories. Declaration order is the default priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Diet {
    Ayuno,
    Keto,
    Flexible,
    Mediterranea,
    Paleo,
    Vegana,
}

impl Diet {
    pub const ALL: [Diet; 6] = [
        Diet::Ayuno,
        Diet::Keto,
        Diet::Flexible,
        Diet::Mediterranea,
        Diet::Paleo,
        Diet::Vegana,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Diet::Ayuno => "ayuno",
            Diet::Keto => "keto",
            Diet::Flexible => "flexible",
            Diet::Mediterranea => "mediterranea",
            Diet::Paleo => "paleo",
            Diet::Vegana => "vegana",
        }
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Diet {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ayuno" => Ok(Diet::Ayuno),
            "keto" => Ok(Diet::Keto),
            "flexible" => Ok(Diet::Flexible),
            "mediterranea" | "mediterránea" => Ok(Diet::Mediterranea),
            "paleo" => Ok(Diet::Paleo),
            "vegana" => Ok(Diet::Vegana),
            other => Err(format!("unknown diet `{other}`")),
        }
    }
}

/// Result of classifying one text.
///
/// Invariant: `primary`, when set, is a member of `matched`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DietMatch {
    pub primary: Option<Diet>,
    /// Matching categories in category order.
    pub matched: Vec<Diet>,
}

#[derive(Debug)]
struct CompiledCategory {
    diet: Diet,
    patterns: Vec<Regex>,
}

#[derive(Debug)]
pub struct DietClassifier {
    priority: Vec<Diet>,
    categories: Vec<CompiledCategory>,
}

impl DietClassifier {
    /// Compile all patterns. Fails on a bad regex or when no category has any pattern.
    pub fn new(cfg: &DietConfig) -> Result<Self> {
        let categories = cfg
            .patterns
            .iter()
            .filter(|(_, pats)| !pats.is_empty())
            .map(|(&diet, pats)| {
                let patterns = pats
                    .iter()
                    .map(|p| {
                        RegexBuilder::new(p)
                            .case_insensitive(true)
                            .build()
                            .map_err(|source| AnnotateError::Pattern {
                                diet: diet.to_string(),
                                pattern: p.clone(),
                                source,
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledCategory { diet, patterns })
            })
            .collect::<Result<Vec<_>>>()?;

        if categories.is_empty() {
            return Err(AnnotateError::EmptyVocabulary("diet patterns".into()));
        }

        Ok(Self {
            priority: cfg.priority.clone(),
            categories,
        })
    }

    pub fn classify(&self, text_raw: &str) -> DietMatch {
        let matched: Vec<Diet> = self
            .categories
            .iter()
            .filter(|c| c.patterns.iter().any(|re| re.is_match(text_raw)))
            .map(|c| c.diet)
            .collect();

        if matched.is_empty() {
            return DietMatch::default();
        }

        let primary = self
            .priority
            .iter()
            .copied()
            .find(|d| matched.contains(d))
            // a category left out of the priority list still resolves
            .or_else(|| matched.first().copied());

        DietMatch { primary, matched }
    }
}
