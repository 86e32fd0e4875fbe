// src/aspects.rs
//! Aspect extraction and the diet × aspect sentiment matrix.
//!
//! `texto_proc` is split into phrases on sentence punctuation followed by
//! whitespace. Each phrase is matched against every aspect lexicon and gets
//! the phrase-level polarity (plain lexicon vote). One record is emitted per
//! (phrase, aspect) pair, tagged with the document's primary diet.

use crate::config::AspectConfig;
use crate::diet::Diet;
use crate::error::{AnnotateError, Result};
use crate::lexicon::Lexicon;
use crate::sentiment::{Polarity, SentimentHeuristic};
use crate::text::whitespace_tokens;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

static PHRASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").expect("phrase regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Aspect {
    #[serde(rename = "hambre")]
    Hambre,
    #[serde(rename = "energía", alias = "energia")]
    Energia,
    #[serde(rename = "adherencia")]
    Adherencia,
    #[serde(rename = "costo")]
    Costo,
    #[serde(rename = "social")]
    Social,
}

impl Aspect {
    pub const ALL: [Aspect; 5] = [
        Aspect::Hambre,
        Aspect::Energia,
        Aspect::Adherencia,
        Aspect::Costo,
        Aspect::Social,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Aspect::Hambre => "hambre",
            Aspect::Energia => "energía",
            Aspect::Adherencia => "adherencia",
            Aspect::Costo => "costo",
            Aspect::Social => "social",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectMatch {
    pub diet: Diet,
    pub phrase: String,
    pub aspect: Aspect,
    pub sentiment: Polarity,
}

/// Split processed text into phrase units.
pub fn phrases(text: &str) -> Vec<&str> {
    PHRASE_RE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

#[derive(Debug, Clone)]
pub struct AspectExtractor {
    lexicons: Vec<(Aspect, Lexicon)>,
    sentiment: SentimentHeuristic,
}

impl AspectExtractor {
    pub fn new(cfg: &AspectConfig, sentiment: SentimentHeuristic) -> Result<Self> {
        let lexicons: Vec<(Aspect, Lexicon)> = cfg
            .lexicons
            .iter()
            .map(|(&a, words)| (a, Lexicon::new(words)))
            .filter(|(_, lex)| !lex.is_empty())
            .collect();
        if lexicons.is_empty() {
            return Err(AnnotateError::EmptyVocabulary("aspect lexicons".into()));
        }
        Ok(Self { lexicons, sentiment })
    }

    /// Aspects present in one phrase, in aspect order.
    pub fn aspects_in(&self, phrase: &str) -> Vec<Aspect> {
        let lower = phrase.to_lowercase();
        let tokens = whitespace_tokens(&lower);
        self.lexicons
            .iter()
            .filter(|(_, lex)| lex.matches(&tokens))
            .map(|(a, _)| *a)
            .collect()
    }

    pub fn extract(&self, diet: Diet, text_processed: &str) -> Vec<AspectMatch> {
        let mut out = Vec::new();
        for phrase in phrases(text_processed) {
            let present = self.aspects_in(phrase);
            if present.is_empty() {
                continue;
            }
            let sentiment = self.sentiment.phrase_polarity(phrase);
            for aspect in present {
                out.push(AspectMatch {
                    diet,
                    phrase: phrase.to_string(),
                    aspect,
                    sentiment,
                });
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStats {
    pub pos: usize,
    pub neg: usize,
    pub neu: usize,
    pub pos_examples: Vec<String>,
    pub neg_examples: Vec<String>,
}

impl CellStats {
    pub fn total(&self) -> usize {
        self.pos + self.neg + self.neu
    }

    /// Share of positive records minus share of negative records; 0.0 when empty.
    pub fn score(&self) -> f64 {
        let n = self.total();
        if n == 0 {
            return 0.0;
        }
        (self.pos as f64 - self.neg as f64) / n as f64
    }
}

/// Aggregate keyed by (aspect, diet). Counts are order-independent; examples
/// keep the first phrases seen, so feed records in corpus order.
#[derive(Debug, Clone)]
pub struct AspectMatrix {
    cells: BTreeMap<(Aspect, Diet), CellStats>,
    examples_per_cell: usize,
}

impl AspectMatrix {
    pub fn new(examples_per_cell: usize) -> Self {
        Self {
            cells: BTreeMap::new(),
            examples_per_cell,
        }
    }

    pub fn from_matches<'a, I>(matches: I, examples_per_cell: usize) -> Self
    where
        I: IntoIterator<Item = &'a AspectMatch>,
    {
        let mut m = Self::new(examples_per_cell);
        for r in matches {
            m.add(r);
        }
        m
    }

    pub fn add(&mut self, r: &AspectMatch) {
        let cap = self.examples_per_cell;
        let cell = self.cells.entry((r.aspect, r.diet)).or_default();
        match r.sentiment {
            Polarity::Pos => {
                cell.pos += 1;
                if cell.pos_examples.len() < cap {
                    cell.pos_examples.push(r.phrase.clone());
                }
            }
            Polarity::Neg => {
                cell.neg += 1;
                if cell.neg_examples.len() < cap {
                    cell.neg_examples.push(r.phrase.clone());
                }
            }
            Polarity::Neu => cell.neu += 1,
        }
    }

    pub fn cell(&self, aspect: Aspect, diet: Diet) -> Option<&CellStats> {
        self.cells.get(&(aspect, diet))
    }

    pub fn score(&self, aspect: Aspect, diet: Diet) -> f64 {
        self.cell(aspect, diet).map_or(0.0, CellStats::score)
    }

    pub fn count(&self, aspect: Aspect, diet: Diet) -> usize {
        self.cell(aspect, diet).map_or(0, CellStats::total)
    }

    /// Non-empty cells in (aspect, diet) order.
    pub fn cells(&self) -> impl Iterator<Item = (&(Aspect, Diet), &CellStats)> {
        self.cells.iter()
    }

    pub fn total_records(&self) -> usize {
        self.cells.values().map(CellStats::total).sum()
    }
}
