// src/sampler.rs
//! Correction samples for human gold labeling.
//!
//! - Balanced: group by (diet or `sin_dieta`, provisional sentiment or `unk`),
//!   draw up to `per_cell` documents per group without replacement, groups
//!   visited in lexicographic key order, duplicate ids dropped.
//! - Hard cases: low confidence or a contrastive connector in `texto_proc`,
//!   capped by a seeded draw.
//!
//! Every draw uses a fresh RNG seeded with the configured seed, so membership
//! is reproducible. Samples borrow from the corpus and never mutate it.

use crate::analyze::clauses::ClauseSplitter;
use crate::config::SamplingConfig;
use crate::corpus::{Document, NO_DIET};
use crate::sentiment::Rationale;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// (diet key, provisional sentiment key)
pub type CellKey = (&'static str, &'static str);

#[derive(Debug, Clone)]
pub struct BalancedSample<'a> {
    pub rows: Vec<(CellKey, &'a Document)>,
}

#[derive(Debug, Clone)]
pub struct HardSample<'a> {
    pub rows: Vec<&'a Document>,
    /// Candidates before the cap was applied.
    pub candidates: usize,
}

/// Informed balanced row: carries the heuristic labels as annotation context.
#[derive(Debug, Serialize)]
pub struct InformedRow<'a> {
    pub id: &'a str,
    pub texto_raw: &'a str,
    pub texto_proc: &'a str,
    pub dieta_heuristica: &'a str,
    pub sent_prov: &'a str,
    pub sentimiento_gold: &'a str,
}

/// Blind balanced row: identifiers and text only.
#[derive(Debug, Serialize)]
pub struct BlindRow<'a> {
    pub id: &'a str,
    pub texto_raw: &'a str,
    pub texto_proc: &'a str,
    pub sentimiento_gold: &'a str,
}

#[derive(Debug, Serialize)]
pub struct HardRow<'a> {
    pub id: &'a str,
    pub texto_raw: &'a str,
    pub texto_proc: &'a str,
    pub dieta_heuristica: &'a str,
    pub sentimiento: &'a str,
    pub sent_conf: String,
    pub sent_why: String,
    pub sentimiento_gold: &'a str,
}

impl<'a> BalancedSample<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.rows.iter().map(|(_, d)| d.id.as_str()).collect()
    }

    pub fn informed_rows(&self) -> Vec<InformedRow<'a>> {
        self.rows
            .iter()
            .map(|&((diet, sent), d)| InformedRow {
                id: &d.id,
                texto_raw: &d.text_raw,
                texto_proc: &d.text_processed,
                dieta_heuristica: diet,
                sent_prov: sent,
                sentimiento_gold: "",
            })
            .collect()
    }

    pub fn blind_rows(&self) -> Vec<BlindRow<'a>> {
        self.rows
            .iter()
            .map(|&(_, d)| BlindRow {
                id: &d.id,
                texto_raw: &d.text_raw,
                texto_proc: &d.text_processed,
                sentimiento_gold: "",
            })
            .collect()
    }
}

impl<'a> HardSample<'a> {
    pub fn ids(&self) -> Vec<&'a str> {
        self.rows.iter().map(|d| d.id.as_str()).collect()
    }

    pub fn output_rows(&self) -> Vec<HardRow<'a>> {
        self.rows
            .iter()
            .map(|&d| HardRow {
                id: &d.id,
                texto_raw: &d.text_raw,
                texto_proc: &d.text_processed,
                dieta_heuristica: d.diet_heuristic.map_or(NO_DIET, |x| x.as_str()),
                sentimiento: d.sentiment.map_or("", |p| p.as_str()),
                sent_conf: format!("{:.2}", d.sentiment_confidence),
                sent_why: d.sentiment_rationale.to_string(),
                sentimiento_gold: "",
            })
            .collect()
    }
}

/// Seeded draw of `k` distinct positions out of `n`; all of them, in order, when `k >= n`.
fn draw(n: usize, k: usize, seed: u64) -> Vec<usize> {
    if k >= n {
        return (0..n).collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    index::sample(&mut rng, n, k).into_vec()
}

#[derive(Debug, Clone)]
pub struct AnnotationSampler {
    cfg: SamplingConfig,
    contrast: ClauseSplitter,
}

impl AnnotationSampler {
    pub fn new(cfg: SamplingConfig, contrast: ClauseSplitter) -> Self {
        Self { cfg, contrast }
    }

    pub fn balanced<'a>(&self, docs: &'a [Document]) -> BalancedSample<'a> {
        let mut groups: BTreeMap<CellKey, Vec<&'a Document>> = BTreeMap::new();
        for d in docs {
            groups
                .entry((d.diet_key(), d.sentiment_key()))
                .or_default()
                .push(d);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut rows = Vec::new();
        for (key, members) in &groups {
            let picked = draw(members.len(), self.cfg.per_cell, self.cfg.seed);
            if members.len() < self.cfg.per_cell {
                debug!(diet = key.0, sentiment = key.1, available = members.len(), "short cell, taking all");
            }
            for i in picked {
                let d = members[i];
                if seen.insert(d.id.as_str()) {
                    rows.push((*key, d));
                }
            }
        }
        BalancedSample { rows }
    }

    /// Low confidence (including unlabeled rows) or a contrastive connector.
    pub fn is_hard(&self, d: &Document) -> bool {
        let conf = match d.sentiment_rationale {
            Rationale::Unscored => 0.0,
            _ => d.sentiment_confidence,
        };
        conf <= self.cfg.hard_confidence_max || self.contrast.has_connector(&d.text_processed)
    }

    pub fn hard_cases<'a>(&self, docs: &'a [Document]) -> HardSample<'a> {
        let candidates: Vec<&'a Document> = docs.iter().filter(|d| self.is_hard(d)).collect();
        let rows = draw(candidates.len(), self.cfg.hard_cap, self.cfg.seed)
            .into_iter()
            .map(|i| candidates[i])
            .collect();
        HardSample {
            rows,
            candidates: candidates.len(),
        }
    }
}
