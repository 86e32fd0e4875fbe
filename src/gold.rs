// src/gold.rs
//! Gold-label fusion: human corrections override heuristic sentiment.
//!
//! The gold table needs `id` and `sentimiento_gold`. Blank gold cells are
//! ignored; any other value must be one of pos/neg/neu or the whole fusion
//! is rejected. Confidence and rationale of fused rows are left as they were.

use crate::corpus::{Corpus, COL_ID};
use crate::diet::Diet;
use crate::error::{AnnotateError, Result};
use crate::sentiment::Polarity;
use csv::ReaderBuilder;
use std::collections::{BTreeMap, HashMap};
use std::io;
use tracing::{info, warn};

pub const COL_GOLD: &str = "sentimiento_gold";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoldLabels {
    labels: HashMap<String, Polarity>,
}

impl GoldLabels {
    pub fn from_reader<R: io::Read>(reader: R, input: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);
        let id_col = position(COL_ID).ok_or_else(|| AnnotateError::missing_column(COL_ID, input))?;
        let gold_col =
            position(COL_GOLD).ok_or_else(|| AnnotateError::missing_column(COL_GOLD, input))?;

        let mut labels = HashMap::new();
        let mut bad: Vec<String> = Vec::new();
        let mut duplicates = 0usize;
        for rec in rdr.records() {
            let rec = rec?;
            let id = rec.get(id_col).unwrap_or("").trim();
            let raw = rec.get(gold_col).unwrap_or("").trim();
            if id.is_empty() || raw.is_empty() {
                continue;
            }
            match raw.parse::<Polarity>() {
                Ok(p) => {
                    if labels.contains_key(id) {
                        duplicates += 1;
                    } else {
                        labels.insert(id.to_string(), p);
                    }
                }
                Err(_) => bad.push(raw.to_string()),
            }
        }

        if !bad.is_empty() {
            let count = bad.len();
            bad.sort();
            bad.dedup();
            bad.truncate(5);
            return Err(AnnotateError::InvalidGoldLabels { count, sample: bad });
        }
        if duplicates > 0 {
            warn!(duplicates, "duplicate gold ids, keeping the first label");
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Polarity> {
        self.labels.get(id).copied()
    }
}

/// Outcome of a fusion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FusionSummary {
    pub applied: usize,
    pub changed: usize,
    pub by_label: BTreeMap<String, usize>,
    pub by_diet: BTreeMap<(String, String), usize>,
}

/// Replace `sentimiento` wherever a gold label exists for the id.
pub fn fuse(corpus: &mut Corpus, gold: &GoldLabels) -> FusionSummary {
    let mut summary = FusionSummary::default();
    for d in &mut corpus.documents {
        if let Some(label) = gold.get(&d.id) {
            summary.applied += 1;
            if d.sentiment != Some(label) {
                summary.changed += 1;
            }
            d.sentiment = Some(label);
        }
        *summary
            .by_label
            .entry(d.sentiment_key().to_string())
            .or_default() += 1;
        if let Some(diet) = d.diet_heuristic {
            *summary
                .by_diet
                .entry((Diet::as_str(diet).to_string(), d.sentiment_key().to_string()))
                .or_default() += 1;
        }
    }
    info!(
        applied = summary.applied,
        changed = summary.changed,
        labels = ?summary.by_label,
        by_diet = ?summary.by_diet,
        "gold labels fused"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;

    #[test]
    fn gold_overrides_heuristic_label() {
        let gold_csv = "id,texto_raw,sentimiento_gold\n1,x,neg\n2,y,\n3,z,pos\n1,x,pos\n";
        let gold = GoldLabels::from_reader(gold_csv.as_bytes(), "gold").unwrap();
        assert_eq!(gold.len(), 2);
        assert_eq!(gold.get("1"), Some(Polarity::Neg));

        let mut a = Document::new("1", "x");
        a.sentiment = Some(Polarity::Pos);
        a.sentiment_confidence = 0.75;
        a.diet_heuristic = Some(Diet::Keto);
        let mut b = Document::new("2", "y");
        b.sentiment = Some(Polarity::Neu);
        let mut corpus = Corpus::from_documents(vec![a, b]);

        let s = fuse(&mut corpus, &gold);
        assert_eq!(s.applied, 1);
        assert_eq!(s.changed, 1);
        assert_eq!(corpus.documents[0].sentiment, Some(Polarity::Neg));
        assert_eq!(corpus.documents[0].sentiment_confidence, 0.75);
        assert_eq!(corpus.documents[1].sentiment, Some(Polarity::Neu));
        assert_eq!(s.by_diet[&("keto".to_string(), "neg".to_string())], 1);
    }

    #[test]
    fn invalid_gold_labels_abort() {
        let gold_csv = "id,sentimiento_gold\n1,positivo\n2,neg\n3,??\n";
        match GoldLabels::from_reader(gold_csv.as_bytes(), "gold") {
            Err(AnnotateError::InvalidGoldLabels { count, sample }) => {
                assert_eq!(count, 2);
                assert_eq!(sample, vec!["??".to_string(), "positivo".to_string()]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn gold_column_is_required() {
        let err = GoldLabels::from_reader("id,label\n1,pos\n".as_bytes(), "g.csv").unwrap_err();
        assert!(err.to_string().contains("sentimiento_gold"));
    }
}
