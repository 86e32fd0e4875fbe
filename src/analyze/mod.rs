// src/analyze/mod.rs
//! Annotation pipeline entry: wires negation scoping, diet classification,
//! sentiment heuristics and aspect extraction over a corpus.
//!
//! Order per document:
//! 1) `texto_proc` from the negation scoper (only when the input lacks it)
//! 2) diet labels from `texto_raw`
//! 3) sentiment judgment from rating / `texto_proc`
//!
//! Aspect records are derived afterwards from the enriched corpus.

pub mod clauses;
pub mod scoring;

use crate::aspects::{AspectExtractor, AspectMatch, AspectMatrix};
use crate::config::AnnotatorConfig;
use crate::corpus::{Corpus, Document};
use crate::diet::DietClassifier;
use crate::error::Result;
use crate::negation::NegationScoper;
use crate::sampler::AnnotationSampler;
use crate::sentiment::SentimentHeuristic;
use metrics::counter;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub use crate::analyze::clauses::ClauseSplitter;
pub use crate::analyze::scoring::{heuristic_confidence, ConfidenceInputs};

/// Counts gathered while labeling a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSummary {
    pub documents: usize,
    pub empty_text: usize,
    pub without_diet: usize,
    pub by_sentiment: BTreeMap<&'static str, usize>,
    pub by_diet: BTreeMap<&'static str, usize>,
}

/// All classifiers built once from one immutable configuration.
#[derive(Debug)]
pub struct Annotator {
    scoper: NegationScoper,
    diets: DietClassifier,
    sentiment: SentimentHeuristic,
    aspects: AspectExtractor,
    sampler: AnnotationSampler,
    examples_per_cell: usize,
}

impl Annotator {
    pub fn new(cfg: &AnnotatorConfig) -> Result<Self> {
        cfg.validate()?;
        let sentiment = SentimentHeuristic::new(&cfg.sentiment, cfg.confidence)?;
        let aspects = AspectExtractor::new(&cfg.aspects, sentiment.clone())?;
        let sampler = AnnotationSampler::new(cfg.sampling, sentiment.clauses().clone());
        Ok(Self {
            scoper: NegationScoper::new(&cfg.negation),
            diets: DietClassifier::new(&cfg.diets)?,
            sentiment,
            aspects,
            sampler,
            examples_per_cell: cfg.aspects.examples_per_cell,
        })
    }

    pub fn scoper(&self) -> &NegationScoper {
        &self.scoper
    }

    pub fn diets(&self) -> &DietClassifier {
        &self.diets
    }

    pub fn sentiment(&self) -> &SentimentHeuristic {
        &self.sentiment
    }

    pub fn aspects(&self) -> &AspectExtractor {
        &self.aspects
    }

    pub fn sampler(&self) -> &AnnotationSampler {
        &self.sampler
    }

    /// Build `texto_proc` from `texto_raw` when the input had no such column.
    pub fn ensure_processed(&self, corpus: &mut Corpus) {
        if corpus.schema.has_processed {
            return;
        }
        warn!(
            rows = corpus.len(),
            "no texto_proc column; deriving it from texto_raw (no lemmas)"
        );
        for d in &mut corpus.documents {
            d.text_processed = self.scoper.process_text(&d.text_raw);
        }
        corpus.schema.has_processed = true;
    }

    /// Run the diet classifier when the input carried no diet column.
    pub fn ensure_diets(&self, corpus: &mut Corpus) {
        if corpus.schema.has_diet {
            return;
        }
        for d in &mut corpus.documents {
            self.label_diet(d);
        }
        corpus.schema.has_diet = true;
        let inferred = corpus
            .documents
            .iter()
            .filter(|d| d.diet_heuristic.is_some())
            .count();
        warn!(inferred, "no dieta_heuristica column; inferred from patterns");
    }

    pub fn label_diet(&self, doc: &mut Document) {
        let m = self.diets.classify(&doc.text_raw);
        doc.diet_heuristic = m.primary;
        doc.diets_matched = m.matched;
    }

    pub fn label_sentiment(&self, doc: &mut Document) {
        let j = self
            .sentiment
            .classify(&doc.text_processed, &doc.text_raw, doc.rating);
        doc.sentiment = j.label;
        doc.sentiment_confidence = j.confidence;
        doc.sentiment_rationale = j.rationale;
    }

    pub fn annotate_document(&self, doc: &mut Document) {
        self.label_diet(doc);
        self.label_sentiment(doc);
    }

    /// Enrich every document in place. Idempotent for unchanged input.
    pub fn annotate_corpus(&self, corpus: &mut Corpus) -> LabelSummary {
        self.ensure_processed(corpus);

        let mut summary = LabelSummary::default();
        for d in &mut corpus.documents {
            self.annotate_document(d);

            summary.documents += 1;
            if d.text_processed.trim().is_empty() && d.sentiment.is_none() {
                summary.empty_text += 1;
            }
            *summary.by_sentiment.entry(d.sentiment_key()).or_default() += 1;
            match d.diet_heuristic {
                Some(diet) => *summary.by_diet.entry(diet.as_str()).or_default() += 1,
                None => summary.without_diet += 1,
            }
            counter!("annotator_sentiment_total", "label" => d.sentiment_key()).increment(1);
            counter!("annotator_diet_total", "diet" => d.diet_key()).increment(1);
        }
        corpus.schema.has_diet = true;
        corpus.schema.has_sentiment = true;

        info!(
            documents = summary.documents,
            empty_text = summary.empty_text,
            without_diet = summary.without_diet,
            sentiment = ?summary.by_sentiment,
            "corpus labeled"
        );
        summary
    }

    /// Aspect records in corpus order; documents without a diet are skipped.
    pub fn aspect_matches(&self, corpus: &Corpus) -> Vec<AspectMatch> {
        corpus
            .documents
            .iter()
            .filter_map(|d| d.diet_heuristic.map(|diet| (diet, d)))
            .flat_map(|(diet, d)| self.aspects.extract(diet, &d.text_processed))
            .collect()
    }

    pub fn aspect_matrix(&self, matches: &[AspectMatch]) -> AspectMatrix {
        let m = AspectMatrix::from_matches(matches, self.examples_per_cell);
        counter!("annotator_aspect_records_total").increment(matches.len() as u64);
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::Aspect;
    use crate::diet::Diet;
    use crate::sentiment::{Polarity, Rationale};

    fn annotator() -> Annotator {
        Annotator::new(&AnnotatorConfig::default()).unwrap()
    }

    #[test]
    fn document_enrichment_keeps_invariants() {
        let a = annotator();
        let mut d = Document::new("1", "La keto y la mediterránea me funcionaron")
            .with_processed("la keto y la mediterránea me funcionaron");
        a.annotate_document(&mut d);
        assert_eq!(d.diet_heuristic, Some(Diet::Keto));
        assert_eq!(d.diets_matched, vec![Diet::Keto, Diet::Mediterranea]);
        assert!(d.diets_matched.contains(&d.diet_heuristic.unwrap()));
        assert_eq!(d.sentiment, Some(Polarity::Neu));
        assert!(matches!(d.sentiment_rationale, Rationale::Heuristic(_)));
    }

    #[test]
    fn missing_processed_column_is_derived() {
        let csv = "id,texto_raw\n1,No lo recomiendo para nada\n2,\n";
        let mut c = Corpus::from_reader(csv.as_bytes(), "inline").unwrap();
        let summary = annotator().annotate_corpus(&mut c);
        assert_eq!(c.documents[0].text_processed, "no_lo no_recomiendo no_para nada");
        assert_eq!(c.documents[0].sentiment, Some(Polarity::Neg));
        assert_eq!(c.documents[1].sentiment, None);
        assert_eq!(c.documents[1].sentiment_rationale, Rationale::Empty);
        assert_eq!(summary.empty_text, 1);
        assert_eq!(summary.without_diet, 2);
    }

    #[test]
    fn annotate_twice_is_identical() {
        let csv = "id,texto_raw,texto_proc,rating\n\
                   1,Ayuno 16/8 muy bueno,ayuno 16/8 muy bueno,\n\
                   2,Keto carísima,keto carísima,2\n";
        let a = annotator();
        let mut first = Corpus::from_reader(csv.as_bytes(), "inline").unwrap();
        a.annotate_corpus(&mut first);
        let mut second = first.clone();
        a.annotate_corpus(&mut second);
        assert_eq!(first.documents, second.documents);
    }

    #[test]
    fn aspects_skip_documents_without_diet() {
        let a = annotator();
        let mut docs = vec![
            Document::new("1", "keto").with_processed("tengo mucha hambre"),
            Document::new("2", "nada").with_processed("tengo mucha hambre"),
        ];
        for d in &mut docs {
            a.label_diet(d);
        }
        let corpus = Corpus::from_documents(docs);
        let recs = a.aspect_matches(&corpus);
        assert_eq!(recs.len(), 1);
        let m = a.aspect_matrix(&recs);
        assert_eq!(m.count(Aspect::Hambre, Diet::Keto), 1);
        assert_eq!(m.score(Aspect::Hambre, Diet::Keto), 0.0);
    }
}
