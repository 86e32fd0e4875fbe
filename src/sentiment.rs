// src/sentiment.rs
//! Heuristic sentiment classifier.
//!
//! Per document, in order:
//! 1. rating override (1–2 → neg, 3 → neu, 4–5 → pos, fixed confidence)
//! 2. whole-text lexicon vote over `texto_proc` tokens
//! 3. last-clause vote after splitting on contrastive connectors
//! 4. decision: exclusive whole-text vote, else exclusive last-clause vote, else neu
//! 5. heavy negation flips a positive reading to negative
//! 6. unpolarized questions short-circuit to low-confidence neutral
//! 7. confidence arithmetic (see `analyze::scoring`)

use crate::analyze::clauses::ClauseSplitter;
use crate::analyze::scoring::{heuristic_confidence, ConfidenceInputs};
use crate::config::{ConfidenceWeights, SentimentConfig};
use crate::error::{AnnotateError, Result};
use crate::lexicon::Lexicon;
use crate::negation::is_negated_form;
use crate::text::whitespace_tokens;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Pos,
    Neg,
    Neu,
}

impl Polarity {
    pub const ALL: [Polarity; 3] = [Polarity::Pos, Polarity::Neg, Polarity::Neu];

    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Pos => "pos",
            Polarity::Neg => "neg",
            Polarity::Neu => "neu",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "pos" => Ok(Polarity::Pos),
            "neg" => Ok(Polarity::Neg),
            "neu" => Ok(Polarity::Neu),
            other => Err(format!("unknown polarity `{other}`")),
        }
    }
}

/// Presence of positive / negative lexicon entries in a token run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexiconVote {
    pub pos: bool,
    pub neg: bool,
}

impl LexiconVote {
    /// Exclusive vote only; a tie or an empty vote has no label.
    pub fn label(self) -> Option<Polarity> {
        match (self.pos, self.neg) {
            (true, false) => Some(Polarity::Pos),
            (false, true) => Some(Polarity::Neg),
            _ => None,
        }
    }

    pub fn is_exclusive(self) -> bool {
        self.pos ^ self.neg
    }

    pub fn any(self) -> bool {
        self.pos || self.neg
    }
}

/// Boolean trace of a heuristic decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Factors {
    pub base: Polarity,
    pub pos: bool,
    pub neg: bool,
    pub last_pos: bool,
    pub last_neg: bool,
    pub neg_bias: usize,
    pub intens: bool,
    pub atten: bool,
}

/// Structured rationale; text form only at the output boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rationale {
    /// Not labeled yet.
    #[default]
    Unscored,
    Rating,
    Empty,
    QuestionNeutral,
    Heuristic(Factors),
}

impl fmt::Display for Rationale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rationale::Unscored => Ok(()),
            Rationale::Rating => f.write_str("rating"),
            Rationale::Empty => f.write_str("empty"),
            Rationale::QuestionNeutral => f.write_str("question_neutral"),
            Rationale::Heuristic(x) => write!(
                f,
                "base={}, pos={}, neg={}, last_pos={}, last_neg={}, neg_bias={}, intens={}, atten={}",
                x.base, x.pos, x.neg, x.last_pos, x.last_neg, x.neg_bias, x.intens, x.atten
            ),
        }
    }
}

impl FromStr for Rationale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "" => return Ok(Rationale::Unscored),
            "rating" => return Ok(Rationale::Rating),
            "empty" => return Ok(Rationale::Empty),
            "question_neutral" => return Ok(Rationale::QuestionNeutral),
            _ => {}
        }

        let mut base = None;
        let mut flags = [None::<bool>; 6];
        let mut neg_bias = None;
        for pair in s.split(',') {
            let (k, v) = pair
                .trim()
                .split_once('=')
                .ok_or_else(|| format!("malformed rationale field `{pair}`"))?;
            let flag = |v: &str| v.parse::<bool>().map_err(|e| format!("{k}: {e}"));
            match k {
                "base" => base = Some(v.parse::<Polarity>()?),
                "pos" => flags[0] = Some(flag(v)?),
                "neg" => flags[1] = Some(flag(v)?),
                "last_pos" => flags[2] = Some(flag(v)?),
                "last_neg" => flags[3] = Some(flag(v)?),
                "intens" => flags[4] = Some(flag(v)?),
                "atten" => flags[5] = Some(flag(v)?),
                "neg_bias" => {
                    neg_bias = Some(v.parse::<usize>().map_err(|e| format!("neg_bias: {e}"))?)
                }
                other => return Err(format!("unknown rationale field `{other}`")),
            }
        }

        let missing = || format!("incomplete rationale `{s}`");
        let get = |i: usize| flags[i].ok_or_else(missing);
        Ok(Rationale::Heuristic(Factors {
            base: base.ok_or_else(missing)?,
            pos: get(0)?,
            neg: get(1)?,
            last_pos: get(2)?,
            last_neg: get(3)?,
            intens: get(4)?,
            atten: get(5)?,
            neg_bias: neg_bias.ok_or_else(missing)?,
        }))
    }
}

/// Label, confidence and rationale for one document.
///
/// `label` is `None` only for empty text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Judgment {
    pub label: Option<Polarity>,
    pub confidence: f32,
    pub rationale: Rationale,
}

/// Map a 1–5 star rating to a polarity.
pub fn rating_polarity(rating: i64) -> Option<Polarity> {
    match rating {
        1 | 2 => Some(Polarity::Neg),
        3 => Some(Polarity::Neu),
        4 | 5 => Some(Polarity::Pos),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct SentimentHeuristic {
    positive: Lexicon,
    negative: Lexicon,
    intensifiers: Lexicon,
    attenuators: Lexicon,
    clauses: ClauseSplitter,
    weights: ConfidenceWeights,
    rating_confidence: f32,
    question_confidence: f32,
    negation_override_min: usize,
}

impl SentimentHeuristic {
    pub fn new(cfg: &SentimentConfig, weights: ConfidenceWeights) -> Result<Self> {
        let positive = Lexicon::new(&cfg.positive);
        let negative = Lexicon::new(&cfg.negative);
        if positive.is_empty() || negative.is_empty() {
            return Err(AnnotateError::EmptyVocabulary("sentiment lexicons".into()));
        }
        Ok(Self {
            positive,
            negative,
            intensifiers: Lexicon::new(&cfg.intensifiers),
            attenuators: Lexicon::new(&cfg.attenuators),
            clauses: ClauseSplitter::new(&cfg.contrast)?,
            weights,
            rating_confidence: cfg.rating_confidence.clamp(0.0, 1.0),
            question_confidence: cfg.question_confidence.clamp(0.0, 1.0),
            negation_override_min: cfg.negation_override_min,
        })
    }

    pub fn clauses(&self) -> &ClauseSplitter {
        &self.clauses
    }

    pub fn vote<S: AsRef<str>>(&self, tokens: &[S]) -> LexiconVote {
        LexiconVote {
            pos: self.positive.matches(tokens),
            neg: self.negative.matches(tokens),
        }
    }

    /// Phrase-level rule: exclusive lexicon vote, otherwise neutral. No clause,
    /// negation or question refinements.
    pub fn phrase_polarity(&self, phrase: &str) -> Polarity {
        let lower = phrase.to_lowercase();
        self.vote(&whitespace_tokens(&lower))
            .label()
            .unwrap_or(Polarity::Neu)
    }

    pub fn classify(&self, text_processed: &str, text_raw: &str, rating: Option<i64>) -> Judgment {
        // (1) rating override
        if let Some(label) = rating.and_then(rating_polarity) {
            return Judgment {
                label: Some(label),
                confidence: self.rating_confidence,
                rationale: Rationale::Rating,
            };
        }

        let s = text_processed.trim().to_lowercase();
        if s.is_empty() {
            return Judgment {
                label: None,
                confidence: 0.0,
                rationale: Rationale::Empty,
            };
        }

        // (2) whole-text vote
        let tokens = whitespace_tokens(&s);
        let whole = self.vote(&tokens);
        let neg_bias = tokens.iter().filter(|t| is_negated_form(t)).count();
        let intens = self.intensifiers.matches(&tokens);
        let atten = self.attenuators.matches(&tokens);

        // (3) last clause
        let last = self.vote(&whitespace_tokens(self.clauses.last_clause(&s)));

        // (4) decision
        let mut base = whole
            .label()
            .or_else(|| last.label())
            .unwrap_or(Polarity::Neu);

        // (5) negation override
        let heavy_negation = neg_bias >= self.negation_override_min;
        if base == Polarity::Pos && heavy_negation {
            base = Polarity::Neg;
        }

        // (6) question dampening
        if base == Polarity::Neu && !whole.any() && is_question(text_raw) {
            return Judgment {
                label: Some(Polarity::Neu),
                confidence: self.question_confidence,
                rationale: Rationale::QuestionNeutral,
            };
        }

        // (7) confidence
        let confidence = heuristic_confidence(
            &ConfidenceInputs {
                exclusive_vote: whole.is_exclusive(),
                intensified: intens,
                attenuated: atten,
                last_clause_exclusive: last.is_exclusive(),
                heavy_negation,
            },
            &self.weights,
        );

        Judgment {
            label: Some(base),
            confidence,
            rationale: Rationale::Heuristic(Factors {
                base,
                pos: whole.pos,
                neg: whole.neg,
                last_pos: last.pos,
                last_neg: last.neg,
                neg_bias,
                intens,
                atten,
            }),
        }
    }
}

fn is_question(text: &str) -> bool {
    text.contains('?') || text.contains('¿')
}
