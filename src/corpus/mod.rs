// src/corpus/mod.rs
//! Tabular corpus boundary: documents, schema detection, CSV read/write.
//!
//! Input columns are matched by alias (`texto_raw`/`text_raw`/`texto`, ...).
//! Unknown columns pass through untouched and in order. Output always uses
//! the Spanish column names.

pub mod sources;

use crate::diet::Diet;
use crate::error::{AnnotateError, Result};
use crate::sentiment::{Polarity, Rationale};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io;
use std::path::Path;

pub const COL_ID: &str = "id";
pub const COL_TEXT_RAW: &str = "texto_raw";
pub const COL_TEXT_PROC: &str = "texto_proc";
pub const COL_RATING: &str = "rating";
pub const COL_DIET: &str = "dieta_heuristica";
pub const COL_DIETS_MATCH: &str = "dietas_match";
pub const COL_SENTIMENT: &str = "sentimiento";
pub const COL_CONFIDENCE: &str = "sent_conf";
pub const COL_RATIONALE: &str = "sent_why";

/// Placeholder written for documents without a diet label.
pub const NO_DIET: &str = "sin_dieta";
/// Placeholder for documents without a provisional sentiment.
pub const NO_SENTIMENT: &str = "unk";

const ALIASES_ID: &[&str] = &[COL_ID];
const ALIASES_TEXT_RAW: &[&str] = &[COL_TEXT_RAW, "text_raw", "texto"];
const ALIASES_TEXT_PROC: &[&str] = &[COL_TEXT_PROC, "text_processed"];
const ALIASES_RATING: &[&str] = &[COL_RATING];
const ALIASES_DIET: &[&str] = &[COL_DIET, "diet_heuristic"];
const ALIASES_DIETS_MATCH: &[&str] = &[COL_DIETS_MATCH, "diets_matched"];
const ALIASES_SENTIMENT: &[&str] = &[COL_SENTIMENT, "sentiment"];
const ALIASES_CONFIDENCE: &[&str] = &[COL_CONFIDENCE, "sentiment_confidence"];
const ALIASES_RATIONALE: &[&str] = &[COL_RATIONALE, "sentiment_rationale"];

/// One corpus record. The engine only ever adds derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub text_raw: String,
    pub text_processed: String,
    pub rating: Option<i64>,
    pub diet_heuristic: Option<Diet>,
    pub diets_matched: Vec<Diet>,
    pub sentiment: Option<Polarity>,
    pub sentiment_confidence: f32,
    pub sentiment_rationale: Rationale,
    /// Pass-through cells, aligned with `Corpus::extra_headers`.
    pub extra: Vec<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, text_raw: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text_raw: text_raw.into(),
            text_processed: String::new(),
            rating: None,
            diet_heuristic: None,
            diets_matched: Vec::new(),
            sentiment: None,
            sentiment_confidence: 0.0,
            sentiment_rationale: Rationale::Unscored,
            extra: Vec::new(),
        }
    }

    pub fn with_processed(mut self, text: impl Into<String>) -> Self {
        self.text_processed = text.into();
        self
    }

    pub fn with_rating(mut self, rating: i64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Diet label or the `sin_dieta` placeholder.
    pub fn diet_key(&self) -> &'static str {
        self.diet_heuristic.map_or(NO_DIET, Diet::as_str)
    }

    /// Provisional sentiment or the `unk` placeholder.
    pub fn sentiment_key(&self) -> &'static str {
        self.sentiment.map_or(NO_SENTIMENT, Polarity::as_str)
    }

    pub fn diets_matched_cell(&self) -> String {
        self.diets_matched
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Which engine-owned columns the input carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Schema {
    pub has_processed: bool,
    pub has_rating: bool,
    pub has_diet: bool,
    pub has_sentiment: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub schema: Schema,
    pub extra_headers: Vec<String>,
    pub documents: Vec<Document>,
}

struct Columns {
    id: usize,
    text_raw: Option<usize>,
    text_proc: Option<usize>,
    rating: Option<usize>,
    diet: Option<usize>,
    diets_match: Option<usize>,
    sentiment: Option<usize>,
    confidence: Option<usize>,
    rationale: Option<usize>,
    extra: Vec<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, input: &str) -> Result<Self> {
        // aliases are tried in rank order, so `texto_raw` beats an earlier `texto`
        let find = |aliases: &[&str]| {
            aliases.iter().find_map(|a| {
                headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(a))
            })
        };
        let id = find(ALIASES_ID).ok_or_else(|| AnnotateError::missing_column(COL_ID, input))?;
        let text_raw = find(ALIASES_TEXT_RAW);
        let text_proc = find(ALIASES_TEXT_PROC);
        // either text column is enough; raw-only input gets `texto_proc` derived later
        if text_raw.is_none() && text_proc.is_none() {
            return Err(AnnotateError::missing_column(COL_TEXT_RAW, input));
        }

        let mut cols = Self {
            id,
            text_raw,
            text_proc,
            rating: find(ALIASES_RATING),
            diet: find(ALIASES_DIET),
            diets_match: find(ALIASES_DIETS_MATCH),
            sentiment: find(ALIASES_SENTIMENT),
            confidence: find(ALIASES_CONFIDENCE),
            rationale: find(ALIASES_RATIONALE),
            extra: Vec::new(),
        };

        let known = [
            Some(cols.id),
            cols.text_raw,
            cols.text_proc,
            cols.rating,
            cols.diet,
            cols.diets_match,
            cols.sentiment,
            cols.confidence,
            cols.rationale,
        ];
        cols.extra = (0..headers.len())
            .filter(|i| !known.contains(&Some(*i)))
            .collect();
        Ok(cols)
    }
}

/// Lenient rating parse: integers and integral floats; anything else is absent.
pub fn parse_rating(cell: &str) -> Option<i64> {
    let t = cell.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(v) = t.parse::<i64>() {
        return Some(v);
    }
    match t.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

fn invalid(column: &str, row: usize, value: &str) -> AnnotateError {
    AnnotateError::InvalidValue {
        column: column.to_string(),
        row,
        value: value.to_string(),
    }
}

fn parse_diet_cell(cell: &str, row: usize) -> Result<Option<Diet>> {
    let t = cell.trim();
    if t.is_empty() || t == NO_DIET {
        return Ok(None);
    }
    t.parse::<Diet>()
        .map(Some)
        .map_err(|_| invalid(COL_DIET, row, t))
}

impl Corpus {
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self {
            schema: Schema {
                has_processed: true,
                ..Schema::default()
            },
            extra_headers: Vec::new(),
            documents,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn read_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Parse a CSV corpus; `input` names the source in error messages.
    pub fn from_reader<R: io::Read>(reader: R, input: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let cols = Columns::resolve(&headers, input)?;

        let schema = Schema {
            has_processed: cols.text_proc.is_some(),
            has_rating: cols.rating.is_some(),
            has_diet: cols.diet.is_some(),
            has_sentiment: cols.sentiment.is_some(),
        };
        let extra_headers = cols.extra.iter().map(|&i| headers[i].to_string()).collect();

        let mut documents = Vec::new();
        for (i, rec) in rdr.records().enumerate() {
            let rec = rec?;
            let row = i + 1;
            let cell = |idx: Option<usize>| idx.and_then(|j| rec.get(j)).unwrap_or("");

            let mut doc = Document::new(cell(Some(cols.id)).trim(), cell(cols.text_raw));
            doc.text_processed = cell(cols.text_proc).to_string();
            doc.rating = parse_rating(cell(cols.rating));
            doc.diet_heuristic = parse_diet_cell(cell(cols.diet), row)?;
            doc.diets_matched = cell(cols.diets_match)
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<Diet>().map_err(|_| invalid(COL_DIETS_MATCH, row, s)))
                .collect::<Result<Vec<_>>>()?;

            let sent = cell(cols.sentiment).trim();
            if !sent.is_empty() {
                doc.sentiment = Some(
                    sent.parse::<Polarity>()
                        .map_err(|_| invalid(COL_SENTIMENT, row, sent))?,
                );
            }
            let conf = cell(cols.confidence).trim();
            if !conf.is_empty() {
                doc.sentiment_confidence = conf
                    .parse::<f32>()
                    .map_err(|_| invalid(COL_CONFIDENCE, row, conf))?;
            }
            let why = cell(cols.rationale);
            doc.sentiment_rationale = why
                .parse::<Rationale>()
                .map_err(|_| invalid(COL_RATIONALE, row, why))?;

            doc.extra = cols
                .extra
                .iter()
                .map(|&j| rec.get(j).unwrap_or("").to_string())
                .collect();
            documents.push(doc);
        }

        Ok(Self {
            schema,
            extra_headers,
            documents,
        })
    }

    pub fn write_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.to_writer(File::create(path)?)
    }

    pub fn to_writer<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut w = WriterBuilder::new().from_writer(writer);

        let mut header: Vec<&str> = vec![COL_ID, COL_TEXT_RAW, COL_TEXT_PROC, COL_RATING];
        header.extend(self.extra_headers.iter().map(String::as_str));
        header.extend([
            COL_DIET,
            COL_DIETS_MATCH,
            COL_SENTIMENT,
            COL_CONFIDENCE,
            COL_RATIONALE,
        ]);
        w.write_record(&header)?;

        for d in &self.documents {
            let rating = d.rating.map(|r| r.to_string()).unwrap_or_default();
            let diet = d.diet_heuristic.map(Diet::as_str).unwrap_or_default();
            let sentiment = d.sentiment.map(Polarity::as_str).unwrap_or_default();
            let conf = match d.sentiment_rationale {
                Rationale::Unscored => String::new(),
                _ => format!("{:.2}", d.sentiment_confidence),
            };

            let mut row: Vec<String> = vec![
                d.id.clone(),
                d.text_raw.clone(),
                d.text_processed.clone(),
                rating,
            ];
            row.extend(d.extra.iter().cloned());
            // pad pass-through cells for documents built in code
            row.resize(4 + self.extra_headers.len(), String::new());
            row.extend([
                diet.to_string(),
                d.diets_matched_cell(),
                sentiment.to_string(),
                conf,
                d.sentiment_rationale.to_string(),
            ]);
            w.write_record(&row)?;
        }
        w.flush()?;
        Ok(())
    }
}
