// src/error.rs
//! Error taxonomy of the annotation engine.
//!
//! Only stage-level failures live here. Per-document anomalies (empty text,
//! no diet/aspect match, small sampling cells) are encoded in the output
//! fields and never surface as errors.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, AnnotateError>;

#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    /// A required column is absent from the input table.
    #[error("missing required column `{column}` in {input}")]
    MissingColumn { column: String, input: String },

    /// None of the ranked input candidates for a stage exists on disk.
    #[error("no input for stage `{stage}`; tried: {}", display_paths(.tried))]
    NoInputSource { stage: String, tried: Vec<PathBuf> },

    /// A cell in an engine-owned column could not be parsed.
    #[error("invalid value `{value}` in column `{column}` (row {row})")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    /// Gold annotations carry labels outside {pos, neg, neu}.
    #[error("{count} gold labels outside {{pos,neg,neu}}, e.g. {sample:?}")]
    InvalidGoldLabels { count: usize, sample: Vec<String> },

    /// A diet surface-form regex failed to compile.
    #[error("diet `{diet}` pattern `{pattern}` does not compile: {source}")]
    Pattern {
        diet: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A lexicon or pattern set is empty after loading the configuration.
    #[error("empty vocabulary: {0}")]
    EmptyVocabulary(String),

    #[error("config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AnnotateError {
    pub(crate) fn missing_column(column: &str, input: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            input: input.to_string(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_resource() {
        let e = AnnotateError::missing_column("texto_raw", "data/interim/limpio.csv");
        assert_eq!(
            e.to_string(),
            "missing required column `texto_raw` in data/interim/limpio.csv"
        );

        let e = AnnotateError::NoInputSource {
            stage: "aspects".into(),
            tried: vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")],
        };
        assert_eq!(e.to_string(), "no input for stage `aspects`; tried: a.csv, b.csv");
    }
}
