// src/report.rs
//! Flat output artifacts: aspect matrices, example table, annotation samples
//! and the run manifest.

use crate::aspects::{Aspect, AspectMatrix};
use crate::diet::Diet;
use crate::error::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

pub const MATRIX_FILE: &str = "matriz_dieta_aspecto.csv";
pub const COUNTS_FILE: &str = "matriz_dieta_aspecto_counts.csv";
pub const EXAMPLES_FILE: &str = "absa_ejemplos.csv";
pub const MANIFEST_FILE: &str = "run_manifest.json";

const EXAMPLE_SEPARATOR: &str = " | ";

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

fn matrix_header() -> Vec<&'static str> {
    let mut h = vec!["aspecto"];
    h.extend(Diet::ALL.iter().map(|d| d.as_str()));
    h
}

/// Score matrix: rows = aspect, columns = diet, every cell present.
pub fn write_scores<W: io::Write>(m: &AspectMatrix, writer: W) -> Result<()> {
    let mut w = WriterBuilder::new().from_writer(writer);
    w.write_record(matrix_header())?;
    for a in Aspect::ALL {
        let mut row = vec![a.as_str().to_string()];
        row.extend(Diet::ALL.iter().map(|&d| format!("{:.4}", m.score(a, d))));
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_counts<W: io::Write>(m: &AspectMatrix, writer: W) -> Result<()> {
    let mut w = WriterBuilder::new().from_writer(writer);
    w.write_record(matrix_header())?;
    for a in Aspect::ALL {
        let mut row = vec![a.as_str().to_string()];
        row.extend(Diet::ALL.iter().map(|&d| m.count(a, d).to_string()));
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct ExampleRow {
    aspecto: &'static str,
    dieta: &'static str,
    ej_pos: String,
    ej_neg: String,
}

/// One row per non-empty (aspect, diet) cell.
pub fn write_examples<W: io::Write>(m: &AspectMatrix, writer: W) -> Result<()> {
    let mut w = WriterBuilder::new().from_writer(writer);
    for (&(a, d), cell) in m.cells() {
        w.serialize(ExampleRow {
            aspecto: a.as_str(),
            dieta: d.as_str(),
            ej_pos: cell.pos_examples.join(EXAMPLE_SEPARATOR),
            ej_neg: cell.neg_examples.join(EXAMPLE_SEPARATOR),
        })?;
    }
    w.flush()?;
    Ok(())
}

/// Write the three aspect artifacts under `dir`; returns their paths.
pub fn write_aspect_reports(m: &AspectMatrix, dir: &Path) -> Result<Vec<PathBuf>> {
    let scores = dir.join(MATRIX_FILE);
    let counts = dir.join(COUNTS_FILE);
    let examples = dir.join(EXAMPLES_FILE);
    write_scores(m, create(&scores)?)?;
    write_counts(m, create(&counts)?)?;
    write_examples(m, create(&examples)?)?;
    Ok(vec![scores, counts, examples])
}

/// Serialize rows to a CSV file (headers from the row type).
pub fn write_rows<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    let mut w = WriterBuilder::new().from_writer(create(path)?);
    for r in rows {
        w.serialize(r)?;
    }
    w.flush()?;
    Ok(())
}

/// Short hex SHA-256 of a file's bytes.
pub fn file_fingerprint(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().take(8).map(|b| format!("{b:02x}")).collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub input_name: String,
    pub input_path: PathBuf,
    pub input_sha256: String,
    pub rows_in: usize,
    pub rows_out: usize,
    pub outputs: Vec<PathBuf>,
    pub generated_at: DateTime<Utc>,
}

/// Last run of every stage, keyed by stage name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub stages: BTreeMap<String, StageRecord>,
}

impl RunManifest {
    /// Load the manifest, or start an empty one when absent or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn record(&mut self, stage: &str, rec: StageRecord) {
        self.stages.insert(stage.to_string(), rec);
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        serde_json::to_writer_pretty(create(path)?, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::AspectMatch;
    use crate::sentiment::Polarity;

    fn matrix() -> AspectMatrix {
        let recs = vec![
            AspectMatch {
                diet: Diet::Vegana,
                phrase: "barato y rico".into(),
                aspect: Aspect::Costo,
                sentiment: Polarity::Pos,
            },
            AspectMatch {
                diet: Diet::Vegana,
                phrase: "muy caro".into(),
                aspect: Aspect::Costo,
                sentiment: Polarity::Neg,
            },
            AspectMatch {
                diet: Diet::Vegana,
                phrase: "precio normal".into(),
                aspect: Aspect::Costo,
                sentiment: Polarity::Neg,
            },
        ];
        AspectMatrix::from_matches(&recs, 3)
    }

    #[test]
    fn score_matrix_lists_every_cell() {
        let mut buf = Vec::new();
        write_scores(&matrix(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "aspecto,ayuno,keto,flexible,mediterranea,paleo,vegana");
        assert_eq!(lines.len(), 1 + Aspect::ALL.len());
        assert_eq!(lines[4], "costo,0.0000,0.0000,0.0000,0.0000,0.0000,-0.3333");
    }

    #[test]
    fn examples_join_phrases() {
        let mut buf = Vec::new();
        write_examples(&matrix(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("aspecto,dieta,ej_pos,ej_neg\n"));
        assert!(text.contains("costo,vegana,barato y rico,muy caro | precio normal"));
    }

    #[test]
    fn fingerprint_is_sha256_hex_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let empty = tmp.path().join("empty.csv");
        fs::write(&empty, "").unwrap();
        assert_eq!(file_fingerprint(&empty).unwrap(), "e3b0c44298fc1c14");

        let abc = tmp.path().join("abc.csv");
        fs::write(&abc, "abc").unwrap();
        assert_eq!(file_fingerprint(&abc).unwrap(), "ba7816bf8f01cfea");
    }

    #[test]
    fn manifest_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.csv");
        fs::write(&input, "id\n1\n").unwrap();
        let fp = file_fingerprint(&input).unwrap();
        assert_eq!(fp.len(), 16);

        let path = tmp.path().join("reports").join(MANIFEST_FILE);
        let mut m = RunManifest::load_or_default(&path);
        assert!(m.stages.is_empty());
        m.record(
            "label",
            StageRecord {
                input_name: "limpio".into(),
                input_path: input.clone(),
                input_sha256: fp,
                rows_in: 1,
                rows_out: 1,
                outputs: vec![],
                generated_at: Utc::now(),
            },
        );
        m.save(&path).unwrap();
        assert_eq!(RunManifest::load_or_default(&path), m);
    }
}
