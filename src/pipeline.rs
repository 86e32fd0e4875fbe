// src/pipeline.rs
//! Batch stages over the flat files in the data directory.
//!
//! | stage      | input (first existing)                        | output                         |
//! |------------|-----------------------------------------------|--------------------------------|
//! | preprocess | filtrado                                      | limpio                         |
//! | label      | limpio, filtrado                              | limpio_sent                    |
//! | sample     | limpio_sent                                   | para_anotar_{balanceado, balanceado_ciego, dificiles} |
//! | fuse-gold  | limpio_sent + para_anotar_gold                | limpio_final                   |
//! | aspects    | limpio_final, limpio_sent, limpio             | reports/ matrices + examples   |
//!
//! `all` runs label → sample → fuse-gold (when a gold file exists) → aspects.

use crate::analyze::Annotator;
use crate::config::AnnotatorConfig;
use crate::corpus::sources::{InputSource, InputSources};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::gold::{fuse, GoldLabels};
use crate::report::{self, RunManifest, StageRecord, MANIFEST_FILE};
use crate::text::basic_clean;
use chrono::Utc;
use metrics::counter;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

pub const FILTERED: &str = "filtrado";
pub const CLEAN: &str = "limpio";
pub const LABELED: &str = "limpio_sent";
pub const FINAL: &str = "limpio_final";
pub const GOLD: &str = "para_anotar_gold";
pub const SAMPLE_BALANCED: &str = "para_anotar_balanceado";
pub const SAMPLE_BLIND: &str = "para_anotar_balanceado_ciego";
pub const SAMPLE_HARD: &str = "para_anotar_dificiles";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preprocess,
    Label,
    Sample,
    FuseGold,
    Aspects,
    All,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Preprocess => "preprocess",
            Stage::Label => "label",
            Stage::Sample => "sample",
            Stage::FuseGold => "fuse-gold",
            Stage::Aspects => "aspects",
            Stage::All => "all",
        }
    }
}

/// What one stage read and wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    pub stage: &'static str,
    pub input: InputSource,
    pub rows_in: usize,
    pub rows_out: usize,
    pub outputs: Vec<PathBuf>,
}

pub struct Pipeline {
    cfg: AnnotatorConfig,
    annotator: Annotator,
}

impl Pipeline {
    pub fn new(cfg: AnnotatorConfig) -> Result<Self> {
        let annotator = Annotator::new(&cfg)?;
        Ok(Self { cfg, annotator })
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    fn data_dir(&self) -> &Path {
        &self.cfg.paths.data_dir
    }

    fn reports_dir(&self) -> &Path {
        &self.cfg.paths.reports_dir
    }

    fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir().join(format!("{name}.csv"))
    }

    pub fn sources(&self, stage: Stage) -> InputSources {
        let dir = self.data_dir();
        let s = InputSources::new(stage.name());
        match stage {
            Stage::Preprocess => s.or_csv(dir, FILTERED),
            Stage::Label => s.or_csv(dir, CLEAN).or_csv(dir, FILTERED),
            Stage::Sample | Stage::FuseGold => s.or_csv(dir, LABELED),
            Stage::Aspects | Stage::All => s
                .or_csv(dir, FINAL)
                .or_csv(dir, LABELED)
                .or_csv(dir, CLEAN),
        }
    }

    /// Run one stage (or the whole chain) and record it in the manifest.
    pub fn run(&self, stage: Stage) -> Result<Vec<StageOutcome>> {
        let outcomes = match stage {
            Stage::Preprocess => vec![self.preprocess()?],
            Stage::Label => vec![self.label()?],
            Stage::Sample => vec![self.sample()?],
            Stage::FuseGold => vec![self.fuse_gold()?],
            Stage::Aspects => vec![self.aspects()?],
            Stage::All => {
                let mut v = vec![self.label()?, self.sample()?];
                if self.data_file(GOLD).is_file() {
                    v.push(self.fuse_gold()?);
                } else {
                    info!(stage = "fuse-gold", "no gold file, skipping");
                }
                v.push(self.aspects()?);
                v
            }
        };
        self.record(&outcomes)?;
        Ok(outcomes)
    }

    fn open(&self, stage: Stage) -> Result<(InputSource, Corpus)> {
        let src = self.sources(stage).first_existing()?.clone();
        info!(
            stage = stage.name(),
            source = %src.name,
            path = %src.path.display(),
            "reading input"
        );
        let corpus = Corpus::read_path(&src.path)?;
        counter!("annotator_documents_total", "stage" => stage.name())
            .increment(corpus.len() as u64);
        Ok((src, corpus))
    }

    pub fn preprocess(&self) -> Result<StageOutcome> {
        let (input, mut corpus) = self.open(Stage::Preprocess)?;
        let scoper = self.annotator.scoper();
        for d in &mut corpus.documents {
            d.text_raw = basic_clean(&d.text_raw);
            d.text_processed = scoper.process_text(&d.text_raw);
        }
        corpus.schema.has_processed = true;

        let out = self.data_file(CLEAN);
        corpus.write_path(&out)?;
        info!(rows = corpus.len(), path = %out.display(), "preprocess done");
        Ok(StageOutcome {
            stage: Stage::Preprocess.name(),
            input,
            rows_in: corpus.len(),
            rows_out: corpus.len(),
            outputs: vec![out],
        })
    }

    pub fn label(&self) -> Result<StageOutcome> {
        let (input, mut corpus) = self.open(Stage::Label)?;
        self.annotator.annotate_corpus(&mut corpus);

        let out = self.data_file(LABELED);
        corpus.write_path(&out)?;
        info!(rows = corpus.len(), path = %out.display(), "labeled corpus written");
        Ok(StageOutcome {
            stage: Stage::Label.name(),
            input,
            rows_in: corpus.len(),
            rows_out: corpus.len(),
            outputs: vec![out],
        })
    }

    pub fn sample(&self) -> Result<StageOutcome> {
        let (input, mut corpus) = self.open(Stage::Sample)?;
        self.annotator.ensure_processed(&mut corpus);
        let sampler = self.annotator.sampler();

        let balanced = sampler.balanced(&corpus.documents);
        let hard = sampler.hard_cases(&corpus.documents);

        let bal_path = self.data_file(SAMPLE_BALANCED);
        let blind_path = self.data_file(SAMPLE_BLIND);
        let hard_path = self.data_file(SAMPLE_HARD);
        report::write_rows(&balanced.informed_rows(), &bal_path)?;
        report::write_rows(&balanced.blind_rows(), &blind_path)?;
        report::write_rows(&hard.output_rows(), &hard_path)?;

        info!(
            balanced = balanced.len(),
            hard = hard.rows.len(),
            hard_candidates = hard.candidates,
            "annotation samples written"
        );
        Ok(StageOutcome {
            stage: Stage::Sample.name(),
            input,
            rows_in: corpus.len(),
            rows_out: balanced.len() + hard.rows.len(),
            outputs: vec![bal_path, blind_path, hard_path],
        })
    }

    pub fn fuse_gold(&self) -> Result<StageOutcome> {
        let (input, mut corpus) = self.open(Stage::FuseGold)?;
        let gold_src = InputSources::new(Stage::FuseGold.name())
            .or_csv(self.data_dir(), GOLD)
            .first_existing()?
            .clone();
        let gold = GoldLabels::from_reader(
            File::open(&gold_src.path)?,
            &gold_src.path.display().to_string(),
        )?;
        fuse(&mut corpus, &gold);

        let out = self.data_file(FINAL);
        corpus.write_path(&out)?;
        Ok(StageOutcome {
            stage: Stage::FuseGold.name(),
            input,
            rows_in: corpus.len(),
            rows_out: corpus.len(),
            outputs: vec![out],
        })
    }

    pub fn aspects(&self) -> Result<StageOutcome> {
        let (input, mut corpus) = self.open(Stage::Aspects)?;
        self.annotator.ensure_processed(&mut corpus);
        self.annotator.ensure_diets(&mut corpus);

        let matches = self.annotator.aspect_matches(&corpus);
        if matches.is_empty() {
            info!("no phrases matched any aspect; writing empty matrices");
        }
        let matrix = self.annotator.aspect_matrix(&matches);
        let outputs = report::write_aspect_reports(&matrix, self.reports_dir())?;
        info!(records = matches.len(), cells = matrix.cells().count(), "aspect matrix written");
        Ok(StageOutcome {
            stage: Stage::Aspects.name(),
            input,
            rows_in: corpus.len(),
            rows_out: matches.len(),
            outputs,
        })
    }

    fn record(&self, outcomes: &[StageOutcome]) -> Result<()> {
        let path = self.reports_dir().join(MANIFEST_FILE);
        let mut manifest = RunManifest::load_or_default(&path);
        for o in outcomes {
            manifest.record(
                o.stage,
                StageRecord {
                    input_name: o.input.name.clone(),
                    input_path: o.input.path.clone(),
                    input_sha256: report::file_fingerprint(&o.input.path)?,
                    rows_in: o.rows_in,
                    rows_out: o.rows_out,
                    outputs: o.outputs.clone(),
                    generated_at: Utc::now(),
                },
            );
        }
        manifest.save(&path)
    }
}
