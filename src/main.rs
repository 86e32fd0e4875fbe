//! Batch entrypoint: runs one annotation stage (or the whole chain) over the
//! flat files in the configured data directory.

use anyhow::Context;
use clap::{Parser, Subcommand};
use diet_sentiment_annotator::metrics::Metrics;
use diet_sentiment_annotator::{AnnotatorConfig, Pipeline, Stage};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "diet-sentiment-annotator", version, about)]
struct Cli {
    /// Config file (overrides ANNOTATOR_CONFIG_PATH).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    stage: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Clean raw text and build the negation-scoped column.
    Preprocess,
    /// Diet and sentiment labels for every document.
    Label,
    /// Balanced, blind and hard-case sets for human annotation.
    Sample,
    /// Merge human gold labels into the labeled corpus.
    FuseGold,
    /// Aspect x diet matrices and example phrases.
    Aspects,
    /// label, sample, fuse-gold (if gold exists), aspects.
    All,
}

impl From<Command> for Stage {
    fn from(c: Command) -> Self {
        match c {
            Command::Preprocess => Stage::Preprocess,
            Command::Label => Stage::Label,
            Command::Sample => Stage::Sample,
            Command::FuseGold => Stage::FuseGold,
            Command::Aspects => Stage::Aspects,
            Command::All => Stage::All,
        }
    }
}

/// Compact logs by default, JSON lines with ANNOTATOR_LOG_FORMAT=json.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("diet_sentiment_annotator=info,warn"));
    let json = std::env::var("ANNOTATOR_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
    }
}

fn main() -> anyhow::Result<()> {
    // .env is optional; it may carry ANNOTATOR_CONFIG_PATH / RUST_LOG.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let metrics = Metrics::init().context("failed to install metrics recorder")?;

    let cfg = match &cli.config {
        Some(path) => AnnotatorConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AnnotatorConfig::load().context("failed to load annotator config")?,
    };
    let reports_dir = cfg.paths.reports_dir.clone();

    let stage = Stage::from(cli.stage);
    let pipeline = Pipeline::new(cfg).context("invalid annotator configuration")?;
    let outcomes = pipeline
        .run(stage)
        .with_context(|| format!("stage `{}` failed", stage.name()))?;

    for o in &outcomes {
        info!(
            stage = o.stage,
            rows_in = o.rows_in,
            rows_out = o.rows_out,
            outputs = ?o.outputs,
            "stage finished"
        );
    }

    metrics
        .write_snapshot(&reports_dir)
        .context("failed to write metrics snapshot")?;
    Ok(())
}
