// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod error;

// Text primitives
pub mod lexicon;
pub mod negation;
pub mod text;

// Classifiers
pub mod aspects;
pub mod diet;
pub mod sentiment;

// Annotation pipeline (clause splitting, confidence scoring, orchestration)
pub mod analyze;

// Flat-file I/O and stages
pub mod corpus;
pub mod gold;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod sampler;

// ---- Re-exports for stable public API ----
pub use crate::analyze::Annotator;
pub use crate::config::AnnotatorConfig;
pub use crate::corpus::{Corpus, Document};
pub use crate::error::{AnnotateError, Result};
pub use crate::pipeline::{Pipeline, Stage};
