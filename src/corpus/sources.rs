//! Ranked input sources: an ordered list of named candidates with a single
//! "first existing" selection rule.

use crate::error::{AnnotateError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct InputSources {
    stage: String,
    ranked: Vec<InputSource>,
}

impl InputSources {
    pub fn new(stage: &str) -> Self {
        Self {
            stage: stage.to_string(),
            ranked: Vec::new(),
        }
    }

    /// Append a lower-ranked alternative.
    pub fn or(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.ranked.push(InputSource {
            name: name.to_string(),
            path: path.into(),
        });
        self
    }

    /// Convenience: a file under `dir` named `<name>.csv`.
    pub fn or_csv(self, dir: &Path, name: &str) -> Self {
        let path = dir.join(format!("{name}.csv"));
        self.or(name, path)
    }

    pub fn candidates(&self) -> &[InputSource] {
        &self.ranked
    }

    pub fn first_existing(&self) -> Result<&InputSource> {
        self.ranked
            .iter()
            .find(|s| s.path.is_file())
            .ok_or_else(|| AnnotateError::NoInputSource {
                stage: self.stage.clone(),
                tried: self.ranked.iter().map(|s| s.path.clone()).collect(),
            })
    }
}
