// src/metrics.rs
//! Prometheus recorder for batch runs. Stages emit counters through the
//! `metrics` macros; the binary renders a snapshot to a file when done.

use crate::error::{AnnotateError, Result};
use metrics::gauge;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fs;
use std::path::Path;

pub const METRICS_FILE: &str = "metrics.prom";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global recorder. Call once per process.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| AnnotateError::Config(format!("prometheus recorder: {e}")))?;

        gauge!("annotator_build_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

        Ok(Self { handle })
    }

    /// Write the exposition text to `<dir>/metrics.prom`.
    pub fn write_snapshot(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join(METRICS_FILE), self.handle.render())?;
        Ok(())
    }
}
