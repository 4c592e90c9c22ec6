//! Ingest metrics
//!
//! Counters for the ingest and fetch steps. They are no-ops unless a recorder
//! is installed; the CLI installs a Prometheus recorder when
//! `metrics.dump_path` is configured and writes the rendered text on exit.

use crate::common::error::{FeedError, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fs;
use std::path::Path;
use tracing::info;

/// Metrics collection for feed ingestion
pub struct FeedMetrics;

impl FeedMetrics {
    /// Install the process-wide Prometheus recorder and return its render handle.
    pub fn install() -> Result<PrometheusHandle> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| FeedError::Config(format!("Failed to install metrics recorder: {}", e)))?;
        info!("Prometheus recorder installed");
        Ok(handle)
    }

    /// Write the current exposition text to `path`, creating parent dirs.
    pub fn dump(handle: &PrometheusHandle, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, handle.render())?;
        info!("Metrics written to {}", path.display());
        Ok(())
    }

    /// Records normalized successfully in one batch
    pub fn records_ingested(count: usize) {
        ::metrics::counter!("feed_records_ingested_total").increment(count as u64);
    }

    /// One malformed item dropped
    pub fn item_skipped() {
        ::metrics::counter!("feed_items_skipped_total").increment(1);
    }

    pub fn empty_payload() {
        ::metrics::counter!("feed_empty_payload_total").increment(1);
    }

    /// Transport, status or decode failure while fetching a source
    pub fn source_error() {
        ::metrics::counter!("feed_source_errors_total").increment(1);
    }
}
