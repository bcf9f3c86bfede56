//! Progress reporting for the export phase.
//!
//! The export pipeline calls a [`ProgressCallback`] once per sample, whether
//! the sample was exported or failed.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use geoframe::{ExportOptions, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("frame {}: {pct:.1}% complete", info.frame_index);
//!         }
//!     }
//! }
//!
//! let options = ExportOptions::new().with_progress(Arc::new(PrintProgress));
//! ```

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// A snapshot of export progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// How many samples have been processed so far.
    pub current: u64,
    /// Total samples selected for export.
    pub total: u64,
    /// Completion percentage (0.0 – 100.0).
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the export started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Frame index of the sample just processed.
    pub frame_index: u64,
    /// `false` if the sample just processed failed to export.
    pub succeeded: bool,
}

/// Trait for receiving progress updates during export.
///
/// Progress callbacks are **infallible**; they observe but cannot halt the
/// run.
pub trait ProgressCallback: Send + Sync {
    /// Called after each sample.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. Used when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: u64,
    current: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: u64) -> Self {
        Self {
            callback,
            total,
            current: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one processed sample and fire the callback.
    pub(crate) fn advance(&mut self, frame_index: u64, succeeded: bool) {
        self.current += 1;

        let elapsed = self.start_time.elapsed();
        let percentage = (self.total > 0)
            .then(|| (self.current as f32 / self.total as f32) * 100.0);
        let remaining = self.total.saturating_sub(self.current);
        let estimated_remaining = u32::try_from(remaining)
            .ok()
            .map(|remaining| elapsed / self.current as u32 * remaining);

        let info = ProgressInfo {
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            frame_index,
            succeeded,
        };

        self.callback.on_progress(&info);
    }
}
