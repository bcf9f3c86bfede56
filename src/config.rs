//! Export configuration.
//!
//! [`ExportOptions`] is a builder that carries the output directory, JPEG
//! quality and progress callback into the export pipeline.
//!
//! # Example
//!
//! ```
//! use geoframe::ExportOptions;
//!
//! let options = ExportOptions::new()
//!     .with_output_directory("frames")
//!     .with_jpeg_quality(90);
//! assert_eq!(options.jpeg_quality(), 90);
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::progress::{NoOpProgress, ProgressCallback};

/// Directory used when none is configured.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "out";

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Settings for the image export pipeline.
#[derive(Clone)]
pub struct ExportOptions {
    output_directory: PathBuf,
    jpeg_quality: u8,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    has_progress: bool,
}

impl Debug for ExportOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExportOptions")
            .field("output_directory", &self.output_directory)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("has_progress", &self.has_progress)
            .finish()
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportOptions {
    /// Options with the default output directory and quality and no
    /// progress callback.
    pub fn new() -> Self {
        Self {
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            progress: Arc::new(NoOpProgress),
            has_progress: false,
        }
    }

    /// Write images into `directory`. It is created on first use.
    pub fn with_output_directory<P: Into<PathBuf>>(mut self, directory: P) -> Self {
        self.output_directory = directory.into();
        self
    }

    /// JPEG quality, clamped to `1..=100`.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Receive a callback after every exported (or failed) sample.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self.has_progress = true;
        self
    }

    /// Configured output directory.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Configured JPEG quality.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }
}
