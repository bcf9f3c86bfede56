//! Image export pipeline.
//!
//! For every selected [`GeoSample`], [`Exporter::export`] decodes the frame,
//! writes it as a JPEG, then reopens the file and embeds the geotag. Failures
//! are isolated to the frame: they are logged, recorded in the
//! [`ExportReport`], and the next sample is processed.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{RgbImage, codecs::jpeg::JpegEncoder};

use crate::{
    config::ExportOptions,
    error::GeoframeError,
    geotag::geotag_file,
    progress::ProgressTracker,
    telemetry::GeoSample,
    video::FrameSource,
};

/// A sample that could not be exported.
#[derive(Debug)]
pub struct ExportFailure {
    /// Frame index of the failed sample.
    pub frame_index: u64,
    /// Why the export failed.
    pub error: GeoframeError,
}

/// Outcome of an export run.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Files written and geotagged, in sample order.
    pub exported: Vec<PathBuf>,
    /// Samples that failed, in sample order.
    pub failures: Vec<ExportFailure>,
}

impl ExportReport {
    /// `true` if every sample was exported.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes geotagged JPEGs for a sequence of samples.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    /// Create an exporter with the given options.
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// The options this exporter was created with.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Output path for the frame at `frame_index` of `video_path`:
    /// `<output directory>/<video file stem>_<frame_index>.jpg`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::Path;
    ///
    /// use geoframe::{ExportOptions, Exporter};
    ///
    /// let exporter = Exporter::new(ExportOptions::new().with_output_directory("out"));
    /// let path = exporter.output_path(Path::new("a/b/clip.mp4"), 42);
    /// assert_eq!(path, Path::new("out/clip_42.jpg"));
    /// ```
    pub fn output_path(&self, video_path: &Path, frame_index: u64) -> PathBuf {
        let stem = video_path
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();
        self.options
            .output_directory()
            .join(format!("{stem}_{frame_index}.jpg"))
    }

    /// Export every sample in order.
    ///
    /// The output directory is created before the first write. Per-sample
    /// failures (seek/decode, encode, file I/O, EXIF) do not stop the run;
    /// they are logged at warn level and returned in
    /// [`ExportReport::failures`]. A file that was written but failed to be
    /// geotagged is left in place.
    ///
    /// # Errors
    ///
    /// Returns [`GeoframeError::IoError`] only if the output directory cannot
    /// be created.
    pub fn export<S: FrameSource + ?Sized>(
        &self,
        samples: &[GeoSample],
        source: &mut S,
        video_path: &Path,
    ) -> Result<ExportReport, GeoframeError> {
        fs::create_dir_all(self.options.output_directory())?;

        let total = samples.len() as u64;
        let mut tracker = ProgressTracker::new(self.options.progress.clone(), total);
        let mut report = ExportReport::default();

        for sample in samples {
            let path = self.output_path(video_path, sample.frame_index);
            match self.export_sample(sample, source, &path) {
                Ok(()) => {
                    log::info!("Exported {sample} -> {}", path.display());
                    report.exported.push(path);
                    tracker.advance(sample.frame_index, true);
                }
                Err(error) => {
                    log::warn!("Skipping frame {}: {error}", sample.frame_index);
                    report.failures.push(ExportFailure {
                        frame_index: sample.frame_index,
                        error,
                    });
                    tracker.advance(sample.frame_index, false);
                }
            }
        }

        Ok(report)
    }

    fn export_sample<S: FrameSource + ?Sized>(
        &self,
        sample: &GeoSample,
        source: &mut S,
        path: &Path,
    ) -> Result<(), GeoframeError> {
        let image = source.frame(sample.frame_index)?;
        self.write_jpeg(&image, path)?;
        geotag_file(path, sample)
    }

    fn write_jpeg(&self, image: &RgbImage, path: &Path) -> Result<(), GeoframeError> {
        let mut writer = BufWriter::new(File::create(path)?);
        let encoder = JpegEncoder::new_with_quality(&mut writer, self.options.jpeg_quality());
        image.write_with_encoder(encoder)?;
        writer.flush()?;
        Ok(())
    }
}
