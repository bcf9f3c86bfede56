//! End-to-end runs.
//!
//! [`Geotagger`] wires the phases together in order: open the video and
//! derive the frame increment from its frame rate, read the telemetry log,
//! check that the log and the video have the same number of frames, then
//! export. Errors in the first two phases abort the run; export errors are
//! per frame.

use std::path::Path;

use crate::{
    config::ExportOptions,
    error::GeoframeError,
    export::{ExportReport, Exporter},
    metadata::VideoMetadata,
    sampling::frame_increment,
    telemetry::{GeoSample, TelemetryLog, read_telemetry},
    video::{FrameSource, VideoSource},
};

/// Default sampling interval, in seconds.
pub const DEFAULT_INTERVAL_SECONDS: f64 = 1.0;

/// Frame counts are estimates for some containers; differences up to this
/// many frames are not reported.
const FRAME_COUNT_TOLERANCE: u64 = 1;

/// The outcome of the setup phases: which frames will be exported.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Frames per exported sample.
    pub frame_increment: u64,
    /// Metadata of the video stream.
    pub video: VideoMetadata,
    /// Number of frame blocks in the telemetry log.
    pub telemetry_blocks: u64,
    /// Samples selected for export, in frame order.
    pub samples: Vec<GeoSample>,
}

/// A completed run.
#[derive(Debug)]
pub struct RunSummary {
    /// What was planned.
    pub plan: RunPlan,
    /// What was exported.
    pub report: ExportReport,
}

/// Runs the telemetry-to-geotagged-images pipeline.
///
/// # Example
///
/// ```no_run
/// use geoframe::{ExportOptions, Geotagger};
///
/// let geotagger = Geotagger::new(ExportOptions::new().with_output_directory("frames"));
/// let summary = geotagger.run("DJI_0001.SRT", "DJI_0001.MP4", 2.0)?;
/// println!(
///     "{} exported, {} failed",
///     summary.report.exported.len(),
///     summary.report.failures.len()
/// );
/// # Ok::<(), geoframe::GeoframeError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Geotagger {
    exporter: Exporter,
}

impl Geotagger {
    /// Create a geotagger that exports with `options`.
    pub fn new(options: ExportOptions) -> Self {
        Self {
            exporter: Exporter::new(options),
        }
    }

    /// Run the setup phases only and report the samples that would be
    /// exported.
    ///
    /// # Errors
    ///
    /// Any error opening the video, computing the frame increment, or
    /// reading the telemetry log.
    pub fn plan<T: AsRef<Path>, V: AsRef<Path>>(
        &self,
        telemetry_path: T,
        video_path: V,
        interval_seconds: f64,
    ) -> Result<RunPlan, GeoframeError> {
        let source = VideoSource::open(video_path)?;
        plan_with(&source, source.metadata().clone(), telemetry_path, interval_seconds)
    }

    /// Run the whole pipeline.
    ///
    /// # Errors
    ///
    /// Setup errors as for [`plan`](Geotagger::plan), and a failure to create
    /// the output directory. Per-frame export failures are reported in
    /// [`RunSummary::report`] instead.
    pub fn run<T: AsRef<Path>, V: AsRef<Path>>(
        &self,
        telemetry_path: T,
        video_path: V,
        interval_seconds: f64,
    ) -> Result<RunSummary, GeoframeError> {
        let video_path = video_path.as_ref();
        let mut source = VideoSource::open(video_path)?;
        let metadata = source.metadata().clone();
        let plan = plan_with(&source, metadata, telemetry_path, interval_seconds)?;
        let report = self.exporter.export(&plan.samples, &mut source, video_path)?;
        Ok(RunSummary { plan, report })
    }

    /// Run the export phase with a caller-supplied frame source.
    ///
    /// # Errors
    ///
    /// As for [`run`](Geotagger::run), minus video opening.
    pub fn run_with_source<S: FrameSource, T: AsRef<Path>>(
        &self,
        source: &mut S,
        video: VideoMetadata,
        video_path: &Path,
        telemetry_path: T,
        interval_seconds: f64,
    ) -> Result<RunSummary, GeoframeError> {
        let plan = plan_with(source, video, telemetry_path, interval_seconds)?;
        let report = self.exporter.export(&plan.samples, source, video_path)?;
        Ok(RunSummary { plan, report })
    }
}

fn plan_with<S: FrameSource + ?Sized, T: AsRef<Path>>(
    source: &S,
    video: VideoMetadata,
    telemetry_path: T,
    interval_seconds: f64,
) -> Result<RunPlan, GeoframeError> {
    let frame_increment = frame_increment(interval_seconds, source.frames_per_second())?;
    log::debug!(
        "Sampling every {frame_increment} frames ({interval_seconds} s at {:.3} fps)",
        source.frames_per_second()
    );

    let TelemetryLog {
        samples,
        block_count,
    } = read_telemetry(telemetry_path, frame_increment)?;

    if block_count.abs_diff(video.frame_count) > FRAME_COUNT_TOLERANCE {
        log::warn!(
            "Telemetry log has {block_count} frames but the video has about {}",
            video.frame_count
        );
    }

    Ok(RunPlan {
        frame_increment,
        video,
        telemetry_blocks: block_count,
        samples,
    })
}
