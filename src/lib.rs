//! # geoframe
//!
//! Extract periodic still frames from drone video and geotag them with the
//! GPS position, altitude and focal length recorded in the drone's SRT
//! telemetry log.
//!
//! The pipeline runs in three sequential phases:
//!
//! 1. **Frame increment**: the requested sampling interval is converted to
//!    a number of frames using the video's frame rate ([`frame_increment`]).
//! 2. **Telemetry**: the log is read one block per frame, keeping every
//!    *increment*-th frame that has a GPS fix ([`read_telemetry`]).
//! 3. **Export**: each selected frame is decoded, written as a JPEG, and
//!    rewritten with EXIF GPS and focal-length tags ([`Exporter`]).
//!
//! Video decoding is powered by FFmpeg via
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next); EXIF encoding by
//! [`little_exif`](https://crates.io/crates/little_exif) and JPEG segment
//! handling by [`img-parts`](https://crates.io/crates/img-parts).
//!
//! ## Quick Start
//!
//! ```no_run
//! use geoframe::{ExportOptions, Geotagger};
//!
//! let geotagger = Geotagger::new(ExportOptions::new().with_output_directory("out"));
//! let summary = geotagger.run("DJI_0001.SRT", "DJI_0001.MP4", 1.0)?;
//! for failure in &summary.report.failures {
//!     eprintln!("frame {}: {}", failure.frame_index, failure.error);
//! }
//! # Ok::<(), geoframe::GeoframeError>(())
//! ```
//!
//! ### Reading telemetry only
//!
//! ```no_run
//! use geoframe::read_telemetry;
//!
//! // One sample every 30 frames.
//! let log = read_telemetry("DJI_0001.SRT", 30)?;
//! println!("{} of {} frames selected", log.samples.len(), log.block_count);
//! # Ok::<(), geoframe::GeoframeError>(())
//! ```
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod attributes;
pub mod config;
pub mod error;
pub mod export;
pub mod ffmpeg;
pub mod geodesy;
pub mod geotag;
pub mod geotagger;
pub mod metadata;
pub mod progress;
pub mod sampling;
pub mod telemetry;
mod utilities;
pub mod video;

pub use attributes::{Attributes, parse_attributes};
pub use config::{DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_DIRECTORY, ExportOptions};
pub use error::GeoframeError;
pub use export::{ExportFailure, ExportReport, Exporter};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use geodesy::{AltitudeRef, Dms, LatitudeRef, LongitudeRef, to_dms};
pub use geotag::{embed_exif, exif_metadata, exif_payload, geotag_file};
pub use geotagger::{DEFAULT_INTERVAL_SECONDS, Geotagger, RunPlan, RunSummary};
pub use metadata::VideoMetadata;
pub use progress::{ProgressCallback, ProgressInfo};
pub use sampling::frame_increment;
pub use telemetry::{
    GeoSample, TelemetryBlock, TelemetryBlocks, TelemetryLog, read_telemetry,
    read_telemetry_from,
};
pub use video::{FrameSource, VideoSource};
