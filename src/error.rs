//! Error types for the `geoframe` crate.
//!
//! This module defines [`GeoframeError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry enough context (file
//! paths, frame indices, telemetry line numbers) to locate the offending
//! telemetry block or video frame.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `geoframe` operations.
///
/// Setup errors (opening the video, computing the frame increment, reading
/// the telemetry log) abort a run. Errors raised while exporting a single
/// frame are collected in the [`ExportReport`](crate::ExportReport) instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeoframeError {
    /// The video file could not be opened.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`VideoSource::open`](crate::VideoSource::open).
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// The decoder reached the end of the stream before the requested frame.
    #[error("Frame {frame_index} was not found in the video stream")]
    FrameNotFound {
        /// The frame that was requested.
        frame_index: u64,
    },

    /// The sampling interval and frame rate do not yield a positive frame
    /// increment.
    #[error(
        "Invalid frame increment: {seconds} s at {frames_per_second} fps must give at least one frame"
    )]
    InvalidFrameIncrement {
        /// Requested sampling interval in seconds.
        seconds: f64,
        /// Frame rate reported by the video.
        frames_per_second: f64,
    },

    /// A telemetry block lacks an attribute that is required to build a
    /// sample.
    #[error("Telemetry block for frame {frame_index} (line {line}) is missing `{key}`")]
    MissingAttribute {
        /// The attribute key that was looked up.
        key: &'static str,
        /// Frame index of the block.
        frame_index: u64,
        /// 1-based line number of the attribute line.
        line: usize,
    },

    /// A telemetry attribute value is not a number.
    #[error(
        "Telemetry block for frame {frame_index} (line {line}) has invalid `{key}` value {value:?}"
    )]
    InvalidAttribute {
        /// The attribute key.
        key: &'static str,
        /// The raw value found in the log.
        value: String,
        /// Frame index of the block.
        frame_index: u64,
        /// 1-based line number of the attribute line.
        line: usize,
    },

    /// The telemetry log could not be opened or read.
    #[error("Failed to read telemetry log at {path}: {source}")]
    TelemetryRead {
        /// Path of the telemetry log.
        path: PathBuf,
        /// Underlying I/O error.
        source: IoError,
    },

    /// A written image is not a well-formed JPEG stream.
    #[error("Invalid JPEG data: {0}")]
    InvalidJpeg(String),

    /// EXIF metadata could not be encoded.
    #[error("EXIF encoding error: {0}")]
    ExifError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while encoding a frame.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for GeoframeError {
    fn from(error: FfmpegError) -> Self {
        GeoframeError::FfmpegError(error.to_string())
    }
}
