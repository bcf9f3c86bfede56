//! Video metadata types.
//!
//! [`VideoMetadata`] is extracted once when a [`VideoSource`](crate::VideoSource)
//! is opened and cached for its lifetime.

/// Metadata for the video stream being sampled.
///
/// # Example
///
/// ```no_run
/// use geoframe::VideoSource;
///
/// let source = VideoSource::open("DJI_0001.MP4")?;
/// let metadata = source.metadata();
/// println!("{}x{} @ {:.2} fps", metadata.width, metadata.height, metadata.frames_per_second);
/// # Ok::<(), geoframe::GeoframeError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (average rate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Number of frames. Taken from the container when it records one,
    /// otherwise estimated from duration and frame rate.
    pub frame_count: u64,
    /// Codec name (e.g. `"h264"`, `"hevc"`).
    pub codec: String,
}
