//! Video frame access.
//!
//! [`FrameSource`] is the seam between the export pipeline and whatever
//! produces frames. [`VideoSource`] implements it on top of FFmpeg: it keeps
//! one demuxer, decoder and RGB24 scaler open for the whole run and moves a
//! single frame cursor through the video.
//!
//! Requests for frames a short distance ahead of the cursor are served by
//! decoding forward. Anything else (going backwards, or jumping far ahead)
//! seeks to the preceding keyframe first and decodes forward from there.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::{
    error::GeoframeError,
    metadata::VideoMetadata,
    utilities::{frame_index_to_seek_timestamp, frame_to_rgb_buffer, pts_to_frame_index},
};

/// Frames further ahead than this are reached by seeking rather than by
/// decoding every frame in between.
const FORWARD_DECODE_LIMIT: u64 = 250;

/// Anything that can report its frame rate and hand out decoded frames by
/// index.
///
/// Frames are returned in RGB channel order, ready for the image encoder.
pub trait FrameSource {
    /// Frames per second of the underlying video.
    fn frames_per_second(&self) -> f64;

    /// Decode the frame at zero-based `frame_index`.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the frame cannot be located or
    /// decoded. The export pipeline treats this as a failure of that frame
    /// only.
    fn frame(&mut self, frame_index: u64) -> Result<RgbImage, GeoframeError>;
}

/// FFmpeg-backed [`FrameSource`] over the best video stream of a file.
///
/// # Example
///
/// ```no_run
/// use geoframe::{FrameSource, VideoSource};
///
/// let mut source = VideoSource::open("DJI_0001.MP4")?;
/// println!("{:.3} fps", source.frames_per_second());
/// let frame = source.frame(120)?;
/// frame.save("frame_120.png")?;
/// # Ok::<(), geoframe::GeoframeError>(())
/// ```
pub struct VideoSource {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    stream_index: usize,
    time_base: Rational,
    /// PTS of the first frame, subtracted before converting to an index.
    start_pts: i64,
    metadata: VideoMetadata,
    /// Index the next decoded frame is expected to have. `None` right after
    /// a seek, until a frame has been decoded.
    next_frame_index: Option<u64>,
    end_of_stream: bool,
    file_path: PathBuf,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("metadata", &self.metadata)
            .field("stream_index", &self.stream_index)
            .field("next_frame_index", &self.next_frame_index)
            .field("end_of_stream", &self.end_of_stream)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open a video file and prepare its best video stream for decoding.
    ///
    /// # Errors
    ///
    /// - [`GeoframeError::FileOpen`] if FFmpeg cannot open the file or build
    ///   a decoder for it.
    /// - [`GeoframeError::NoVideoStream`] if the file has no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GeoframeError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening video file: {}", file_path.display());

        let open_error = |reason: String| GeoframeError::FileOpen {
            path: file_path.clone(),
            reason,
        };

        ffmpeg_next::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| open_error(error.to_string()))?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(GeoframeError::NoVideoStream)?;
        let stream_index = stream.index();
        let time_base = stream.time_base();
        let start_pts = match stream.start_time() {
            i64::MIN => 0,
            start => start,
        };

        let frames_per_second = rational_to_f64(stream.avg_frame_rate())
            .or_else(|| rational_to_f64(stream.rate()))
            .unwrap_or(0.0);

        let duration = match input_context.duration() {
            microseconds if microseconds > 0 => Duration::from_micros(microseconds as u64),
            _ => Duration::ZERO,
        };
        let frame_count = match stream.frames() {
            recorded if recorded > 0 => recorded as u64,
            _ => (duration.as_secs_f64() * frames_per_second) as u64,
        };

        let decoder_context = CodecContext::from_parameters(stream.parameters()).map_err(
            |error| open_error(format!("Failed to read video codec parameters: {error}")),
        )?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| open_error(format!("Failed to create video decoder: {error}")))?;

        let width = decoder.width();
        let height = decoder.height();
        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        // Decoder order (usually planar YUV) to the RGB order the encoder expects.
        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| open_error(format!("Failed to create pixel converter: {error}")))?;

        let metadata = VideoMetadata {
            width,
            height,
            frames_per_second,
            frame_count,
            codec,
        };
        log::debug!("Video stream {stream_index}: {metadata:?}");

        Ok(Self {
            input_context,
            decoder,
            scaler,
            stream_index,
            time_base,
            start_pts,
            metadata,
            next_frame_index: Some(0),
            end_of_stream: false,
            file_path,
        })
    }

    /// Metadata of the opened video stream.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn needs_seek(&self, frame_index: u64) -> bool {
        match self.next_frame_index {
            Some(next) => frame_index < next || frame_index - next > FORWARD_DECODE_LIMIT,
            None => true,
        }
    }

    fn seek(&mut self, frame_index: u64) -> Result<(), GeoframeError> {
        let timestamp =
            frame_index_to_seek_timestamp(frame_index, self.metadata.frames_per_second);
        log::debug!("Seeking to frame {frame_index} (timestamp {timestamp} us)");

        self.input_context.seek(timestamp, ..timestamp)?;
        self.decoder.flush();
        self.end_of_stream = false;
        self.next_frame_index = None;
        Ok(())
    }

    /// Receive the next decoded frame, feeding packets as needed.
    ///
    /// Returns `None` once the decoder has been drained at end of stream.
    fn decode_next(&mut self) -> Result<Option<VideoFrame>, GeoframeError> {
        let mut decoded_frame = VideoFrame::empty();
        loop {
            if self.decoder.receive_frame(&mut decoded_frame).is_ok() {
                return Ok(Some(decoded_frame));
            }
            if self.end_of_stream {
                return Ok(None);
            }

            let stream_index = self.stream_index;
            let packet = self
                .input_context
                .packets()
                .find(|(stream, _)| stream.index() == stream_index)
                .map(|(_, packet)| packet);

            match packet {
                Some(packet) => self.decoder.send_packet(&packet)?,
                None => {
                    self.decoder.send_eof()?;
                    self.end_of_stream = true;
                }
            }
        }
    }

    fn index_of(&self, decoded_frame: &VideoFrame) -> u64 {
        decoded_frame
            .timestamp()
            .or_else(|| decoded_frame.pts())
            .map(|pts| {
                pts_to_frame_index(
                    pts.saturating_sub(self.start_pts),
                    self.time_base,
                    self.metadata.frames_per_second,
                )
            })
            .or(self.next_frame_index)
            .unwrap_or(0)
    }

    fn convert(&mut self, decoded_frame: &VideoFrame) -> Result<RgbImage, GeoframeError> {
        let mut rgb_frame = VideoFrame::empty();
        self.scaler.run(decoded_frame, &mut rgb_frame)?;

        let (width, height) = (self.metadata.width, self.metadata.height);
        let buffer = frame_to_rgb_buffer(&rgb_frame, width, height);
        RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            GeoframeError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })
    }
}

impl FrameSource for VideoSource {
    fn frames_per_second(&self) -> f64 {
        self.metadata.frames_per_second
    }

    fn frame(&mut self, frame_index: u64) -> Result<RgbImage, GeoframeError> {
        if self.needs_seek(frame_index) {
            self.seek(frame_index)?;
        }

        while let Some(decoded_frame) = self.decode_next()? {
            let current = self.index_of(&decoded_frame);
            self.next_frame_index = Some(current + 1);

            if current < frame_index {
                continue;
            }
            if current > frame_index {
                log::debug!("Frame {frame_index} has no exact match; using frame {current}");
            }
            return self.convert(&decoded_frame);
        }

        self.next_frame_index = None;
        Err(GeoframeError::FrameNotFound { frame_index })
    }
}

fn rational_to_f64(rate: Rational) -> Option<f64> {
    if rate.numerator() > 0 && rate.denominator() > 0 {
        Some(rate.numerator() as f64 / rate.denominator() as f64)
    } else {
        None
    }
}
