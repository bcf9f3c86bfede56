//! Internal helpers for pixel copying and timestamp arithmetic.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy an RGB24 frame into a tightly-packed buffer.
///
/// FFmpeg pads rows to its alignment, so the plane stride is often larger
/// than `width * 3`.
pub(crate) fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_bytes = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == row_bytes {
        data[..row_bytes * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }
        buffer
    }
}

/// Frame index of a presentation timestamp.
///
/// Rounds to the nearest frame so that timestamps a tick early (common
/// with 1001-based NTSC rates) still land on the right index.
pub(crate) fn pts_to_frame_index(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let seconds = pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64;
    let frame = (seconds * frames_per_second).round();
    if frame <= 0.0 { 0 } else { frame as u64 }
}

/// Seek target for a frame index, in AV_TIME_BASE (microseconds).
///
/// `Input::seek` seeks with `stream_index = -1`, which expects container
/// time rather than the stream's time base.
pub(crate) fn frame_index_to_seek_timestamp(frame_index: u64, frames_per_second: f64) -> i64 {
    let seconds = frame_index as f64 / frames_per_second;
    (seconds * 1_000_000.0) as i64
}
