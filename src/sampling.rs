//! Frame increment calculation.
//!
//! The telemetry reader keeps one block out of every *increment* blocks. The
//! increment is derived from the requested sampling interval and the video's
//! frame rate, and is later used as a modulus, so it must be at least one.

use crate::error::GeoframeError;

/// Absorbs binary rounding in the product (0.7 s × 30 fps is
/// 20.999999999999996 in `f64`).
const FLOOR_EPSILON: f64 = 1e-9;

/// Number of source frames that correspond to `seconds` of video.
///
/// Returns `max(1, floor(seconds * frames_per_second))`.
///
/// # Errors
///
/// Returns [`GeoframeError::InvalidFrameIncrement`] if either input is zero,
/// negative, NaN or infinite.
///
/// # Example
///
/// ```
/// use geoframe::frame_increment;
///
/// assert_eq!(frame_increment(2.0, 30.0)?, 60);
/// assert_eq!(frame_increment(0.5, 24.0)?, 12);
/// assert!(frame_increment(0.0, 30.0).is_err());
/// # Ok::<(), geoframe::GeoframeError>(())
/// ```
pub fn frame_increment(seconds: f64, frames_per_second: f64) -> Result<u64, GeoframeError> {
    let invalid = || GeoframeError::InvalidFrameIncrement {
        seconds,
        frames_per_second,
    };

    if !seconds.is_finite() || !frames_per_second.is_finite() {
        return Err(invalid());
    }
    let product = seconds * frames_per_second;
    if seconds <= 0.0 || frames_per_second <= 0.0 || !product.is_finite() {
        return Err(invalid());
    }

    let frames = (product + FLOOR_EPSILON).floor();
    if frames >= u64::MAX as f64 {
        return Err(invalid());
    }
    Ok((frames as u64).max(1))
}
