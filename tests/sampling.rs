//! Frame increment tests.

use geoframe::{GeoframeError, frame_increment};

#[test]
fn whole_seconds() {
    assert_eq!(frame_increment(1.0, 30.0).unwrap(), 30);
    assert_eq!(frame_increment(2.0, 30.0).unwrap(), 60);
    assert_eq!(frame_increment(1.0, 25.0).unwrap(), 25);
}

#[test]
fn fractional_products_are_floored() {
    assert_eq!(frame_increment(1.0, 29.97).unwrap(), 29);
    assert_eq!(frame_increment(0.5, 24.0).unwrap(), 12);
    assert_eq!(frame_increment(1.5, 23.976).unwrap(), 35);
}

#[test]
fn binary_rounding_does_not_lose_a_frame() {
    // 0.7 * 30.0 is just below 21 in f64.
    assert_eq!(frame_increment(0.7, 30.0).unwrap(), 21);
    assert_eq!(frame_increment(0.1, 30.0).unwrap(), 3);
}

#[test]
fn tiny_intervals_clamp_to_one_frame() {
    assert_eq!(frame_increment(0.01, 30.0).unwrap(), 1);
    assert_eq!(frame_increment(0.5, 1.0).unwrap(), 1);
}

#[test]
fn non_positive_inputs_are_rejected() {
    for (seconds, fps) in [(0.0, 30.0), (-1.0, 30.0), (1.0, 0.0), (1.0, -24.0)] {
        let result = frame_increment(seconds, fps);
        assert!(
            matches!(result, Err(GeoframeError::InvalidFrameIncrement { .. })),
            "({seconds}, {fps}) should be rejected, got {result:?}"
        );
    }
}

#[test]
fn non_finite_inputs_are_rejected() {
    assert!(frame_increment(f64::NAN, 30.0).is_err());
    assert!(frame_increment(1.0, f64::INFINITY).is_err());
    assert!(frame_increment(f64::MAX, f64::MAX).is_err());
}

#[test]
fn error_message_names_the_inputs() {
    let message = frame_increment(0.0, 30.0).unwrap_err().to_string();
    assert!(message.contains("0 s"), "{message}");
    assert!(message.contains("30 fps"), "{message}");
}
