//! Video source integration tests.
//!
//! Fixture-based tests require `tests/fixtures/generate_fixtures.sh` to have
//! been run; they are skipped otherwise.

use std::path::Path;

use geoframe::{FrameSource, GeoframeError, VideoSource};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

// ── Opening ────────────────────────────────────────────────────────

#[test]
fn open_nonexistent_file() {
    let result = VideoSource::open("this_file_does_not_exist.mp4");
    match result {
        Err(error @ GeoframeError::FileOpen { .. }) => {
            let message = error.to_string();
            assert!(
                message.contains("Failed to open video file"),
                "Error message should mention file open failure: {message}",
            );
        }
        other => panic!("expected FileOpen, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn open_invalid_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a video file")
        .expect("Failed to write invalid file");

    assert!(VideoSource::open(&invalid_file_path).is_err());
}

// ── Fixture video ──────────────────────────────────────────────────

#[test]
fn metadata_matches_fixture() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let source = VideoSource::open(path).expect("Failed to open fixture");
    let metadata = source.metadata();
    assert_eq!((metadata.width, metadata.height), (320, 240));
    assert!((metadata.frames_per_second - 30.0).abs() < 0.01);
    assert!(metadata.frame_count.abs_diff(90) <= 1, "{}", metadata.frame_count);
    assert_eq!(metadata.codec, "h264");
    assert_eq!(source.frames_per_second(), metadata.frames_per_second);
}

#[test]
fn frames_decode_in_any_order() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = VideoSource::open(path).expect("Failed to open fixture");
    for frame_index in [0, 1, 30, 89, 15, 0, 60] {
        let frame = source
            .frame(frame_index)
            .unwrap_or_else(|error| panic!("frame {frame_index}: {error}"));
        assert_eq!(frame.dimensions(), (320, 240));
    }
}

#[test]
fn same_frame_twice_is_identical() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = VideoSource::open(path).expect("Failed to open fixture");
    let first = source.frame(45).expect("Failed to decode frame 45");
    source.frame(80).expect("Failed to decode frame 80");
    let again = source.frame(45).expect("Failed to decode frame 45 again");
    assert_eq!(first.as_raw(), again.as_raw());
}

#[test]
fn frame_past_end_is_an_error() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = VideoSource::open(path).expect("Failed to open fixture");
    // Depending on the demuxer this fails in the seek or after draining the
    // decoder.
    assert!(source.frame(10_000).is_err());
    // The source stays usable after a miss.
    assert!(source.frame(5).is_ok());
}
