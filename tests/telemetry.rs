//! Telemetry log reading tests.

mod common;

use std::io::{Cursor, Write};

use common::{Frame, attribute_line, attribute_line_number, block_with, srt_log};
use geoframe::{GeoframeError, TelemetryBlocks, read_telemetry, read_telemetry_from};

fn read(log: &str, increment: u64) -> Result<geoframe::TelemetryLog, GeoframeError> {
    read_telemetry_from(Cursor::new(log.as_bytes()), increment)
}

fn frame_indices(log: &str, increment: u64) -> Vec<u64> {
    read(log, increment)
        .expect("log should read")
        .samples
        .iter()
        .map(|sample| sample.frame_index)
        .collect()
}

/// `count` frames where bit `i` of `valid` decides whether frame `i` has a
/// GPS fix.
fn masked_log(count: usize, valid: u32) -> String {
    let frames: Vec<Frame> = (0..count)
        .map(|index| {
            if valid & (1 << index) != 0 {
                Frame::at(22.6 + index as f64 * 0.001, 114.0)
            } else {
                Frame::no_fix()
            }
        })
        .collect();
    srt_log(&frames)
}

// ── Selection ──────────────────────────────────────────────────────

#[test]
fn every_frame_with_increment_one() {
    let log = srt_log(&[Frame::at(1.0, 2.0), Frame::at(3.0, 4.0), Frame::at(5.0, 6.0)]);
    let telemetry = read(&log, 1).unwrap();

    assert_eq!(telemetry.block_count, 3);
    assert_eq!(telemetry.samples.len(), 3);
    let first = telemetry.samples[0];
    assert_eq!(first.frame_index, 0);
    assert_eq!(first.latitude, 1.0);
    assert_eq!(first.longitude, 2.0);
    assert_eq!(first.absolute_altitude, 18.027);
    assert_eq!(first.focal_length, 24.0);
}

#[test]
fn alternating_fix_with_increment_three() {
    // Frames 0, 2, 4, 6, 8 have a fix; aligned frames are 0, 3, 6, 9.
    let log = masked_log(10, 0b01_0101_0101);
    assert_eq!(frame_indices(&log, 3), vec![0, 6]);
}

#[test]
fn selection_matches_alignment_and_fix_for_all_patterns() {
    const FRAMES: usize = 7;
    for increment in 1..=8u64 {
        for valid in 0..(1u32 << FRAMES) {
            let expected: Vec<u64> = (0..FRAMES as u64)
                .filter(|index| index % increment == 0 && valid & (1 << index) != 0)
                .collect();
            let actual = frame_indices(&masked_log(FRAMES, valid), increment);
            assert_eq!(actual, expected, "increment {increment}, valid {valid:#09b}");
        }
    }
}

#[test]
fn increment_larger_than_log_keeps_only_first_frame() {
    let log = srt_log(&[Frame::at(1.0, 1.0), Frame::at(2.0, 2.0)]);
    assert_eq!(frame_indices(&log, 100), vec![0]);
}

#[test]
fn negative_zero_is_treated_as_no_fix() {
    let log = srt_log(&[Frame::at(-0.0, 0.0), Frame::at(0.0, -0.0), Frame::at(1.0, 0.0)]);
    assert_eq!(frame_indices(&log, 1), vec![2]);
}

#[test]
fn one_zero_coordinate_is_still_a_fix() {
    let log = srt_log(&[Frame::at(0.0, 114.0), Frame::at(51.5, 0.0)]);
    assert_eq!(frame_indices(&log, 1), vec![0, 1]);
}

#[test]
fn reading_twice_gives_the_same_result() {
    let log = masked_log(9, 0b1_1011_0111);
    assert_eq!(read(&log, 2).unwrap(), read(&log, 2).unwrap());
}

// ── Layout ─────────────────────────────────────────────────────────

#[test]
fn empty_log_has_no_blocks() {
    let telemetry = read("", 1).unwrap();
    assert_eq!(telemetry.block_count, 0);
    assert!(telemetry.samples.is_empty());
}

#[test]
fn truncated_final_block_is_ignored() {
    let mut log = srt_log(&[Frame::at(1.0, 1.0), Frame::at(2.0, 2.0)]);
    log.push_str("3\n00:00:00,066 --> 00:00:00,099\n");
    let telemetry = read(&log, 1).unwrap();
    assert_eq!(telemetry.block_count, 2);
}

#[test]
fn missing_trailing_blank_line_is_harmless() {
    let mut log = srt_log(&[Frame::at(1.0, 1.0), Frame::at(2.0, 2.0)]);
    log.truncate(log.len() - 1);
    assert_eq!(frame_indices(&log, 1), vec![0, 1]);
}

#[test]
fn crlf_line_endings() {
    let log = srt_log(&[Frame::at(1.0, 1.0), Frame::at(2.0, 2.0)]).replace('\n', "\r\n");
    assert_eq!(frame_indices(&log, 1), vec![0, 1]);
}

#[test]
fn blocks_report_attribute_line_numbers() {
    let log = srt_log(&[Frame::at(1.0, 1.0), Frame::at(2.0, 2.0), Frame::at(3.0, 3.0)]);
    let blocks: Vec<_> = TelemetryBlocks::new(Cursor::new(log.as_bytes()))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(blocks.len(), 3);
    for (index, block) in blocks.iter().enumerate() {
        assert_eq!(block.frame_index, index as u64);
        assert_eq!(block.line, attribute_line_number(index));
        assert!(block.attributes.get("latitude").is_some());
    }
}

// ── Attribute errors ───────────────────────────────────────────────

#[test]
fn missing_latitude_on_aligned_block_fails_with_location() {
    let mut log = srt_log(&[Frame::at(1.0, 1.0), Frame::at(2.0, 2.0)]);
    log.push_str(&block_with(2, "[longitude: 3.0] [abs_alt: 1.0] [focal_len: 24.0]"));

    match read(&log, 1) {
        Err(GeoframeError::MissingAttribute {
            key,
            frame_index,
            line,
        }) => {
            assert_eq!(key, "latitude");
            assert_eq!(frame_index, 2);
            assert_eq!(line, attribute_line_number(2));
        }
        other => panic!("expected MissingAttribute, got {other:?}"),
    }
}

#[test]
fn invalid_longitude_fails() {
    let log = block_with(0, "[latitude: 1.0] [longitude: east] [abs_alt: 1.0] [focal_len: 24.0]");
    match read(&log, 1) {
        Err(GeoframeError::InvalidAttribute { key, value, .. }) => {
            assert_eq!(key, "longitude");
            assert_eq!(value, "east");
        }
        other => panic!("expected InvalidAttribute, got {other:?}"),
    }
}

#[test]
fn unaligned_blocks_are_not_validated() {
    let mut log = block_with(0, &attribute_line(&Frame::at(1.0, 1.0)));
    log.push_str(&block_with(1, "garbage without attributes"));
    log.push_str(&block_with(2, &attribute_line(&Frame::at(3.0, 3.0))));

    let telemetry = read(&log, 2).unwrap();
    assert_eq!(telemetry.block_count, 3);
    assert_eq!(
        telemetry
            .samples
            .iter()
            .map(|sample| sample.frame_index)
            .collect::<Vec<_>>(),
        vec![0, 2]
    );
    assert!(read(&log, 1).is_err());
}

#[test]
fn altitude_and_focal_length_not_required_without_fix() {
    let log = block_with(0, "[latitude: 0.000000] [longitude: 0.000000]");
    let telemetry = read(&log, 1).unwrap();
    assert!(telemetry.samples.is_empty());
}

#[test]
fn altitude_required_with_fix() {
    let log = block_with(0, "[latitude: 1.0] [longitude: 1.0] [focal_len: 24.0]");
    assert!(matches!(
        read(&log, 1),
        Err(GeoframeError::MissingAttribute { key: "abs_alt", .. })
    ));
}

#[test]
fn focal_length_required_with_fix() {
    let log = block_with(0, "[latitude: 1.0] [longitude: 1.0] [rel_alt: 0.0 abs_alt: 5.0]");
    assert!(matches!(
        read(&log, 1),
        Err(GeoframeError::MissingAttribute { key: "focal_len", .. })
    ));
}

#[test]
fn zero_increment_is_rejected() {
    assert!(matches!(
        read("", 0),
        Err(GeoframeError::InvalidFrameIncrement { .. })
    ));
}

// ── Files ──────────────────────────────────────────────────────────

#[test]
fn reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(srt_log(&[Frame::at(22.608019, 114.023509)]).as_bytes())
        .unwrap();

    let telemetry = read_telemetry(file.path(), 1).unwrap();
    assert_eq!(telemetry.samples.len(), 1);
    assert_eq!(telemetry.samples[0].latitude, 22.608019);
    assert_eq!(telemetry.samples[0].longitude, 114.023509);
}

#[test]
fn missing_file_is_a_telemetry_read_error() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("missing.srt");
    match read_telemetry(&path, 1) {
        Err(GeoframeError::TelemetryRead { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected TelemetryRead, got {other:?}"),
    }
}
