//! Synthetic telemetry logs shared by the integration tests.

#![allow(dead_code)]

/// One frame's telemetry values.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub latitude: f64,
    pub longitude: f64,
    pub absolute_altitude: f64,
    pub focal_length: f64,
}

impl Frame {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            absolute_altitude: 18.027,
            focal_length: 24.0,
        }
    }

    /// A frame reporting the no-fix sentinel position.
    pub fn no_fix() -> Self {
        Self::at(0.0, 0.0)
    }
}

/// Attribute line in the drone's bracketed layout.
pub fn attribute_line(frame: &Frame) -> String {
    format!(
        "[iso: 110] [shutter: 1/200.0] [fnum: 2.8] [ev: 0] [focal_len: {:.2}] [latitude: {:.6}] [longitude: {:.6}] [rel_alt: 1.300 abs_alt: {:.3}] </font>",
        frame.focal_length, frame.latitude, frame.longitude, frame.absolute_altitude
    )
}

/// A complete six-line block with an arbitrary attribute line.
pub fn block_with(index: usize, attributes: &str) -> String {
    let start_ms = index * 33;
    let end_ms = start_ms + 33;
    format!(
        "{}\n00:00:{:02},{:03} --> 00:00:{:02},{:03}\n<font size=\"28\">FrameCnt: {}, DiffTime: 33ms\n2023-06-11 14:20:05.{:03}\n{attributes}\n\n",
        index + 1,
        start_ms / 1000,
        start_ms % 1000,
        end_ms / 1000,
        end_ms % 1000,
        index + 1,
        start_ms % 1000,
    )
}

/// A log made of one block per frame.
pub fn srt_log(frames: &[Frame]) -> String {
    frames
        .iter()
        .enumerate()
        .map(|(index, frame)| block_with(index, &attribute_line(frame)))
        .collect()
}

/// 1-based line number of the attribute line of block `index`.
pub fn attribute_line_number(index: usize) -> usize {
    5 + 6 * index
}
