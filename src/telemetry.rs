//! Telemetry log reading.
//!
//! A drone telemetry log is a subtitle file with one fixed six-line block per
//! video frame:
//!
//! ```text
//! 1
//! 00:00:00,000 --> 00:00:00,033
//! <font size="28">FrameCnt: 1, DiffTime: 33ms
//! 2023-06-11 14:20:05.123
//! [focal_len: 24.00] [latitude: 22.608019] [longitude: 114.023509] [rel_alt: 1.300 abs_alt: 18.027] </font>
//!
//! ```
//!
//! Only the attribute line (the fifth line of each block) is consumed. The
//! reader skips the four lines before the first attribute line and then
//! takes every sixth line, so a truncated final block is harmless.
//!
//! [`read_telemetry`] turns a log into the ordered [`GeoSample`]s that the
//! export pipeline needs; [`TelemetryBlocks`] exposes the raw per-frame
//! attribute lines lazily.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::Path,
};

use crate::{
    attributes::{Attributes, parse_attributes},
    error::GeoframeError,
};

/// Lines preceding the first attribute line.
const HEADER_LINES: usize = 4;
/// Lines per frame block.
const BLOCK_LINES: usize = 6;

const LATITUDE: &str = "latitude";
const LONGITUDE: &str = "longitude";
const ABSOLUTE_ALTITUDE: &str = "abs_alt";
const FOCAL_LENGTH: &str = "focal_len";

/// Geolocation and lens data for one selected video frame.
///
/// Never constructed for a block whose latitude and longitude are both
/// `0.0`, which drones report when they have no GPS fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoSample {
    /// Decimal degrees, positive north.
    pub latitude: f64,
    /// Decimal degrees, positive east.
    pub longitude: f64,
    /// Meters above (positive) or below (negative) sea level.
    pub absolute_altitude: f64,
    /// Focal length in millimeters.
    pub focal_length: f64,
    /// Zero-based position of the frame in the video.
    pub frame_index: u64,
}

impl Display for GeoSample {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "frame {}: lat {}, lon {}, alt {} m, focal {} mm",
            self.frame_index,
            self.latitude,
            self.longitude,
            self.absolute_altitude,
            self.focal_length
        )
    }
}

/// The selected samples of a telemetry log.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryLog {
    /// Selected samples in ascending `frame_index` order.
    pub samples: Vec<GeoSample>,
    /// Number of frame blocks read from the log.
    pub block_count: u64,
}

/// The attribute line of one frame block.
#[derive(Debug, Clone)]
pub struct TelemetryBlock {
    /// Zero-based frame index of the block.
    pub frame_index: u64,
    /// 1-based line number of the attribute line.
    pub line: usize,
    /// Parsed attributes.
    pub attributes: Attributes,
}

impl TelemetryBlock {
    /// Look up a required attribute and parse it as a number.
    fn number(&self, key: &'static str) -> Result<f64, GeoframeError> {
        let value = self
            .attributes
            .get(key)
            .ok_or(GeoframeError::MissingAttribute {
                key,
                frame_index: self.frame_index,
                line: self.line,
            })?;
        value
            .parse::<f64>()
            .map_err(|_| GeoframeError::InvalidAttribute {
                key,
                value: value.to_string(),
                frame_index: self.frame_index,
                line: self.line,
            })
    }

    /// Build a sample if the block carries a GPS fix.
    ///
    /// `abs_alt` and `focal_len` are only required when the fix is valid.
    ///
    /// # Errors
    ///
    /// - [`GeoframeError::MissingAttribute`] if a required key is absent.
    /// - [`GeoframeError::InvalidAttribute`] if a value is not a number.
    pub fn geo_sample(&self) -> Result<Option<GeoSample>, GeoframeError> {
        let latitude = self.number(LATITUDE)?;
        let longitude = self.number(LONGITUDE)?;
        if latitude == 0.0 && longitude == 0.0 {
            return Ok(None);
        }

        Ok(Some(GeoSample {
            latitude,
            longitude,
            absolute_altitude: self.number(ABSOLUTE_ALTITUDE)?,
            focal_length: self.number(FOCAL_LENGTH)?,
            frame_index: self.frame_index,
        }))
    }
}

/// Lazy iterator over the frame blocks of a telemetry log.
///
/// Yields one [`TelemetryBlock`] per attribute line and stops at the first
/// end of file where an attribute line is expected.
pub struct TelemetryBlocks<R> {
    lines: Lines<R>,
    line_number: usize,
    frame_index: u64,
    started: bool,
}

impl<R: BufRead> TelemetryBlocks<R> {
    /// Iterate over the blocks read from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            frame_index: 0,
            started: false,
        }
    }

    /// Discard up to `count` lines. Returns `false` at end of file.
    fn skip(&mut self, count: usize) -> Result<bool, GeoframeError> {
        for _ in 0..count {
            if self.next_line()?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn next_line(&mut self) -> Result<Option<String>, GeoframeError> {
        match self.lines.next() {
            Some(line) => {
                self.line_number += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    fn next_block(&mut self) -> Result<Option<TelemetryBlock>, GeoframeError> {
        let gap = if self.started {
            BLOCK_LINES - 1
        } else {
            HEADER_LINES
        };
        self.started = true;

        if !self.skip(gap)? {
            return Ok(None);
        }
        let Some(line) = self.next_line()? else {
            return Ok(None);
        };

        let block = TelemetryBlock {
            frame_index: self.frame_index,
            line: self.line_number,
            attributes: parse_attributes(&line),
        };
        self.frame_index += 1;
        Ok(Some(block))
    }
}

impl<R: BufRead> Iterator for TelemetryBlocks<R> {
    type Item = Result<TelemetryBlock, GeoframeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_block().transpose()
    }
}

/// Read a telemetry log and select one sample every `increment` frames.
///
/// Blocks without a GPS fix are dropped even when they fall on the
/// increment.
///
/// # Errors
///
/// - [`GeoframeError::TelemetryRead`] if the file cannot be opened or read.
/// - [`GeoframeError::MissingAttribute`] / [`GeoframeError::InvalidAttribute`]
///   for the first selected block with unusable attributes. These abort the
///   whole read.
/// - [`GeoframeError::InvalidFrameIncrement`] if `increment` is zero.
///
/// # Example
///
/// ```no_run
/// use geoframe::read_telemetry;
///
/// let log = read_telemetry("DJI_0001.SRT", 30)?;
/// for sample in &log.samples {
///     println!("{sample}");
/// }
/// # Ok::<(), geoframe::GeoframeError>(())
/// ```
pub fn read_telemetry<P: AsRef<Path>>(
    path: P,
    increment: u64,
) -> Result<TelemetryLog, GeoframeError> {
    let path = path.as_ref();
    log::debug!("Reading telemetry log: {}", path.display());

    let file = File::open(path).map_err(|source| GeoframeError::TelemetryRead {
        path: path.to_path_buf(),
        source,
    })?;

    read_telemetry_from(BufReader::new(file), increment).map_err(|error| match error {
        GeoframeError::IoError(source) => GeoframeError::TelemetryRead {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Like [`read_telemetry`], reading from any buffered source.
pub fn read_telemetry_from<R: BufRead>(
    reader: R,
    increment: u64,
) -> Result<TelemetryLog, GeoframeError> {
    if increment == 0 {
        return Err(GeoframeError::InvalidFrameIncrement {
            seconds: 0.0,
            frames_per_second: 0.0,
        });
    }

    let mut samples = Vec::new();
    let mut block_count = 0;

    for block in TelemetryBlocks::new(reader) {
        let block = block?;
        block_count += 1;

        if block.frame_index % increment != 0 {
            continue;
        }
        match block.geo_sample()? {
            Some(sample) => samples.push(sample),
            None => log::debug!(
                "Skipping frame {}: no GPS fix (line {})",
                block.frame_index,
                block.line
            ),
        }
    }

    log::debug!(
        "Selected {} of {block_count} telemetry blocks (increment {increment})",
        samples.len()
    );

    Ok(TelemetryLog {
        samples,
        block_count,
    })
}
