//! Decimal-degree to degrees/minutes/seconds conversion and the GPS
//! reference indicators written alongside coordinates.
//!
//! EXIF stores coordinates as unsigned sexagesimal triples; the sign travels
//! separately as a hemisphere letter. Altitude likewise is stored as an
//! absolute value plus an above/below sea level flag.
//!
//! All reference selections use a strict `> 0` test, so an exact `0.0` maps
//! to the negative side (`S`, `W`, below sea level).

use std::fmt::{Display, Formatter, Result as FmtResult};

/// An angle split into degrees, minutes and seconds of arc.
///
/// All three components are non-negative; `degrees` and `minutes` are
/// integral, `seconds` carries the fractional remainder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    /// Whole degrees.
    pub degrees: f64,
    /// Whole minutes, `0 <= minutes < 60`.
    pub minutes: f64,
    /// Seconds, `0 <= seconds < 60`.
    pub seconds: f64,
}

impl Display for Dms {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}°{}'{:.4}\"",
            self.degrees, self.minutes, self.seconds
        )
    }
}

/// Convert a signed decimal-degree value to degrees/minutes/seconds.
///
/// The sign is discarded; use [`LatitudeRef`] or [`LongitudeRef`] to carry
/// it. Any finite input is valid.
///
/// # Example
///
/// ```
/// use geoframe::to_dms;
///
/// let dms = to_dms(-33.5);
/// assert_eq!((dms.degrees, dms.minutes), (33.0, 30.0));
/// assert!(dms.seconds.abs() < 1e-9);
/// ```
pub fn to_dms(decimal: f64) -> Dms {
    let total_seconds = decimal.abs() * 3600.0;
    let (minutes, seconds) = divmod(total_seconds, 60.0);
    let (degrees, minutes) = divmod(minutes, 60.0);
    Dms {
        degrees,
        minutes,
        seconds,
    }
}

/// Floor division and remainder for non-negative operands.
fn divmod(value: f64, divisor: f64) -> (f64, f64) {
    let quotient = (value / divisor).floor();
    let remainder = value - quotient * divisor;
    // Rounding in the subtraction can leave the remainder a hair outside
    // `[0, divisor)`.
    if remainder >= divisor {
        (quotient + 1.0, remainder - divisor)
    } else if remainder < 0.0 {
        (quotient - 1.0, remainder + divisor)
    } else {
        (quotient, remainder)
    }
}

/// Hemisphere of a latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatitudeRef {
    /// Strictly positive latitude.
    North,
    /// Zero or negative latitude.
    South,
}

impl LatitudeRef {
    /// Select the hemisphere for `latitude`.
    pub fn from_degrees(latitude: f64) -> Self {
        if latitude > 0.0 {
            LatitudeRef::North
        } else {
            LatitudeRef::South
        }
    }

    /// EXIF `GPSLatitudeRef` letter.
    pub fn as_char(self) -> char {
        match self {
            LatitudeRef::North => 'N',
            LatitudeRef::South => 'S',
        }
    }
}

/// Hemisphere of a longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LongitudeRef {
    /// Strictly positive longitude.
    East,
    /// Zero or negative longitude.
    West,
}

impl LongitudeRef {
    /// Select the hemisphere for `longitude`.
    pub fn from_degrees(longitude: f64) -> Self {
        if longitude > 0.0 {
            LongitudeRef::East
        } else {
            LongitudeRef::West
        }
    }

    /// EXIF `GPSLongitudeRef` letter.
    pub fn as_char(self) -> char {
        match self {
            LongitudeRef::East => 'E',
            LongitudeRef::West => 'W',
        }
    }
}

/// Altitude reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AltitudeRef {
    /// Strictly positive altitude.
    AboveSeaLevel,
    /// Zero or negative altitude.
    BelowSeaLevel,
}

impl AltitudeRef {
    /// Select the reference for a signed altitude in meters.
    pub fn from_meters(altitude: f64) -> Self {
        if altitude > 0.0 {
            AltitudeRef::AboveSeaLevel
        } else {
            AltitudeRef::BelowSeaLevel
        }
    }

    /// EXIF `GPSAltitudeRef` byte.
    pub fn as_exif_byte(self) -> u8 {
        match self {
            AltitudeRef::AboveSeaLevel => 0,
            AltitudeRef::BelowSeaLevel => 1,
        }
    }
}
