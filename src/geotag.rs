//! EXIF geotag construction and JPEG embedding.
//!
//! [`exif_metadata`] maps a [`GeoSample`] onto EXIF GPS and lens tags using
//! `little_exif`. [`embed_exif`] puts the encoded block into an existing JPEG
//! stream as its Exif APP1 segment, replacing any Exif block the stream
//! already had. [`geotag_file`] does both for a file on disk: read it,
//! splice, overwrite.

use std::{fs, path::Path};

use img_parts::{Bytes, ImageEXIF, jpeg::Jpeg};
use little_exif::{
    exif_tag::ExifTag, filetype::FileExtension, metadata::Metadata, rational::uR64,
};

use crate::{
    error::GeoframeError,
    geodesy::{AltitudeRef, Dms, LatitudeRef, LongitudeRef, to_dms},
    telemetry::GeoSample,
};

const APP1: u8 = 0xE1;
const EXIF_IDENTIFIER: &[u8] = b"Exif\0\0";

/// Denominators used when storing real values as EXIF rationals.
const SECONDS_DENOMINATOR: u32 = 10_000;
const ALTITUDE_DENOMINATOR: u32 = 1_000;
const FOCAL_LENGTH_DENOMINATOR: u32 = 100;

/// Build the EXIF tags for `sample`.
///
/// Sets `GPSLatitude`/`GPSLatitudeRef`, `GPSLongitude`/`GPSLongitudeRef`,
/// `GPSAltitude`/`GPSAltitudeRef` and `FocalLength`.
pub fn exif_metadata(sample: &GeoSample) -> Metadata {
    let latitude_ref = LatitudeRef::from_degrees(sample.latitude);
    let longitude_ref = LongitudeRef::from_degrees(sample.longitude);
    let altitude_ref = AltitudeRef::from_meters(sample.absolute_altitude);

    let mut metadata = Metadata::new();
    metadata.set_tag(ExifTag::GPSLatitudeRef(latitude_ref.as_char().to_string()));
    metadata.set_tag(ExifTag::GPSLatitude(dms_rationals(to_dms(sample.latitude))));
    metadata.set_tag(ExifTag::GPSLongitudeRef(longitude_ref.as_char().to_string()));
    metadata.set_tag(ExifTag::GPSLongitude(dms_rationals(to_dms(sample.longitude))));
    metadata.set_tag(ExifTag::GPSAltitudeRef(vec![altitude_ref.as_exif_byte()]));
    metadata.set_tag(ExifTag::GPSAltitude(vec![rational(
        sample.absolute_altitude.abs(),
        ALTITUDE_DENOMINATOR,
    )]));
    metadata.set_tag(ExifTag::FocalLength(vec![rational(
        sample.focal_length,
        FOCAL_LENGTH_DENOMINATOR,
    )]));

    metadata
}

fn dms_rationals(dms: Dms) -> Vec<uR64> {
    vec![
        rational(dms.degrees, 1),
        rational(dms.minutes, 1),
        rational(dms.seconds, SECONDS_DENOMINATOR),
    ]
}

/// Unsigned rational approximation of `value` with a fixed denominator.
///
/// Negative and NaN values clamp to zero, huge values to `u32::MAX`.
fn rational(value: f64, denominator: u32) -> uR64 {
    let scaled = (value * denominator as f64).round();
    let nominator = if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    };
    uR64 {
        nominator,
        denominator,
    }
}

/// Encode `metadata` as a TIFF-structured EXIF payload, without the
/// `Exif\0\0` identifier or any APP1 framing.
pub fn exif_payload(metadata: &Metadata) -> Result<Vec<u8>, GeoframeError> {
    let encoded = metadata
        .as_u8_vec(FileExtension::JPEG)
        .map_err(|error| GeoframeError::ExifError(format!("{error:?}")))?;

    let mut payload = encoded.as_slice();
    if payload.len() >= 4 && payload[0] == 0xFF && payload[1] == APP1 {
        payload = &payload[4..];
    }
    Ok(payload
        .strip_prefix(EXIF_IDENTIFIER)
        .unwrap_or(payload)
        .to_vec())
}

/// Replace the EXIF block of `jpeg` with `exif`, keeping every other
/// segment and the image data untouched.
///
/// # Errors
///
/// Returns [`GeoframeError::InvalidJpeg`] if `jpeg` cannot be parsed as a
/// JPEG stream.
pub fn embed_exif(jpeg: &[u8], exif: &[u8]) -> Result<Vec<u8>, GeoframeError> {
    let mut image = Jpeg::from_bytes(Bytes::copy_from_slice(jpeg))
        .map_err(|error| GeoframeError::InvalidJpeg(error.to_string()))?;
    image.set_exif(Some(Bytes::copy_from_slice(exif)));

    let mut output = Vec::with_capacity(jpeg.len() + exif.len() + 10);
    image.encoder().write_to(&mut output)?;
    Ok(output)
}

/// Embed the EXIF geotag for `sample` into the JPEG file at `path`.
///
/// Reads the file, splices the EXIF segment in, and overwrites the file.
///
/// # Errors
///
/// Returns I/O errors from reading or writing the file, and the errors of
/// [`exif_payload`] and [`embed_exif`].
pub fn geotag_file<P: AsRef<Path>>(path: P, sample: &GeoSample) -> Result<(), GeoframeError> {
    let path = path.as_ref();
    let jpeg = fs::read(path)?;
    let payload = exif_payload(&exif_metadata(sample))?;
    let tagged = embed_exif(&jpeg, &payload)?;
    fs::write(path, tagged)?;
    Ok(())
}
