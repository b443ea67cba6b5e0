//! In-process EXIF reader (kamadak-exif). Produces the same tag names and value layout as
//! `exiftool -j`, so the converter does not care which facility ran.

use anyhow::{Context, Result};
use exif::{Exif, In, Reader, Tag, Value};
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{MetadataExtractor, RawMetadata, guess_mime_type, keys};

/// Stateless; every call opens its own file handle.
pub struct NativeExtractor;

impl MetadataExtractor for NativeExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<RawMetadata>> {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let mut reader = BufReader::new(file);

        let mut meta = RawMetadata::new();
        meta.insert(
            "SourceFile".to_string(),
            JsonValue::String(path.to_string_lossy().into_owned()),
        );
        meta.insert(
            keys::MIME_TYPE.to_string(),
            JsonValue::String(guess_mime_type(path).to_string()),
        );

        match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => fill_from_exif(&exif, &mut meta),
            Err(exif::Error::Io(e)) => {
                return Err(e).with_context(|| format!("read {}", path.display()));
            }
            // No EXIF block or not a container we understand: file-level fields only.
            Err(e) => log::debug!("no exif in {}: {}", path.display(), e),
        }
        Ok(vec![meta])
    }
}

fn fill_from_exif(exif: &Exif, meta: &mut RawMetadata) {
    let mut put = |key: &str, v: Option<JsonValue>| {
        if let Some(v) = v {
            meta.insert(key.to_string(), v);
        }
    };

    put(keys::APERTURE, aperture(exif).and_then(float));
    put(keys::SHUTTER, shutter_speed(exif).map(JsonValue::String));
    put(keys::ISO, uint(exif, Tag::PhotographicSensitivity).map(JsonValue::from));
    put(keys::CAMERA, ascii(exif, Tag::Model).map(JsonValue::String));
    put(keys::LENS, ascii(exif, Tag::LensModel).map(JsonValue::String));
    put(
        keys::WIDTH,
        uint(exif, Tag::PixelXDimension)
            .or_else(|| uint(exif, Tag::ImageWidth))
            .map(JsonValue::from),
    );
    put(
        keys::HEIGHT,
        uint(exif, Tag::PixelYDimension)
            .or_else(|| uint(exif, Tag::ImageLength))
            .map(JsonValue::from),
    );
    put(
        keys::CAPTURE_DATE,
        ascii(exif, Tag::DateTimeDigitized)
            .or_else(|| ascii(exif, Tag::DateTimeOriginal))
            .map(JsonValue::String),
    );
    put(keys::GPS, gps_position(exif).map(JsonValue::String));
}

fn float(v: f64) -> Option<JsonValue> {
    serde_json::Number::from_f64(v).map(JsonValue::Number)
}

fn ascii(exif: &Exif, tag: Tag) -> Option<String> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(parts) => parts
            .first()
            .map(|b| {
                String::from_utf8_lossy(b)
                    .trim_end_matches('\0')
                    .trim()
                    .to_string()
            })
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn uint(exif: &Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)?.value.get_uint(0)
}

fn rationals(exif: &Exif, tag: Tag) -> Option<Vec<f64>> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(rs) if rs.iter().all(|r| r.denom != 0) => {
            Some(rs.iter().map(|r| r.to_f64()).collect())
        }
        _ => None,
    }
}

fn aperture(exif: &Exif) -> Option<f64> {
    let f = rationals(exif, Tag::FNumber)?.first().copied()?;
    Some((f * 10.0).round() / 10.0)
}

/// exiftool's layout: `1/250` below a quarter second, else seconds with one decimal.
fn shutter_speed(exif: &Exif) -> Option<String> {
    let secs = rationals(exif, Tag::ExposureTime)?.first().copied()?;
    if secs <= 0.0 {
        return None;
    }
    if secs < 0.25001 {
        Some(format!("1/{}", (0.5 + 1.0 / secs) as u64))
    } else {
        let s = format!("{secs:.1}");
        Some(s.strip_suffix(".0").map(str::to_string).unwrap_or(s))
    }
}

/// Render an absolute decimal angle as `D deg M' S.SS"`.
pub fn dms_string(decimal: f64) -> String {
    let decimal = decimal.abs();
    let deg = decimal.trunc();
    let min_full = (decimal - deg) * 60.0;
    let min = min_full.trunc();
    let sec = (min_full - min) * 60.0;
    format!("{} deg {}' {:.2}\"", deg as u64, min as u64, sec)
}

fn gps_axis(exif: &Exif, value: Tag, reference: Tag) -> Option<String> {
    let parts = rationals(exif, value)?;
    let decimal = match parts.as_slice() {
        [d, m, s, ..] => d + m / 60.0 + s / 3600.0,
        [d, m] => d + m / 60.0,
        [d] => *d,
        [] => return None,
    };
    let hemisphere = ascii(exif, reference)?;
    Some(format!("{} {}", dms_string(decimal), hemisphere))
}

fn gps_position(exif: &Exif) -> Option<String> {
    let lat = gps_axis(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
    let long = gps_axis(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;
    Some(format!("{lat}, {long}"))
}
