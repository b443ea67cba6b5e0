//! DMS position string to signed decimal degrees.
//!
//! Expected layout (whitespace-separated, ten tokens):
//! `48 deg 51' 29.00" N, 2 deg 17' 40.00" E`

use super::error::ConvertError;

const TOKEN_COUNT: usize = 10;

/// Parsed at f32 precision, then widened for the arithmetic.
fn parse_part(part: &'static str, raw: &str, mark: char) -> Result<f64, ConvertError> {
    raw.trim_end_matches(mark)
        .parse::<f32>()
        .map(f64::from)
        .map_err(|_| ConvertError::GpsNumber {
            part,
            value: raw.to_string(),
        })
}

/// Degrees, minutes, seconds and hemisphere letter to a signed decimal. `S` and `W` are negative.
pub fn deg_min_sec_to_decimal(
    deg: &str,
    min: &str,
    sec: &str,
    letter: &str,
) -> Result<f32, ConvertError> {
    let deg = parse_part("deg", deg, '°')?;
    let min = parse_part("min", min, '\'')?;
    let sec = parse_part("sec", sec, '"')?;
    let mult = match letter.trim_end_matches(',') {
        "N" | "E" => 1.0,
        "S" | "W" => -1.0,
        other => return Err(ConvertError::GpsHemisphere(other.to_string())),
    };
    Ok(((deg + min / 60.0 + sec / 3600.0) * mult) as f32)
}

/// Split a position string into `(latitude, longitude)`.
pub fn convert_gps_coordinates(lat_long: &str) -> Result<(f32, f32), ConvertError> {
    let sub: Vec<&str> = lat_long.split_whitespace().collect();
    if sub.len() != TOKEN_COUNT {
        return Err(ConvertError::GpsTokenCount {
            input: lat_long.to_string(),
            count: sub.len(),
        });
    }
    let axis_err = |axis: &'static str| {
        move |e: ConvertError| ConvertError::GpsAxis {
            axis,
            input: lat_long.to_string(),
            source: Box::new(e),
        }
    };
    let lat = deg_min_sec_to_decimal(sub[0], sub[2], sub[3], sub[4]).map_err(axis_err("latitude"))?;
    let long =
        deg_min_sec_to_decimal(sub[5], sub[7], sub[8], sub[9]).map_err(axis_err("longitude"))?;
    Ok((lat, long))
}

/// Position string to the `"lat,long"` form stored in the record.
pub fn format_gps(lat_long: &str) -> Result<String, ConvertError> {
    let (lat, long) = convert_gps_coordinates(lat_long)?;
    Ok(format!("{lat},{long}"))
}
