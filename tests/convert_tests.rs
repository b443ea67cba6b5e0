//! Field decoding, GPS/date conversion, and record conversion.

use chrono::{Local, NaiveDate, TimeZone};
use photodex::metadata::date::{capture_date_to_epoch_ms, format_capture_date};
use photodex::metadata::decode::{get_f64, get_i64, get_string, get_strings};
use photodex::metadata::exiftool::{ExiftoolExtractor, parse_exiftool_json};
use photodex::metadata::gps::{convert_gps_coordinates, deg_min_sec_to_decimal, format_gps};
use photodex::metadata::native::dms_string;
use photodex::metadata::{
    ConvertError, MetadataExtractor, NativeExtractor, RawMetadata, guess_mime_type,
    model_from_records, parent_folder,
};
use photodex::{DateZone, FileInfo};
use serde_json::json;
use std::path::Path;

const PARIS: &str = "48 deg 51' 29.00\" N, 2 deg 17' 40.00\" E";

fn raw(v: serde_json::Value) -> RawMetadata {
    v.as_object().cloned().unwrap()
}

fn info(name: &str, size: u64) -> FileInfo {
    FileInfo {
        name: name.to_string(),
        size,
    }
}

// --- field decoder ---

#[test]
fn test_get_f64_number_and_string() {
    let m = raw(json!({"Aperture": 2.8, "Other": "5.6", "Bad": "f/2"}));
    assert_eq!(get_f64(&m, "Aperture"), Some(2.8));
    assert_eq!(get_f64(&m, "Other"), Some(5.6));
    assert_eq!(get_f64(&m, "Bad"), None);
    assert_eq!(get_f64(&m, "Missing"), None);
}

#[test]
fn test_get_i64_coercions() {
    let m = raw(json!({"ISO": 200, "ImageWidth": 6000.0, "ImageHeight": "4000", "F": "12.7", "B": true}));
    assert_eq!(get_i64(&m, "ISO"), Some(200));
    assert_eq!(get_i64(&m, "ImageWidth"), Some(6000));
    assert_eq!(get_i64(&m, "ImageHeight"), Some(4000));
    assert_eq!(get_i64(&m, "F"), Some(12));
    assert_eq!(get_i64(&m, "B"), None);
}

#[test]
fn test_get_string_renders_numbers() {
    let m = raw(json!({"ShutterSpeed": "1/250", "Num": 0.004, "Arr": ["a"]}));
    assert_eq!(get_string(&m, "ShutterSpeed").as_deref(), Some("1/250"));
    assert_eq!(get_string(&m, "Num").as_deref(), Some("0.004"));
    assert_eq!(get_string(&m, "Arr"), None);
}

#[test]
fn test_get_strings_list_and_scalar() {
    let m = raw(json!({"Keywords": ["paris", 2021, null], "One": "sunset", "Obj": {"a": 1}}));
    assert_eq!(
        get_strings(&m, "Keywords"),
        Some(vec!["paris".to_string(), "2021".to_string()])
    );
    assert_eq!(get_strings(&m, "One"), Some(vec!["sunset".to_string()]));
    assert_eq!(get_strings(&m, "Obj"), None);
    assert_eq!(get_strings(&m, "Missing"), None);
}

// --- GPS ---

#[test]
fn test_gps_paris() {
    let (lat, long) = convert_gps_coordinates(PARIS).unwrap();
    assert!((lat - 48.858).abs() < 0.001, "lat {lat}");
    assert!((long - 2.294).abs() < 0.001, "long {long}");
    let s = format_gps(PARIS).unwrap();
    let parts: Vec<f32> = s.split(',').map(|p| p.parse().unwrap()).collect();
    assert_eq!(parts, vec![lat, long]);
}

#[test]
fn test_gps_south_west_negative() {
    let (lat, long) =
        convert_gps_coordinates("33 deg 52' 4.00\" S, 70 deg 30' 0.00\" W").unwrap();
    let expected_lat = -(33.0 + 52.0 / 60.0 + 4.0 / 3600.0) as f32;
    assert!((lat - expected_lat).abs() < 1e-5);
    assert!((long + 70.5).abs() < 1e-5);
}

#[test]
fn test_gps_wrong_token_count() {
    let err = convert_gps_coordinates("48 deg 51' 29.00\" N").unwrap_err();
    assert!(matches!(err, ConvertError::GpsTokenCount { count: 5, .. }));
    assert!(convert_gps_coordinates("").is_err());
}

#[test]
fn test_gps_unknown_hemisphere() {
    let err = convert_gps_coordinates("48 deg 51' 29.00\" X, 2 deg 17' 40.00\" E").unwrap_err();
    match err {
        ConvertError::GpsAxis { axis, source, .. } => {
            assert_eq!(axis, "latitude");
            assert_eq!(*source, ConvertError::GpsHemisphere("X".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_gps_bad_number() {
    let err = convert_gps_coordinates("48 deg 51' xx\" N, 2 deg 17' 40.00\" E").unwrap_err();
    match err {
        ConvertError::GpsAxis { source, .. } => {
            assert!(matches!(*source, ConvertError::GpsNumber { part: "sec", .. }))
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_gps_parts_parsed_at_f32_precision() {
    let got = deg_min_sec_to_decimal("10", "20'", "12.3456789\"", "N").unwrap();
    let sec = f64::from("12.3456789".parse::<f32>().unwrap());
    let expected = (10.0 + 20.0 / 60.0 + sec / 3600.0) as f32;
    assert_eq!(got, expected);
}

#[test]
fn test_dms_string_round_trips_through_converter() {
    let lat = 48.0 + 51.0 / 60.0 + 29.0 / 3600.0;
    assert_eq!(dms_string(lat), "48 deg 51' 29.00\"");
    let position = format!("{} N, {} E", dms_string(lat), dms_string(2.5));
    let (la, lo) = convert_gps_coordinates(&position).unwrap();
    assert!((la as f64 - lat).abs() < 1e-4);
    assert!((lo - 2.5).abs() < 1e-4);
}

// --- date ---

#[test]
fn test_date_utc_exact() {
    assert_eq!(
        capture_date_to_epoch_ms("2021:03:15 10:30:00", DateZone::Utc).unwrap(),
        1_615_804_200_000
    );
    assert_eq!(
        format_capture_date("2021:03:15 10:30:00", DateZone::Utc).unwrap(),
        "1615804200000"
    );
}

#[test]
fn test_date_local_matches_chrono_local() {
    let naive = NaiveDate::from_ymd_opt(2021, 3, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();
    let expected = Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap()
        .timestamp()
        * 1000;
    assert_eq!(
        capture_date_to_epoch_ms("2021:03:15 10:30:00", DateZone::Local).unwrap(),
        expected
    );
}

#[test]
fn test_date_malformed() {
    for bad in ["2021-03-15 10:30:00", "2021:13:15 10:30:00", "0000:00:00 00:00:00", ""] {
        assert!(
            matches!(
                capture_date_to_epoch_ms(bad, DateZone::Utc),
                Err(ConvertError::Date { .. })
            ),
            "{bad:?} should fail"
        );
    }
}

// --- record converter ---

#[test]
fn test_model_from_full_record() {
    let m = raw(json!({
        "SourceFile": "/photos/paris/IMG_0001.jpg",
        "Aperture": 2.8,
        "ISO": 200,
        "ShutterSpeed": "1/250",
        "Model": "X-T3",
        "LensModel": "XF23mmF2 R WR",
        "MIMEType": "image/jpeg",
        "ImageHeight": 4000,
        "ImageWidth": 6000,
        "Keywords": ["paris", "tower"],
        "CreateDate": "2021:03:15 10:30:00",
        "GPSPosition": PARIS
    }));
    let path = Path::new("/photos/paris/IMG_0001.jpg");
    let model =
        model_from_records(path, &info("IMG_0001.jpg", 1234), &[m], "run-1", DateZone::Utc)
            .unwrap();
    assert_eq!(model.import_id, "run-1");
    assert_eq!(model.aperture, Some(2.8));
    assert_eq!(model.iso, Some(200));
    assert_eq!(model.shutter_speed.as_deref(), Some("1/250"));
    assert_eq!(model.camera_model.as_deref(), Some("X-T3"));
    assert_eq!(model.lens_model.as_deref(), Some("XF23mmF2 R WR"));
    assert_eq!(model.mime_type.as_deref(), Some("image/jpeg"));
    assert_eq!(model.height, Some(4000));
    assert_eq!(model.width, Some(6000));
    assert_eq!(
        model.keywords,
        Some(vec!["paris".to_string(), "tower".to_string()])
    );
    assert_eq!(model.file_size, 1234);
    assert_eq!(model.file_name, "IMG_0001.jpg");
    assert_eq!(model.folder.as_deref(), Some("paris"));
    assert_eq!(model.date.as_deref(), Some("1615804200000"));
    assert!(model.gps.as_deref().unwrap().starts_with("48.858"));
}

#[test]
fn test_model_absent_fields_are_not_errors() {
    let path = Path::new("/photos/a.png");
    let model =
        model_from_records(path, &info("a.png", 7), &[RawMetadata::new()], "run", DateZone::Utc)
            .unwrap();
    assert_eq!(model.file_name, "a.png");
    assert_eq!(model.file_size, 7);
    assert_eq!(model.aperture, None);
    assert_eq!(model.date, None);
    assert_eq!(model.gps, None);

    let json = serde_json::to_value(&model).unwrap();
    let obj = json.as_object().unwrap();
    assert!(!obj.contains_key("aperture"));
    assert!(!obj.contains_key("gps"));
    assert_eq!(obj["fileName"], "a.png");
    assert_eq!(obj["fileSize"], 7);
    assert_eq!(obj["importId"], "run");
}

#[test]
fn test_model_wrong_record_count() {
    let path = Path::new("/photos/a.jpg");
    let i = info("a.jpg", 1);
    assert_eq!(
        model_from_records(path, &i, &[], "r", DateZone::Utc).unwrap_err(),
        ConvertError::MetadataCount(0)
    );
    let two = vec![RawMetadata::new(), RawMetadata::new()];
    assert_eq!(
        model_from_records(path, &i, &two, "r", DateZone::Utc).unwrap_err(),
        ConvertError::MetadataCount(2)
    );
}

#[test]
fn test_model_malformed_gps_or_date_fails() {
    let path = Path::new("/photos/a.jpg");
    let i = info("a.jpg", 1);
    let bad_gps = raw(json!({"GPSPosition": "somewhere nice"}));
    assert!(matches!(
        model_from_records(path, &i, &[bad_gps], "r", DateZone::Utc),
        Err(ConvertError::GpsTokenCount { .. })
    ));
    let bad_date = raw(json!({"CreateDate": "yesterday"}));
    assert!(matches!(
        model_from_records(path, &i, &[bad_date], "r", DateZone::Utc),
        Err(ConvertError::Date { .. })
    ));
    let numeric_gps = raw(json!({"GPSPosition": 48.8}));
    assert_eq!(
        model_from_records(path, &i, &[numeric_gps], "r", DateZone::Utc).unwrap_err(),
        ConvertError::NotAString { key: "GPSPosition" }
    );
}

#[test]
fn test_parent_folder() {
    assert_eq!(parent_folder(Path::new("/photos/2021/a.jpg")).as_deref(), Some("2021"));
    assert_eq!(parent_folder(Path::new("2021/a.jpg")).as_deref(), Some("2021"));
    assert_eq!(parent_folder(Path::new("a.jpg")), None);
    assert_eq!(parent_folder(Path::new("/a.jpg")), None);
}

// --- extractors ---

#[test]
fn test_parse_exiftool_json() {
    let out = br#"[{"SourceFile":"a.jpg","Aperture":2.8,"Keywords":"one"}]"#;
    let records = parse_exiftool_json(out).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(get_f64(&records[0], "Aperture"), Some(2.8));
    assert!(parse_exiftool_json(b"  \n").unwrap().is_empty());
    assert!(parse_exiftool_json(b"not json").is_err());
}

#[test]
fn test_exiftool_missing_binary_fails() {
    assert!(ExiftoolExtractor::with_binary("/definitely/not/exiftool", 1).is_err());
}

#[test]
fn test_guess_mime_type() {
    assert_eq!(guess_mime_type(Path::new("a.JPG")), "image/jpeg");
    assert_eq!(guess_mime_type(Path::new("a.nef")), "image/x-nikon-nef");
    assert_eq!(guess_mime_type(Path::new("README")), "application/octet-stream");
}

#[test]
fn test_native_extractor_without_exif() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "no exif here")?;
    let records = NativeExtractor.extract(&path)?;
    assert_eq!(records.len(), 1);
    assert_eq!(get_string(&records[0], "MIMEType").as_deref(), Some("text/plain"));
    assert_eq!(get_string(&records[0], "GPSPosition"), None);
    Ok(())
}

#[test]
fn test_native_extractor_missing_file() {
    assert!(NativeExtractor
        .extract(Path::new("/definitely/not/here.jpg"))
        .is_err());
}
