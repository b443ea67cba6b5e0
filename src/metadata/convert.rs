//! Raw metadata → [`Model`].

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use super::decode::{get_f64, get_i64, get_string, get_strings};
use super::error::ConvertError;
use super::keys;
use super::{MetadataExtractor, RawMetadata, date, gps};
use crate::{DateZone, FileInfo, Model};

/// Name of the directory directly containing `path`, when the path has one.
pub fn parent_folder(path: &Path) -> Option<String> {
    path.parent()?
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

fn required_str<'a>(meta: &'a RawMetadata, key: &'static str) -> Result<Option<&'a str>, ConvertError> {
    match meta.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or(ConvertError::NotAString { key }),
    }
}

/// Build the record for one file from the facility's output. Exactly one raw record is required.
pub fn model_from_records(
    path: &Path,
    info: &FileInfo,
    records: &[RawMetadata],
    import_id: &str,
    zone: DateZone,
) -> Result<Model, ConvertError> {
    let [meta] = records else {
        return Err(ConvertError::MetadataCount(records.len()));
    };

    let date = required_str(meta, keys::CAPTURE_DATE)?
        .map(|raw| date::format_capture_date(raw, zone))
        .transpose()?;
    let gps = required_str(meta, keys::GPS)?
        .map(gps::format_gps)
        .transpose()?;

    Ok(Model {
        import_id: import_id.to_string(),
        aperture: get_f64(meta, keys::APERTURE),
        iso: get_i64(meta, keys::ISO),
        shutter_speed: get_string(meta, keys::SHUTTER),
        camera_model: get_string(meta, keys::CAMERA),
        lens_model: get_string(meta, keys::LENS),
        mime_type: get_string(meta, keys::MIME_TYPE),
        height: get_i64(meta, keys::HEIGHT),
        width: get_i64(meta, keys::WIDTH),
        keywords: get_strings(meta, keys::KEYWORDS),
        file_size: info.size,
        file_name: info.name.clone(),
        folder: parent_folder(path),
        date,
        gps,
    })
}

/// Calls the metadata facility for a file and converts the result. Shared by reference across workers.
pub struct RecordConverter<'a> {
    extractor: &'a dyn MetadataExtractor,
    import_id: &'a str,
    zone: DateZone,
}

impl<'a> RecordConverter<'a> {
    pub fn new(extractor: &'a dyn MetadataExtractor, import_id: &'a str, zone: DateZone) -> Self {
        Self {
            extractor,
            import_id,
            zone,
        }
    }

    pub fn convert(&self, path: &Path, info: &FileInfo) -> Result<Model> {
        info!("Converting {}", path.display());
        let records = self
            .extractor
            .extract(path)
            .context("metadata extraction")?;
        Ok(model_from_records(path, info, &records, self.import_id, self.zone)?)
    }
}
