//! Photo metadata: the extraction facility seam, field decoding, and record conversion.

pub mod convert;
pub mod date;
pub mod decode;
pub mod error;
pub mod exiftool;
pub mod gps;
pub mod native;

use anyhow::Result;
use std::path::Path;

pub use convert::{RecordConverter, model_from_records, parent_folder};
pub use error::ConvertError;
pub use exiftool::ExiftoolExtractor;
pub use native::NativeExtractor;

use crate::{ExtractorKind, Opts};

/// One raw record: tag name → loosely-typed value (number, string, or array).
pub type RawMetadata = serde_json::Map<String, serde_json::Value>;

/// Tag names consumed from the raw record (exiftool naming).
pub mod keys {
    pub const APERTURE: &str = "Aperture";
    pub const SHUTTER: &str = "ShutterSpeed";
    pub const KEYWORDS: &str = "Keywords";
    pub const CAMERA: &str = "Model";
    pub const LENS: &str = "LensModel";
    pub const MIME_TYPE: &str = "MIMEType";
    pub const HEIGHT: &str = "ImageHeight";
    pub const WIDTH: &str = "ImageWidth";
    pub const CAPTURE_DATE: &str = "CreateDate";
    pub const GPS: &str = "GPSPosition";
    pub const ISO: &str = "ISO";
}

/// Reads raw metadata records for one file. Must be safe to call from many workers at once.
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Vec<RawMetadata>>;
}

/// Build the extractor selected in `opts`.
pub fn extractor_for(opts: &Opts) -> Result<Box<dyn MetadataExtractor>> {
    Ok(match opts.extractor {
        ExtractorKind::Exiftool => Box::new(ExiftoolExtractor::new(opts.extraction_thread_count())?),
        ExtractorKind::Native => Box::new(NativeExtractor),
    })
}

/// MIME type from the file extension (used when the file carries no usable metadata block).
pub fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "png" => "image/png",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "heic" | "heif" => "image/heic",
        "avif" => "image/avif",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "nef" => "image/x-nikon-nef",
        "cr2" => "image/x-canon-cr2",
        "cr3" => "image/x-canon-cr3",
        "arw" => "image/x-sony-arw",
        "dng" => "image/x-adobe-dng",
        "orf" => "image/x-olympus-orf",
        "raf" => "image/x-fujifilm-raf",
        "rw2" => "image/x-panasonic-rw2",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "txt" => "text/plain",
        "json" => "application/json",
        "xmp" => "application/rdf+xml",
        _ => "application/octet-stream",
    }
}
