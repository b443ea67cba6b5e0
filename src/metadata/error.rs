use thiserror::Error;

/// Per-file conversion failures. Absent tags are never errors; malformed ones are.
#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("wrong metadata count ({0})")]
    MetadataCount(usize),

    #[error("parsing inconsistency ({input}): {count} elements parsed")]
    GpsTokenCount { input: String, count: usize },

    #[error("error while parsing {part} {value:?} as float")]
    GpsNumber { part: &'static str, value: String },

    #[error("unsupported hemisphere letter ({0})")]
    GpsHemisphere(String),

    #[error("error while converting {axis} ({input}): {source}")]
    GpsAxis {
        axis: &'static str,
        input: String,
        #[source]
        source: Box<ConvertError>,
    },

    #[error("error while parsing date ({input}): {reason}")]
    Date { input: String, reason: String },

    #[error("tag {key} is not a string")]
    NotAString { key: &'static str },
}
