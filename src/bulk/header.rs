use std::path::Path;

use crate::{BulkEntryHeader, BulkIndexTarget};

/// Stable document id for a path: blake3 hex of the path string.
pub fn document_id(path: &Path) -> String {
    blake3::hash(path.to_string_lossy().as_bytes())
        .to_hex()
        .to_string()
}

/// Header for the document built from `path`. Pure and total.
pub fn bulk_entry_header(path: &Path, index: &str) -> BulkEntryHeader {
    BulkEntryHeader {
        index: BulkIndexTarget {
            index: index.to_string(),
            id: document_id(path),
        },
    }
}
