//! Bulk-index framing: per-document headers and the push to the backend.

pub mod header;
pub mod push;

pub use header::{bulk_entry_header, document_id};
pub use push::{bulk_url, push, split_bulk_body};
