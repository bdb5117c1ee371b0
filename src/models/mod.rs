pub mod document;

pub use document::{Document, DocumentId, ID_FIELD, INDEXED_FIELD_META};
