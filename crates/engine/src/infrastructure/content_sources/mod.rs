//! Content sources for the read-only ability and class catalog.

mod catalog;

pub use catalog::{ContentCatalog, ContentError};
