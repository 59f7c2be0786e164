//! Plant catalog data model types, payload normalization, and source-file loading.
//!
//! This crate defines the persistent data model for the plant catalog without
//! any database dependencies. Consumers can use these types directly for
//! serialization, display, or passing to `verdant-db` for persistence.

pub mod payload;
pub mod source;
pub mod types;

pub use payload::{ListField, PayloadError, PlantPayload, Scalar, category_slug};
pub use source::{SourceDocument, SourceError, collect_sources, decode_entry, load_source};
pub use types::*;
