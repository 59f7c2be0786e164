//! Import curated plant source files into the catalog database.
//!
//! This crate owns the batch ETL: loading source files, normalizing payloads,
//! deduplicating by name, flagging latin-name collisions, and reporting.

pub mod importer;
pub mod progress;

pub use importer::{
    FileOutcome, FileReport, ImportError, ImportOptions, ImportReport, LatinNameWarning,
    RecordError, RecordIssue, import_all,
};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
