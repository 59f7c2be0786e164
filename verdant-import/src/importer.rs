//! Batch import of curated source files into the catalog database.
//!
//! Each file is processed record by record against a snapshot of the names
//! already live in the store, taken when the file starts and grown as records
//! are accepted. Re-running an import therefore inserts nothing new, and two
//! spellings of one name inside a file collapse to the first.
//!
//! Nothing here aborts a batch: unreadable files and bad records are counted,
//! logged, and skipped.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rusqlite::Connection;
use thiserror::Error;
use verdant_catalog::types::*;
use verdant_catalog::{PayloadError, decode_entry, load_source, source};
use verdant_db::operations::{self, OperationError};
use verdant_db::queries::{self, DuplicateNameGroup};

use crate::progress::ImportProgress;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Why a single record was not imported.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed entry: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Payload(#[from] PayloadError),
    #[error("store write failed: {0}")]
    Store(#[from] OperationError),
}

/// Options for [`import_all`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportOptions<'a> {
    /// Run the whole import inside a transaction that is rolled back.
    pub dry_run: bool,
    /// Checked between records; when set the run stops after the current record.
    pub cancel: Option<&'a AtomicBool>,
}

impl ImportOptions<'_> {
    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|c| c.load(Ordering::Relaxed))
    }
}

/// What happened to a source file as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Imported,
    /// Missing, unreadable, or not a valid document. The file was skipped.
    Unavailable(String),
}

/// A latin name already claimed by a differently named record.
///
/// Informational: the record was still inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatinNameWarning {
    pub name: String,
    pub latin_name: String,
    pub existing_name: String,
}

/// A record that failed to import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    /// Zero-based position of the entry in its file.
    pub index: usize,
    pub name: Option<String>,
    pub message: String,
}

/// Counts for one source file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub source: PathBuf,
    pub outcome: FileOutcome,
    pub inserted: u64,
    pub skipped: u64,
    pub errors: u64,
    pub warnings: Vec<LatinNameWarning>,
    pub issues: Vec<RecordIssue>,
}

impl FileReport {
    fn new(source: &Path, outcome: FileOutcome) -> Self {
        Self {
            source: source.to_path_buf(),
            outcome,
            inserted: 0,
            skipped: 0,
            errors: 0,
            warnings: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn source_name(&self) -> String {
        source::source_name(&self.source)
    }
}

/// Summary of an [`import_all`] run.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub inserted_total: u64,
    pub skipped_total: u64,
    pub errors_total: u64,
    pub per_file: Vec<FileReport>,
    /// Names held by more than one record anywhere in the store, after the run.
    pub duplicate_names_audit: Vec<DuplicateNameGroup>,
    /// The run was stopped through [`ImportOptions::cancel`].
    pub cancelled: bool,
    pub dry_run: bool,
}

impl ImportReport {
    pub fn warnings_total(&self) -> usize {
        self.per_file.iter().map(|f| f.warnings.len()).sum()
    }

    pub fn unavailable_files(&self) -> impl Iterator<Item = &FileReport> {
        self.per_file
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Unavailable(_)))
    }
}

enum EntryOutcome {
    Inserted(Option<LatinNameWarning>),
    Skipped,
}

/// Import every source file, in order, as approved system records.
///
/// Only failures outside any single record (opening the dry-run transaction,
/// the final audit) are returned as errors.
pub fn import_all(
    conn: &Connection,
    files: &[PathBuf],
    options: &ImportOptions<'_>,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportReport, ImportError> {
    let dry_run_tx = if options.dry_run {
        Some(conn.unchecked_transaction()?)
    } else {
        None
    };

    let mut report = ImportReport {
        dry_run: options.dry_run,
        ..Default::default()
    };

    for path in files {
        if options.is_cancelled() {
            report.cancelled = true;
            break;
        }

        let file = import_file(conn, path, options, progress, &mut report.cancelled);

        report.inserted_total += file.inserted;
        report.skipped_total += file.skipped;
        report.errors_total += file.errors;

        if !options.dry_run && file.outcome == FileOutcome::Imported {
            log_import(conn, &file);
        }
        report.per_file.push(file);

        if report.cancelled {
            break;
        }
    }

    report.duplicate_names_audit = queries::duplicate_name_audit(conn)?;

    if let Some(tx) = dry_run_tx {
        tx.rollback()?;
    }

    let summary = format!(
        "Import {}: {} inserted, {} skipped, {} errors across {} file(s)",
        if report.cancelled { "cancelled" } else { "complete" },
        report.inserted_total,
        report.skipped_total,
        report.errors_total,
        report.per_file.len(),
    );
    match progress {
        Some(p) => p.on_complete(&summary),
        None => log::info!("{}", summary),
    }

    Ok(report)
}

/// Import one file. Never fails: problems are recorded in the report.
fn import_file(
    conn: &Connection,
    path: &Path,
    options: &ImportOptions<'_>,
    progress: Option<&dyn ImportProgress>,
    cancelled: &mut bool,
) -> FileReport {
    let doc = match load_source(path) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("Skipping source {}: {}", path.display(), e);
            return FileReport::new(path, FileOutcome::Unavailable(e.to_string()));
        }
    };

    let mut report = FileReport::new(path, FileOutcome::Imported);

    let mut seen = match operations::active_name_keys(conn) {
        Ok(keys) => keys,
        Err(e) => {
            log::warn!("Skipping source {}: cannot read existing names: {}", path.display(), e);
            report.outcome = FileOutcome::Unavailable(e.to_string());
            return report;
        }
    };

    if let Some(p) = progress {
        p.on_file(&format!(
            "Importing {} ({} records)",
            doc.source_name(),
            doc.entries.len()
        ));
    }

    let total = doc.entries.len();
    for (index, entry) in doc.entries.iter().enumerate() {
        if options.is_cancelled() {
            log::warn!(
                "Import cancelled in {} after {} of {} records",
                doc.source_name(),
                index,
                total
            );
            *cancelled = true;
            break;
        }

        let label = entry_label(entry);
        match import_entry(conn, entry, &mut seen) {
            Ok(EntryOutcome::Inserted(warning)) => {
                report.inserted += 1;
                if let Some(w) = warning {
                    log::warn!(
                        "Possible synonym: '{}' shares latin name '{}' with '{}'",
                        w.name,
                        w.latin_name,
                        w.existing_name
                    );
                    report.warnings.push(w);
                }
            }
            Ok(EntryOutcome::Skipped) => {
                log::debug!("Skipping existing plant '{}'", label.as_deref().unwrap_or("?"));
                report.skipped += 1;
            }
            Err(e) => {
                log::warn!(
                    "{} record #{} ({}): {}",
                    doc.source_name(),
                    index + 1,
                    label.as_deref().unwrap_or("unnamed"),
                    e
                );
                report.errors += 1;
                report.issues.push(RecordIssue {
                    index,
                    name: label.clone(),
                    message: e.to_string(),
                });
            }
        }

        if let Some(p) = progress {
            p.on_record(index + 1, total, label.as_deref().unwrap_or(""));
        }
    }

    log::debug!(
        "{}: {} inserted, {} skipped, {} errors, {} warnings",
        doc.source_name(),
        report.inserted,
        report.skipped,
        report.errors,
        report.warnings.len(),
    );

    report
}

/// Import a single entry against the running set of live name keys.
fn import_entry(
    conn: &Connection,
    entry: &serde_json::Value,
    seen: &mut HashSet<String>,
) -> Result<EntryOutcome, RecordError> {
    let plant = decode_entry(entry)?.normalize()?;
    let key = plant.name_key();

    if seen.contains(&key) {
        return Ok(EntryOutcome::Skipped);
    }

    let warning = latin_name_warning(conn, &plant)?;

    match operations::insert_plant(conn, &plant, &RecordOrigin::System) {
        Ok(_) => {
            seen.insert(key);
            Ok(EntryOutcome::Inserted(warning))
        }
        // Another writer took the name after the snapshot.
        Err(OperationError::DuplicateName { .. }) => {
            seen.insert(key);
            Ok(EntryOutcome::Skipped)
        }
        Err(e) => Err(e.into()),
    }
}

fn latin_name_warning(
    conn: &Connection,
    plant: &NewPlant,
) -> Result<Option<LatinNameWarning>, OperationError> {
    let Some(latin) = plant.latin_name.as_deref() else {
        return Ok(None);
    };

    let key = plant.name_key();
    let holders = operations::find_by_normalized_latin_name(conn, latin)?;
    Ok(holders
        .into_iter()
        .find(|holder| holder.name_key() != key)
        .map(|holder| LatinNameWarning {
            name: plant.name.clone(),
            latin_name: latin.to_string(),
            existing_name: holder.name,
        }))
}

/// Best-effort name of a raw entry, for messages.
fn entry_label(entry: &serde_json::Value) -> Option<String> {
    entry
        .get("name")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Record a processed file in the import_log table.
fn log_import(conn: &Connection, file: &FileReport) {
    let entry = ImportLog {
        id: 0,
        source_name: file.source_name(),
        imported_at: chrono::Utc::now().to_rfc3339(),
        records_inserted: file.inserted as i64,
        records_skipped: file.skipped as i64,
        records_errored: file.errors as i64,
        warnings: file.warnings.len() as i64,
    };
    if let Err(e) = operations::insert_import_log(conn, &entry) {
        log::warn!("Failed to record import log for {}: {}", entry.source_name, e);
    }
}
