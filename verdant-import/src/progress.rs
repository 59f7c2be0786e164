//! Progress callbacks for [`crate::import_all`].

/// Receives updates while source files are imported.
///
/// A "file" is one JSON or YAML source document; a "record" is one plant
/// entry inside it, counted whether it was inserted, skipped as a known
/// name, or rejected as malformed.
pub trait ImportProgress {
    /// Called after record `current` of `total` in the current file, with the
    /// record's name (empty when the entry has none).
    fn on_record(&self, current: usize, total: usize, name: &str);

    /// Called once a file has loaded, before its first record, with a line
    /// naming the file and its record count. Unavailable files never get here.
    fn on_file(&self, message: &str);

    /// Called once with the run summary, after the duplicate-name audit.
    fn on_complete(&self, message: &str);
}

/// Discards all updates.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_record(&self, _current: usize, _total: usize, _name: &str) {}
    fn on_file(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// Logs file starts and the summary, plus every hundredth record.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_record(&self, current: usize, total: usize, name: &str) {
        if current.is_multiple_of(100) || current == total {
            log::info!("  [{}/{}] {}", current, total, name);
        }
    }

    fn on_file(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
