use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use verdant_import::{FileOutcome, ImportOptions, ImportProgress, ImportReport, import_all};

use super::Context;
use crate::CliError;

/// Import plant source files into the catalog database.
pub(crate) fn run_import(ctx: &Context, files: Vec<PathBuf>, dry_run: bool) -> Result<(), CliError> {
    let requested = if files.is_empty() {
        ctx.settings.import.sources.clone()
    } else {
        files
    };
    if requested.is_empty() {
        return Err(CliError::invalid_input(
            "no source files given and no import.sources in settings.toml",
        ));
    }

    let sources = verdant_catalog::collect_sources(&requested)
        .map_err(|e| CliError::import(e.to_string()))?;
    if sources.is_empty() {
        log::warn!("No .json or .yaml files found.");
        return Ok(());
    }

    let conn = ctx.open_catalog()?;

    log::info!(
        "{}",
        format!(
            "{} {} source file(s) into {}",
            if dry_run { "Dry run:" } else { "Importing" },
            sources.len(),
            ctx.db_path.display()
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );

    let progress = CliImportProgress::new(ctx.quiet);
    let options = ImportOptions {
        dry_run,
        ..Default::default()
    };
    let report = import_all(&conn, &sources, &options, Some(&progress))
        .map_err(|e| CliError::import(e.to_string()))?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &ImportReport) {
    for file in &report.per_file {
        let source = file.source_name();
        match &file.outcome {
            FileOutcome::Unavailable(reason) => {
                log::info!(
                    "  {} {}: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    source.if_supports_color(Stdout, |t| t.bold()),
                    reason,
                );
            }
            FileOutcome::Imported => {
                log::info!(
                    "  {} {}: {} inserted, {} skipped, {} errors",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    source.if_supports_color(Stdout, |t| t.bold()),
                    file.inserted,
                    file.skipped,
                    file.errors,
                );
            }
        }
    }

    crate::log_blank();
    let title = if report.dry_run {
        "Dry run complete (nothing written)"
    } else if report.cancelled {
        "Import cancelled"
    } else {
        "Import complete"
    };
    log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Inserted: {:>8}", report.inserted_total);
    log::info!("  Skipped:  {:>8}", report.skipped_total);
    log::info!("  Errors:   {:>8}", report.errors_total);
    log::info!("  Warnings: {:>8}", report.warnings_total());

    let unavailable = report.unavailable_files().count();
    if unavailable > 0 {
        log::warn!("  Unavailable files: {}", unavailable);
    }

    if !report.duplicate_names_audit.is_empty() {
        log::info!(
            "  Names shared across records: {} (see 'verdant audit')",
            report.duplicate_names_audit.len()
        );
    }
}

/// Progress bar for batch imports.
struct CliImportProgress {
    bar: ProgressBar,
}

impl CliImportProgress {
    fn new(quiet: bool) -> Self {
        let bar = ProgressBar::new(0);
        if quiet {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) =
            ProgressStyle::with_template("  {bar:30.green/dim} {pos:>5}/{len:5} {wide_msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }
}

impl ImportProgress for CliImportProgress {
    fn on_record(&self, current: usize, total: usize, name: &str) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
        self.bar.set_message(name.to_string());
    }

    fn on_file(&self, message: &str) {
        self.bar.reset();
        self.bar.suspend(|| log::info!("{}", message));
    }

    fn on_complete(&self, message: &str) {
        self.bar.finish_and_clear();
        log::debug!("{}", message);
    }
}
