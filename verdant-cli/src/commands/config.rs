use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::{Settings, default_db_path, settings_path};

/// Show the settings file location and the effective values.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "Verdant Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let settings = Settings::load_from(&path)?;
    let db = match &settings.catalog.db_path {
        Some(p) => format!("{} (settings)", p.display()),
        None => format!("{} (default)", default_db_path().display()),
    };
    log::info!("  Database:       {}", db);

    if settings.import.sources.is_empty() {
        log::info!("  Import sources: {}", "(none)".if_supports_color(Stdout, |t| t.dimmed()));
    } else {
        log::info!("  Import sources:");
        for source in &settings.import.sources {
            log::info!("    {}", source.display());
        }
    }

    if settings.moderation.admins.is_empty() {
        log::info!("  Admins:         {}", "(none)".if_supports_color(Stdout, |t| t.dimmed()));
    } else {
        log::info!("  Admins:         {}", settings.moderation.admins.join(", "));
    }

    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings_path().display());
    Ok(())
}

/// Write a default settings file.
pub(crate) fn run_config_init(force: bool) -> Result<(), CliError> {
    let path = settings_path();
    if path.exists() && !force {
        log::warn!("Settings file already exists at {}", path.display());
        log::info!("Re-run with --force to overwrite it.");
        return Ok(());
    }

    let settings = Settings {
        catalog: crate::settings::CatalogSettings {
            db_path: Some(default_db_path()),
        },
        ..Default::default()
    };
    settings.save_to(&path)?;

    log::info!(
        "{} Wrote {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    log::info!("Add user ids to [moderation] admins to allow moderation.");
    Ok(())
}
