use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use verdant_catalog::PlantId;
use verdant_moderation::AdminSession;

use super::Context;
use crate::CliError;

/// Report name keys held by several records and latin names shared by
/// differently named plants.
pub(crate) fn run_audit(ctx: &Context) -> Result<(), CliError> {
    let conn = ctx.open_catalog()?;
    let duplicates = verdant_db::duplicate_name_audit(&conn)
        .map_err(|e| CliError::database(format!("Duplicate audit failed: {}", e)))?;
    let collisions = verdant_db::latin_name_collisions(&conn)
        .map_err(|e| CliError::database(format!("Latin name audit failed: {}", e)))?;

    log::info!(
        "{}",
        format!("Duplicate names ({})", duplicates.len()).if_supports_color(Stdout, |t| t.bold()),
    );
    for group in &duplicates {
        let members: Vec<String> = group
            .members
            .iter()
            .map(|m| format!("#{} {} [{}]", m.id, m.name, m.status))
            .collect();
        log::info!("  {}: {}", group.name_key, members.join(", "));
    }

    crate::log_blank();
    log::info!(
        "{}",
        format!("Shared latin names ({})", collisions.len()).if_supports_color(Stdout, |t| t.bold()),
    );
    for collision in &collisions {
        log::info!(
            "  {}: {}",
            collision.latin_key.if_supports_color(Stdout, |t| t.italic()),
            collision.names.join(", "),
        );
    }

    Ok(())
}

pub(crate) fn run_history(
    ctx: &Context,
    plant: Option<PlantId>,
    limit: u32,
) -> Result<(), CliError> {
    let actor = ctx.actor()?;
    let conn = ctx.open_catalog()?;
    let entries = AdminSession::begin(&conn, &actor)?.history(plant, Some(limit))?;

    if entries.is_empty() {
        log::info!("No moderation actions recorded.");
        return Ok(());
    }

    for entry in &entries {
        log::info!(
            "  {}  {:<8} #{} {} by {}{}",
            entry.acted_at.if_supports_color(Stdout, |t| t.dimmed()),
            entry.action.as_str(),
            entry.plant_id,
            entry.plant_name.if_supports_color(Stdout, |t| t.bold()),
            entry.actor,
            entry
                .reason
                .as_deref()
                .map(|r| format!(": {r}"))
                .unwrap_or_default(),
        );
    }
    Ok(())
}

pub(crate) fn run_imports(ctx: &Context, limit: u32) -> Result<(), CliError> {
    let conn = ctx.open_catalog()?;
    let logs = verdant_db::list_import_logs(&conn, Some(limit))
        .map_err(|e| CliError::database(format!("Failed to read import log: {}", e)))?;

    if logs.is_empty() {
        log::info!("No imports recorded.");
        return Ok(());
    }

    for log_entry in &logs {
        log::info!(
            "  {}  {:<24} {} inserted, {} skipped, {} errors, {} warnings",
            log_entry.imported_at.if_supports_color(Stdout, |t| t.dimmed()),
            log_entry.source_name,
            log_entry.records_inserted,
            log_entry.records_skipped,
            log_entry.records_errored,
            log_entry.warnings,
        );
    }
    Ok(())
}
