use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use verdant_catalog::PlantId;
use verdant_moderation::AdminSession;

use super::Context;
use crate::CliError;

pub(crate) fn run_approve(ctx: &Context, id: PlantId) -> Result<(), CliError> {
    let actor = ctx.actor()?;
    let conn = ctx.open_catalog()?;
    let session = AdminSession::begin(&conn, &actor)?;

    let record = session.approve(id)?;
    log::info!(
        "{} Approved '{}' (id {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        record.name.if_supports_color(Stdout, |t| t.bold()),
        record.id,
    );
    Ok(())
}

pub(crate) fn run_reject(ctx: &Context, id: PlantId, reason: &str) -> Result<(), CliError> {
    let actor = ctx.actor()?;
    let conn = ctx.open_catalog()?;
    let session = AdminSession::begin(&conn, &actor)?;

    let record = session.reject(id, reason)?;
    log::info!(
        "{} Rejected '{}' (id {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        record.name.if_supports_color(Stdout, |t| t.bold()),
        record.id,
    );
    if let Some(reason) = &record.rejection_reason {
        log::info!("  Reason: {}", reason);
    }
    Ok(())
}

/// Delete a record. Without `--confirm` only describes what would go.
pub(crate) fn run_delete(ctx: &Context, id: PlantId, confirm: bool) -> Result<(), CliError> {
    let actor = ctx.actor()?;
    let conn = ctx.open_catalog()?;
    let session = AdminSession::begin(&conn, &actor)?;

    if !confirm {
        let record = verdant_db::find_plant(&conn, id)
            .map_err(|e| CliError::database(e.to_string()))?
            .ok_or_else(|| CliError::invalid_input(format!("Plant not found: id {}", id)))?;
        log::warn!(
            "This will permanently delete '{}' (id {}, {}).",
            record.name,
            record.id,
            record.status,
        );
        log::info!("Re-run with --confirm to proceed:");
        log::info!("  verdant delete {} --confirm", id);
        return Ok(());
    }

    let record = session.delete(id)?;
    log::info!(
        "{} Deleted '{}' (id {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        record.name.if_supports_color(Stdout, |t| t.bold()),
        record.id,
    );
    Ok(())
}
