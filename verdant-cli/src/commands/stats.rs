use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use verdant_moderation::AdminSession;

use super::Context;
use crate::CliError;

pub(crate) fn run_stats(ctx: &Context) -> Result<(), CliError> {
    let actor = ctx.actor()?;

    if !ctx.db_path.exists() {
        log::warn!("No catalog database found at {}", ctx.db_path.display());
        log::info!("Run 'verdant import' to create one.");
        return Ok(());
    }

    let conn = ctx.open_catalog()?;
    let stats = AdminSession::begin(&conn, &actor)?.stats()?;

    log::info!(
        "{}",
        "Catalog Review Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", ctx.db_path.display());
    crate::log_blank();
    log::info!("  Pending:        {:>8}", stats.pending_count);
    log::info!("  Approved:       {:>8}", stats.approved_count);
    log::info!("  Rejected:       {:>8}", stats.rejected_count);
    log::info!("  Contributors:   {:>8}", stats.contributors_count);
    log::info!("  System records: {:>8}", stats.system_count);

    Ok(())
}
