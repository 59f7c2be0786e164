use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use verdant_catalog::{ListField, PlantPayload};

use super::Context;
use crate::CliError;
use crate::cli_types::SubmitArgs;

/// Submit a plant for review as the acting user.
pub(crate) fn run_submit(ctx: &Context, args: SubmitArgs) -> Result<(), CliError> {
    let actor = ctx.actor()?;
    let payload = payload_from_args(args)?;
    let conn = ctx.open_catalog()?;

    let record = verdant_moderation::submit(&conn, payload, &actor.user_id)?;

    log::info!(
        "{} Submitted '{}' (id {}) for review",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        record.name.if_supports_color(Stdout, |t| t.bold()),
        record.id,
    );
    log::info!("  Status:   {}", record.status);
    log::info!("  Category: {}", record.category);
    Ok(())
}

fn payload_from_args(args: SubmitArgs) -> Result<PlantPayload, CliError> {
    if let Some(path) = args.file {
        let contents = std::fs::read_to_string(&path)?;
        return serde_json::from_str(&contents).map_err(|e| {
            CliError::invalid_input(format!("{} is not a plant object: {}", path.display(), e))
        });
    }

    Ok(PlantPayload {
        name: args.name,
        display_name: args.display_name,
        latin_name: args.latin_name,
        category: args.category,
        subcategory: args.subcategory,
        description: args.description,
        uses: args.uses.map(ListField::One),
        companion_plants: args.companions.map(ListField::One),
        avoid_plants: args.avoid.map(ListField::One),
        ..Default::default()
    })
}
