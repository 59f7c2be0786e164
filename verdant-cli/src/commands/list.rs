use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use verdant_catalog::{PlantRecord, PlantStatus};
use verdant_db::Page;
use verdant_moderation::{AdminSession, ListRequest, list_public};

use super::{Context, truncate_str};
use crate::CliError;
use crate::cli_types::ListArgs;

/// List plants, either the public catalog or the admin view.
pub(crate) fn run_list(ctx: &Context, args: ListArgs) -> Result<(), CliError> {
    let request = ListRequest {
        status: args.status,
        category: args.category.clone(),
        page: args.page,
        page_size: args.page_size,
        order: args.order,
    };

    let conn = ctx.open_catalog()?;
    let page = if args.public {
        if args.status.is_some() {
            log::warn!("--status is ignored for the public listing");
        }
        list_public(&conn, &request)?
    } else {
        let actor = ctx.actor()?;
        AdminSession::begin(&conn, &actor)?.list(&request)?
    };

    if args.json {
        let json = serde_json::to_string_pretty(&page.items)
            .map_err(|e| CliError::invalid_input(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    print_page(&page);
    Ok(())
}

fn print_page(page: &Page<PlantRecord>) {
    if page.items.is_empty() {
        log::info!("No plants found.");
        return;
    }

    log::info!(
        "  {:>6}  {:<28} {:<16} {:<9} {}",
        "ID".if_supports_color(Stdout, |t| t.bold()),
        "Name".if_supports_color(Stdout, |t| t.bold()),
        "Category".if_supports_color(Stdout, |t| t.bold()),
        "Status".if_supports_color(Stdout, |t| t.bold()),
        "Owner".if_supports_color(Stdout, |t| t.bold()),
    );
    for plant in &page.items {
        let status = format!("{:<9}", plant.status.as_str());
        let status = match plant.status {
            PlantStatus::Approved => status.if_supports_color(Stdout, |t| t.green()).to_string(),
            PlantStatus::Pending => status.if_supports_color(Stdout, |t| t.yellow()).to_string(),
            PlantStatus::Rejected => status.if_supports_color(Stdout, |t| t.red()).to_string(),
        };
        log::info!(
            "  {:>6}  {:<28} {:<16} {} {}",
            plant.id,
            truncate_str(&plant.display_name, 28),
            truncate_str(&plant.category, 16),
            status,
            plant
                .owner_id
                .as_deref()
                .unwrap_or("system")
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();
    log::info!(
        "  Page {} of {} ({} plants)",
        page.page,
        page.total_pages().max(1),
        page.total,
    );
}
