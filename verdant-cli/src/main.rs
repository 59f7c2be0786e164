//! verdant CLI
//!
//! Command-line interface for importing, submitting and moderating plants in
//! the catalog database.

mod cli_types;
mod commands;
mod error;
mod logging;
mod settings;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use cli_types::{Cli, Commands, ConfigAction};
use commands::Context;
pub(crate) use error::CliError;
use settings::Settings;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stderr, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}

/// Emit an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Runs before settings are loaded so `config init --force` can replace a broken file.
    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::Init { force } => commands::config::run_config_init(*force),
        };
    }

    let settings = Settings::load()?;
    let ctx = Context::new(settings, cli.db, cli.user, cli.quiet);

    match cli.command {
        Commands::Import { files, dry_run } => commands::import::run_import(&ctx, files, dry_run),
        Commands::Submit(args) => commands::submit::run_submit(&ctx, args),
        Commands::Approve { id } => commands::moderate::run_approve(&ctx, id),
        Commands::Reject { id, reason } => commands::moderate::run_reject(&ctx, id, &reason),
        Commands::Delete { id, confirm } => commands::moderate::run_delete(&ctx, id, confirm),
        Commands::Stats => commands::stats::run_stats(&ctx),
        Commands::List(args) => commands::list::run_list(&ctx, args),
        Commands::Audit => commands::audit::run_audit(&ctx),
        Commands::History { plant, limit } => commands::audit::run_history(&ctx, plant, limit),
        Commands::Imports { limit } => commands::audit::run_imports(&ctx, limit),
        Commands::Config { .. } => Ok(()),
    }
}
