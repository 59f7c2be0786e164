pub(crate) mod audit;
pub(crate) mod config;
pub(crate) mod import;
pub(crate) mod list;
pub(crate) mod moderate;
pub(crate) mod stats;
pub(crate) mod submit;

use std::path::PathBuf;

use rusqlite::Connection;
use verdant_moderation::Actor;

use crate::CliError;
use crate::settings::Settings;

/// Resolved global options shared by every command.
pub(crate) struct Context {
    pub settings: Settings,
    pub db_path: PathBuf,
    pub user: Option<String>,
    pub quiet: bool,
}

impl Context {
    pub(crate) fn new(
        settings: Settings,
        db_override: Option<PathBuf>,
        user: Option<String>,
        quiet: bool,
    ) -> Self {
        let db_path = settings.resolve_db_path(db_override);
        Self {
            settings,
            db_path,
            user,
            quiet,
        }
    }

    /// Open (or create) the catalog database.
    pub(crate) fn open_catalog(&self) -> Result<Connection, CliError> {
        verdant_db::open_database(&self.db_path).map_err(|e| {
            CliError::database(format!(
                "Failed to open catalog database at {}: {}",
                self.db_path.display(),
                e
            ))
        })
    }

    /// The acting user from `--user`, with admin rights looked up in settings.
    pub(crate) fn actor(&self) -> Result<Actor, CliError> {
        let user = self
            .user
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| CliError::invalid_input("this command needs --user <id>"))?;

        Ok(if self.settings.is_admin(user) {
            Actor::admin(user)
        } else {
            Actor::user(user)
        })
    }
}

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_str("Basil", 10), "Basil");
        assert_eq!(truncate_str("Tomato San Marzano", 10), "Tomato ...");
        assert_eq!(truncate_str("Żółta fasola", 8), "Żółta...");
        assert_eq!(truncate_str("Kale", 2), "Ka");
    }

    #[test]
    fn actor_admin_rights_come_from_settings() {
        let mut settings = Settings::default();
        settings.moderation.admins = vec!["root".to_string()];

        let ctx = Context::new(settings.clone(), None, Some("root".into()), false);
        assert!(ctx.actor().unwrap().is_admin);

        let ctx = Context::new(settings.clone(), None, Some("alice".into()), false);
        assert!(!ctx.actor().unwrap().is_admin);

        let ctx = Context::new(settings, None, None, false);
        assert!(matches!(ctx.actor(), Err(CliError::InvalidInput(_))));
    }
}
