//! Admin gate for moderation operations.
//!
//! Every moderation entry point is a method on [`AdminSession`], and the only
//! way to obtain one is [`AdminSession::begin`], which performs the admin
//! check. The workflow itself never looks at who is calling.

use rusqlite::Connection;
use serde::Serialize;
use verdant_catalog::types::*;
use verdant_db::queries::{self, Page};

use crate::catalog::{self, Audience, ListRequest};
use crate::error::ModerationError;
use crate::workflow;

/// The caller, as established by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: false,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: true,
        }
    }
}

/// Review queue statistics, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationStats {
    pub pending_count: i64,
    pub approved_count: i64,
    pub rejected_count: i64,
    /// Distinct contributors with at least one pending or approved record.
    pub contributors_count: i64,
    pub system_count: i64,
}

/// An authorized moderation context.
pub struct AdminSession<'a> {
    conn: &'a Connection,
    actor: &'a Actor,
}

impl<'a> AdminSession<'a> {
    /// Check that `actor` is an administrator.
    pub fn begin(conn: &'a Connection, actor: &'a Actor) -> Result<Self, ModerationError> {
        if !actor.is_admin {
            log::warn!("Moderation attempt by non-admin user '{}'", actor.user_id);
            return Err(ModerationError::Forbidden {
                user: actor.user_id.clone(),
            });
        }
        Ok(Self { conn, actor })
    }

    /// Approve a pending contribution. Approving an approved one is a no-op.
    pub fn approve(&self, id: PlantId) -> Result<PlantRecord, ModerationError> {
        workflow::approve(self.conn, &self.actor.user_id, id)
    }

    /// Reject a pending contribution with a non-empty reason.
    pub fn reject(&self, id: PlantId, reason: &str) -> Result<PlantRecord, ModerationError> {
        workflow::reject(self.conn, &self.actor.user_id, id, reason)
    }

    /// Permanently delete a record in any state. Returns the removed record.
    pub fn delete(&self, id: PlantId) -> Result<PlantRecord, ModerationError> {
        workflow::delete(self.conn, &self.actor.user_id, id)
    }

    pub fn stats(&self) -> Result<ModerationStats, ModerationError> {
        let counts = queries::status_counts(self.conn)?;
        Ok(ModerationStats {
            pending_count: counts.pending,
            approved_count: counts.approved,
            rejected_count: counts.rejected,
            contributors_count: counts.contributors,
            system_count: counts.system,
        })
    }

    /// Admin listing: any status, defaulting to all.
    pub fn list(&self, request: &ListRequest) -> Result<Page<PlantRecord>, ModerationError> {
        catalog::list(self.conn, Audience::Admin, request)
    }

    /// Recent moderation actions, newest first.
    pub fn history(
        &self,
        plant_id: Option<PlantId>,
        limit: Option<u32>,
    ) -> Result<Vec<ModerationLogEntry>, ModerationError> {
        Ok(queries::list_moderation_log(self.conn, plant_id, limit)?)
    }
}
