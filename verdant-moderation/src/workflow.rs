//! Review state machine for plant records.
//!
//! ```text
//! pending ──approve──▶ approved ──approve──▶ approved (no-op)
//!    │
//!    └────reject─────▶ rejected
//!
//! any state ──delete──▶ (gone)
//! ```
//!
//! System records are created approved and never enter review, so approve and
//! reject on them are invalid. Each change and its audit-log row commit
//! together in one immediate transaction.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use verdant_catalog::types::*;
use verdant_db::operations;

use crate::error::ModerationError;

pub(crate) fn approve(
    conn: &Connection,
    actor: &str,
    id: PlantId,
) -> Result<PlantRecord, ModerationError> {
    let action = ModerationAction::Approve;
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let record = load_reviewable(&tx, id, action)?;

    match record.status {
        PlantStatus::Approved => {
            log::debug!("Plant {} already approved", id);
            Ok(record)
        }
        PlantStatus::Rejected => Err(ModerationError::invalid(id, action, "rejected")),
        PlantStatus::Pending => {
            transition(&tx, &record, PlantStatus::Approved, None, action)?;
            operations::insert_moderation_log(&tx, id, &record.name, action, actor, None)?;
            let updated = operations::find_plant(&tx, id)?.ok_or(ModerationError::NotFound { id })?;
            tx.commit()?;
            log::info!("Plant {} '{}' approved by {}", id, record.name, actor);
            Ok(updated)
        }
    }
}

pub(crate) fn reject(
    conn: &Connection,
    actor: &str,
    id: PlantId,
    reason: &str,
) -> Result<PlantRecord, ModerationError> {
    let action = ModerationAction::Reject;
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ModerationError::validation("a rejection reason is required"));
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let record = load_reviewable(&tx, id, action)?;

    if record.status != PlantStatus::Pending {
        return Err(ModerationError::invalid(id, action, record.status.as_str()));
    }

    transition(&tx, &record, PlantStatus::Rejected, Some(reason), action)?;
    operations::insert_moderation_log(&tx, id, &record.name, action, actor, Some(reason))?;
    let updated = operations::find_plant(&tx, id)?.ok_or(ModerationError::NotFound { id })?;
    tx.commit()?;

    log::info!("Plant {} '{}' rejected by {}: {}", id, record.name, actor, reason);
    Ok(updated)
}

pub(crate) fn delete(
    conn: &Connection,
    actor: &str,
    id: PlantId,
) -> Result<PlantRecord, ModerationError> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let record = operations::find_plant(&tx, id)?.ok_or(ModerationError::NotFound { id })?;

    operations::delete_plant(&tx, id)?;
    operations::insert_moderation_log(&tx, id, &record.name, ModerationAction::Delete, actor, None)?;
    tx.commit()?;

    log::info!("Plant {} '{}' deleted by {}", id, record.name, actor);
    Ok(record)
}

/// Fetch a record that approve/reject may act on.
fn load_reviewable(
    conn: &Connection,
    id: PlantId,
    action: ModerationAction,
) -> Result<PlantRecord, ModerationError> {
    let record = operations::find_plant(conn, id)?.ok_or(ModerationError::NotFound { id })?;
    if record.is_system() {
        return Err(ModerationError::invalid(id, action, "a system record"));
    }
    Ok(record)
}

fn transition(
    conn: &Connection,
    record: &PlantRecord,
    to: PlantStatus,
    reason: Option<&str>,
    action: ModerationAction,
) -> Result<(), ModerationError> {
    let changed = operations::update_status(conn, record.id, record.status, to, reason)?;
    if !changed {
        // Status moved under us; report what it is now.
        let state = operations::find_plant(conn, record.id)?
            .map(|r| r.status.as_str().to_string())
            .ok_or(ModerationError::NotFound { id: record.id })?;
        return Err(ModerationError::invalid(record.id, action, state));
    }
    Ok(())
}
