//! User contributions to the catalog.

use rusqlite::Connection;
use verdant_catalog::types::*;
use verdant_catalog::PlantPayload;
use verdant_db::operations;

use crate::error::ModerationError;

/// Submit a plant on behalf of `owner_id`. The record enters review as `pending`.
///
/// Rejects the submission when the name is already held by an approved or
/// pending record, including another user's pending submission.
pub fn submit(
    conn: &Connection,
    payload: PlantPayload,
    owner_id: &str,
) -> Result<PlantRecord, ModerationError> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        return Err(ModerationError::validation("contributor id is required"));
    }

    let plant = payload.normalize()?;

    if let Some(existing) = operations::find_by_normalized_name(conn, &plant.name)? {
        log::debug!(
            "Submission '{}' by {} collides with plant {} ('{}')",
            plant.name,
            owner_id,
            existing.id,
            existing.name
        );
        return Err(ModerationError::DuplicateName {
            name: existing.name,
        });
    }

    // The live-name index still guards the gap between check and insert.
    let id = operations::insert_plant(
        conn,
        &plant,
        &RecordOrigin::Contributor(owner_id.to_string()),
    )?;

    log::info!("Plant {} '{}' submitted by {} for review", id, plant.name, owner_id);

    operations::find_plant(conn, id)?.ok_or(ModerationError::NotFound { id })
}
