//! Write operations and point lookups for plant records.

use std::collections::HashSet;

use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use thiserror::Error;
use verdant_catalog::types::*;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Plant not found: id {id}")]
    NotFound { id: PlantId },
    #[error("A plant named '{name}' already exists")]
    DuplicateName { name: String },
}

/// Column list matching [`row_to_plant`].
pub(crate) const PLANT_COLUMNS: &str = "id, owner_id, name, display_name, latin_name, category,
    subcategory, status, rejection_reason, is_custom, sun_requirement, water_needs,
    soil_type, days_to_harvest, hardiness_zone, spacing_cm, height_cm, sowing_period,
    propagation_method, description, companion_plants, avoid_plants, uses,
    created_at, updated_at";

// ── Plant Operations ────────────────────────────────────────────────────────

/// Insert a new plant record. Returns the generated ID.
///
/// Status, owner, and the custom flag all follow from `origin`. A clash with
/// the live-name index is reported as [`OperationError::DuplicateName`].
pub fn insert_plant(
    conn: &Connection,
    plant: &NewPlant,
    origin: &RecordOrigin,
) -> Result<PlantId, OperationError> {
    let t = &plant.traits;
    let result = conn.execute(
        "INSERT INTO plants (owner_id, name, name_key, display_name, latin_name, latin_key,
             category, subcategory, status, is_custom, sun_requirement, water_needs,
             soil_type, days_to_harvest, hardiness_zone, spacing_cm, height_cm,
             sowing_period, propagation_method, description, companion_plants,
             avoid_plants, uses)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
             ?17, ?18, ?19, ?20, ?21, ?22, ?23)",
        params![
            origin.owner_id(),
            plant.name,
            plant.name_key(),
            plant.display_name,
            plant.latin_name,
            plant.latin_key(),
            plant.category,
            plant.subcategory,
            origin.initial_status().as_str(),
            origin.is_custom(),
            t.sun_requirement,
            t.water_needs,
            t.soil_type,
            t.days_to_harvest,
            t.hardiness_zone,
            t.spacing_cm,
            t.height_cm,
            t.sowing_period,
            t.propagation_method,
            t.description,
            encode_list(&t.companion_plants)?,
            encode_list(&t.avoid_plants)?,
            encode_list(&t.uses)?,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => Err(OperationError::DuplicateName {
            name: plant.name.clone(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Fetch a plant by id, in any status.
pub fn find_plant(conn: &Connection, id: PlantId) -> Result<Option<PlantRecord>, OperationError> {
    let mut stmt = conn.prepare(&format!("SELECT {PLANT_COLUMNS} FROM plants WHERE id = ?1"))?;
    stmt.query_row(params![id], row_to_plant)
        .optional()
        .map_err(Into::into)
}

/// Find the live (approved or pending) record holding a name, compared case-insensitively.
pub fn find_by_normalized_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<PlantRecord>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLANT_COLUMNS} FROM plants
         WHERE name_key = ?1 AND status != 'rejected' LIMIT 1"
    ))?;
    stmt.query_row(params![name_key(name)], row_to_plant)
        .optional()
        .map_err(Into::into)
}

/// Find live records sharing a latin name, compared case-insensitively.
pub fn find_by_normalized_latin_name(
    conn: &Connection,
    latin_name: &str,
) -> Result<Vec<PlantRecord>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLANT_COLUMNS} FROM plants
         WHERE latin_key = ?1 AND status != 'rejected' ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![name_key(latin_name)], row_to_plant)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Snapshot of every name key currently reserved by a live record.
pub fn active_name_keys(conn: &Connection) -> Result<HashSet<String>, OperationError> {
    let mut stmt = conn.prepare("SELECT name_key FROM plants WHERE status != 'rejected'")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<HashSet<_>, _>>().map_err(Into::into)
}

/// Move a record from `expected` to `status`, setting or clearing the reason.
///
/// Compare-and-set: returns `false` without writing when the stored status is
/// no longer `expected` (or the row is gone).
pub fn update_status(
    conn: &Connection,
    id: PlantId,
    expected: PlantStatus,
    status: PlantStatus,
    reason: Option<&str>,
) -> Result<bool, OperationError> {
    let changed = conn.execute(
        "UPDATE plants SET status = ?3, rejection_reason = ?4, updated_at = datetime('now')
         WHERE id = ?1 AND status = ?2",
        params![id, expected.as_str(), status.as_str(), reason],
    );
    match changed {
        Ok(n) => Ok(n > 0),
        Err(e) if is_unique_violation(&e) => {
            let name: String =
                conn.query_row("SELECT name FROM plants WHERE id = ?1", params![id], |r| {
                    r.get(0)
                })?;
            Err(OperationError::DuplicateName { name })
        }
        Err(e) => Err(e.into()),
    }
}

/// Permanently remove a record, releasing its name.
pub fn delete_plant(conn: &Connection, id: PlantId) -> Result<(), OperationError> {
    let changed = conn.execute("DELETE FROM plants WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(OperationError::NotFound { id });
    }
    Ok(())
}

// ── Import Log Operations ───────────────────────────────────────────────────

/// Insert an import log entry. Returns the generated ID.
pub fn insert_import_log(conn: &Connection, log: &ImportLog) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO import_log (source_name, imported_at, records_inserted,
             records_skipped, records_errored, warnings)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            log.source_name,
            log.imported_at,
            log.records_inserted,
            log.records_skipped,
            log.records_errored,
            log.warnings,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Moderation Log Operations ───────────────────────────────────────────────

/// Append an entry to the moderation audit trail. Returns the generated ID.
pub fn insert_moderation_log(
    conn: &Connection,
    plant_id: PlantId,
    plant_name: &str,
    action: ModerationAction,
    actor: &str,
    reason: Option<&str>,
) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO moderation_log (plant_id, plant_name, action, actor, reason)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![plant_id, plant_name, action.as_str(), actor, reason],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == ErrorCode::ConstraintViolation
                && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn encode_list(items: &[String]) -> rusqlite::Result<String> {
    serde_json::to_string(items).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn decode_list(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Read a status column, failing on text that is not a known status.
pub(crate) fn status_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<PlantStatus> {
    let raw: String = row.get(idx)?;
    PlantStatus::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown plant status '{raw}'").into(),
        )
    })
}

pub(crate) fn row_to_plant(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlantRecord> {
    let status = status_column(row, 7)?;

    Ok(PlantRecord {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        display_name: row.get(3)?,
        latin_name: row.get(4)?,
        category: row.get(5)?,
        subcategory: row.get(6)?,
        status,
        rejection_reason: row.get(8)?,
        is_custom: row.get(9)?,
        traits: PlantTraits {
            sun_requirement: row.get(10)?,
            water_needs: row.get(11)?,
            soil_type: row.get(12)?,
            days_to_harvest: row.get(13)?,
            hardiness_zone: row.get(14)?,
            spacing_cm: row.get(15)?,
            height_cm: row.get(16)?,
            sowing_period: row.get(17)?,
            propagation_method: row.get(18)?,
            description: row.get(19)?,
            companion_plants: decode_list(row, 20)?,
            avoid_plants: decode_list(row, 21)?,
            uses: decode_list(row, 22)?,
        },
        created_at: row.get(23)?,
        updated_at: row.get(24)?,
    })
}
