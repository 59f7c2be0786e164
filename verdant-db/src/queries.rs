//! Read queries for the catalog database.
//!
//! Provides paginated listing, status statistics, and the audits used after
//! imports (duplicate names, shared latin names).

use rusqlite::{Connection, params};
use verdant_catalog::category_slug;
use verdant_catalog::types::*;

use crate::operations::{OperationError, PLANT_COLUMNS, row_to_plant, status_column};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 200;

// ── Listing ─────────────────────────────────────────────────────────────────

/// Sort order for plant listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlantOrder {
    /// Most recently inserted first.
    #[default]
    Newest,
    Oldest,
    /// Case-insensitive by name, then id.
    Name,
}

impl PlantOrder {
    fn sql(&self) -> &'static str {
        match self {
            Self::Newest => "id DESC",
            Self::Oldest => "id ASC",
            Self::Name => "name_key ASC, id ASC",
        }
    }
}

impl std::str::FromStr for PlantOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "recent" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "name" => Ok(Self::Name),
            other => Err(format!("unknown order '{other}' (expected newest, oldest, name)")),
        }
    }
}

/// Filter and paging options for [`list_plants`].
#[derive(Debug, Clone)]
pub struct PlantQuery {
    pub status: StatusFilter,
    pub category: Option<String>,
    /// 1-based page number. 0 is treated as 1.
    pub page: u32,
    /// Clamped to `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
    pub order: PlantOrder,
}

impl Default for PlantQuery {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            category: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            order: PlantOrder::default(),
        }
    }
}

/// One page of results together with the total match count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.total.div_ceil(self.page_size as u64)
        }
    }
}

/// List plants matching the query.
///
/// The count and the page are read inside one transaction, so a single call
/// always sees a consistent snapshot.
pub fn list_plants(
    conn: &Connection,
    query: &PlantQuery,
) -> Result<Page<PlantRecord>, OperationError> {
    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
    let offset = (page as u64 - 1) * page_size as u64;

    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    if let Some(status) = query.status.status() {
        values.push(Box::new(status.as_str()));
        clauses.push("status = ?");
    }
    if let Some(category) = query.category.as_deref() {
        values.push(Box::new(category_slug(category)));
        clauses.push("category = ?");
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let params: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| v.as_ref()).collect();

    let tx = conn.unchecked_transaction()?;

    let total: i64 = tx.query_row(
        &format!("SELECT COUNT(*) FROM plants {where_sql}"),
        params.as_slice(),
        |row| row.get(0),
    )?;

    let items = {
        let mut stmt = tx.prepare(&format!(
            "SELECT {PLANT_COLUMNS} FROM plants {where_sql}
             ORDER BY {} LIMIT {page_size} OFFSET {offset}",
            query.order.sql()
        ))?;
        let rows = stmt.query_map(params.as_slice(), row_to_plant)?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    tx.commit()?;

    Ok(Page {
        items,
        page,
        page_size,
        total: total as u64,
    })
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Record counts per review state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    /// Distinct owners with at least one pending or approved record.
    pub contributors: i64,
    /// Records without an owner.
    pub system: i64,
}

/// Count records by status. Always computed from the table, never cached.
pub fn status_counts(conn: &Connection) -> Result<StatusCounts, OperationError> {
    conn.query_row(
        "SELECT
             COALESCE(SUM(status = 'pending'), 0),
             COALESCE(SUM(status = 'approved'), 0),
             COALESCE(SUM(status = 'rejected'), 0),
             COUNT(DISTINCT CASE WHEN status != 'rejected' THEN owner_id END),
             COALESCE(SUM(owner_id IS NULL), 0)
         FROM plants",
        [],
        |row| {
            Ok(StatusCounts {
                pending: row.get(0)?,
                approved: row.get(1)?,
                rejected: row.get(2)?,
                contributors: row.get(3)?,
                system: row.get(4)?,
            })
        },
    )
    .map_err(Into::into)
}

// ── Audits ──────────────────────────────────────────────────────────────────

/// A member of a duplicate-name group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateMember {
    pub id: PlantId,
    pub name: String,
    pub status: PlantStatus,
}

/// Records, in any status, sharing one case-folded name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateNameGroup {
    pub name_key: String,
    pub members: Vec<DuplicateMember>,
}

/// Every case-folded name held by more than one record in the whole store.
///
/// Live records cannot collide (the index forbids it), so groups here involve
/// at least one rejected record.
pub fn duplicate_name_audit(conn: &Connection) -> Result<Vec<DuplicateNameGroup>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT name_key, id, name, status FROM plants
         WHERE name_key IN (
             SELECT name_key FROM plants GROUP BY name_key HAVING COUNT(*) > 1
         )
         ORDER BY name_key, id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            DuplicateMember {
                id: row.get(1)?,
                name: row.get(2)?,
                status: status_column(row, 3)?,
            },
        ))
    })?;

    let mut groups: Vec<DuplicateNameGroup> = Vec::new();
    for row in rows {
        let (key, member) = row?;
        match groups.last_mut() {
            Some(group) if group.name_key == key => group.members.push(member),
            _ => groups.push(DuplicateNameGroup {
                name_key: key,
                members: vec![member],
            }),
        }
    }
    Ok(groups)
}

/// A latin name claimed by several differently-named live records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatinCollision {
    pub latin_key: String,
    pub names: Vec<String>,
}

/// Possible synonyms: live records that share a latin name but not a name.
pub fn latin_name_collisions(conn: &Connection) -> Result<Vec<LatinCollision>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT latin_key, name FROM plants
         WHERE status != 'rejected' AND latin_key IN (
             SELECT latin_key FROM plants
             WHERE latin_key IS NOT NULL AND status != 'rejected'
             GROUP BY latin_key HAVING COUNT(DISTINCT name_key) > 1
         )
         ORDER BY latin_key, id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut out: Vec<LatinCollision> = Vec::new();
    for row in rows {
        let (key, name) = row?;
        match out.last_mut() {
            Some(c) if c.latin_key == key => c.names.push(name),
            _ => out.push(LatinCollision {
                latin_key: key,
                names: vec![name],
            }),
        }
    }
    Ok(out)
}

// ── Log Queries ─────────────────────────────────────────────────────────────

/// List recent import logs, newest first.
pub fn list_import_logs(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<ImportLog>, OperationError> {
    let limit = limit.unwrap_or(20);
    let mut stmt = conn.prepare(&format!(
        "SELECT id, source_name, imported_at, records_inserted, records_skipped,
                records_errored, warnings
         FROM import_log ORDER BY id DESC LIMIT {limit}"
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok(ImportLog {
            id: row.get(0)?,
            source_name: row.get(1)?,
            imported_at: row.get(2)?,
            records_inserted: row.get(3)?,
            records_skipped: row.get(4)?,
            records_errored: row.get(5)?,
            warnings: row.get(6)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// List moderation log entries, newest first, optionally for one plant.
pub fn list_moderation_log(
    conn: &Connection,
    plant_id: Option<PlantId>,
    limit: Option<u32>,
) -> Result<Vec<ModerationLogEntry>, OperationError> {
    let limit = limit.unwrap_or(50);
    let mut stmt = conn.prepare(&format!(
        "SELECT id, plant_id, plant_name, action, actor, reason, acted_at
         FROM moderation_log
         WHERE ?1 IS NULL OR plant_id = ?1
         ORDER BY id DESC LIMIT {limit}"
    ))?;
    let rows = stmt.query_map(params![plant_id], |row| {
        let action: String = row.get(3)?;
        let action = ModerationAction::parse(&action).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                format!("unknown moderation action '{action}'").into(),
            )
        })?;
        Ok(ModerationLogEntry {
            id: row.get(0)?,
            plant_id: row.get(1)?,
            plant_name: row.get(2)?,
            action,
            actor: row.get(4)?,
            reason: row.get(5)?,
            acted_at: row.get(6)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
