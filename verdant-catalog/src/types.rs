//! Data model types for the plant catalog.
//!
//! These types represent the persistent catalog schema: plant records, their
//! review status, and the import / moderation audit logs.

use serde::{Deserialize, Serialize};

/// Internal identifier of a plant record. Assigned on insert, never reused.
pub type PlantId = i64;

// ── Status ──────────────────────────────────────────────────────────────────

/// Review state of a plant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantStatus {
    Approved,
    Pending,
    Rejected,
}

impl PlantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }

    /// Parse a stored or user-supplied status. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" => Some(Self::Approved),
            "pending" => Some(Self::Pending),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown status '{s}'"))
    }
}

/// Status selector for admin listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    Only(PlantStatus),
    #[default]
    All,
}

impl StatusFilter {
    pub fn status(&self) -> Option<PlantStatus> {
        match self {
            Self::Only(s) => Some(*s),
            Self::All => None,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<PlantStatus>().map(Self::Only)
    }
}

// ── Plant ───────────────────────────────────────────────────────────────────

/// Agronomic attributes. Opaque to the catalog: each is present or absent,
/// with no cross-field rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantTraits {
    pub sun_requirement: Option<String>,
    pub water_needs: Option<String>,
    pub soil_type: Option<String>,
    pub days_to_harvest: Option<i64>,
    pub hardiness_zone: Option<String>,
    pub spacing_cm: Option<i64>,
    pub height_cm: Option<i64>,
    pub sowing_period: Option<String>,
    pub propagation_method: Option<String>,
    pub description: Option<String>,
    pub companion_plants: Vec<String>,
    pub avoid_plants: Vec<String>,
    pub uses: Vec<String>,
}

/// A normalized plant ready to be written, before it has an id or a status.
///
/// Produced by [`crate::payload::PlantPayload::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlant {
    pub name: String,
    pub display_name: String,
    pub latin_name: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub traits: PlantTraits,
}

impl NewPlant {
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    pub fn latin_key(&self) -> Option<String> {
        self.latin_name.as_deref().map(name_key)
    }
}

/// Where a new record comes from. Determines its initial status and ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOrigin {
    /// Curated batch import: approved, no owner.
    System,
    /// User submission: pending, owned by the contributor.
    Contributor(String),
}

impl RecordOrigin {
    pub fn initial_status(&self) -> PlantStatus {
        match self {
            Self::System => PlantStatus::Approved,
            Self::Contributor(_) => PlantStatus::Pending,
        }
    }

    pub fn owner_id(&self) -> Option<&str> {
        match self {
            Self::System => None,
            Self::Contributor(owner) => Some(owner),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Contributor(_))
    }
}

/// A stored plant record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantRecord {
    pub id: PlantId,
    pub owner_id: Option<String>,
    pub name: String,
    pub display_name: String,
    pub latin_name: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub status: PlantStatus,
    pub rejection_reason: Option<String>,
    pub is_custom: bool,
    #[serde(flatten)]
    pub traits: PlantTraits,
    pub created_at: String,
    pub updated_at: String,
}

impl PlantRecord {
    pub fn is_system(&self) -> bool {
        self.owner_id.is_none()
    }

    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

/// Case-folded comparison key for names and latin names.
///
/// Only used for uniqueness checks; the stored name keeps its casing.
pub fn name_key(s: &str) -> String {
    s.trim().to_lowercase()
}

// ── Import Tracking ─────────────────────────────────────────────────────────

/// Log entry for one source file processed by the batch importer.
#[derive(Debug, Clone)]
pub struct ImportLog {
    pub id: i64,
    pub source_name: String,
    pub imported_at: String,
    pub records_inserted: i64,
    pub records_skipped: i64,
    pub records_errored: i64,
    pub warnings: i64,
}

// ── Moderation Audit ────────────────────────────────────────────────────────

/// An admin action recorded in the moderation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Reject,
    Delete,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Delete => "delete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the moderation audit trail.
///
/// `plant_id` and `plant_name` are copied at action time so the trail
/// survives deletion of the record.
#[derive(Debug, Clone, Serialize)]
pub struct ModerationLogEntry {
    pub id: i64,
    pub plant_id: PlantId,
    pub plant_name: String,
    pub action: ModerationAction,
    pub actor: String,
    pub reason: Option<String>,
    pub acted_at: String,
}
