//! SQLite persistence layer for the plant catalog.
//!
//! Provides schema creation, record operations, and query APIs
//! backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    OperationError, active_name_keys, delete_plant, find_by_normalized_latin_name,
    find_by_normalized_name, find_plant, insert_import_log, insert_moderation_log, insert_plant,
    update_status,
};
pub use queries::{
    DEFAULT_PAGE_SIZE, DuplicateMember, DuplicateNameGroup, LatinCollision, MAX_PAGE_SIZE, Page,
    PlantOrder, PlantQuery, StatusCounts, duplicate_name_audit, latin_name_collisions,
    list_import_logs, list_moderation_log, list_plants, status_counts,
};
pub use schema::{SchemaError, open_database, open_memory};
