use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tempfile::TempDir;
use verdant_catalog::types::*;
use verdant_db::*;
use verdant_import::*;

fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(conn: &rusqlite::Connection, files: &[PathBuf]) -> ImportReport {
    import_all(conn, files, &ImportOptions::default(), None).unwrap()
}

fn all_plants(conn: &rusqlite::Connection) -> Vec<PlantRecord> {
    list_plants(
        conn,
        &PlantQuery {
            page_size: MAX_PAGE_SIZE,
            order: PlantOrder::Oldest,
            ..Default::default()
        },
    )
    .unwrap()
    .items
}

const VEGETABLES: &str = r#"[
  {"name": "Tomato Roma", "category": "vegetable", "latinName": "Solanum lycopersicum",
   "uses": ["sauce", "canning"], "companionPlants": "Basil, Marigold"},
  {"name": "Carrot Nantes", "category": "vegetable", "daysToHarvest": 70},
  {"name": "Kale", "category": "vegetable"}
]"#;

#[test]
fn import_inserts_system_records() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let file = write_source(tmp.path(), "vegetables.json", VEGETABLES);

    let report = run(&conn, &[file]);
    assert_eq!(report.inserted_total, 3);
    assert_eq!(report.skipped_total, 0);
    assert_eq!(report.errors_total, 0);
    assert_eq!(report.per_file.len(), 1);
    assert_eq!(report.per_file[0].outcome, FileOutcome::Imported);

    let tomato = find_by_normalized_name(&conn, "tomato roma").unwrap().unwrap();
    assert_eq!(tomato.status, PlantStatus::Approved);
    assert!(tomato.owner_id.is_none());
    assert!(!tomato.is_custom);
    assert_eq!(tomato.traits.uses, vec!["sauce", "canning"]);
    assert_eq!(tomato.traits.companion_plants, vec!["Basil", "Marigold"]);
}

#[test]
fn second_run_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let file = write_source(tmp.path(), "vegetables.json", VEGETABLES);

    run(&conn, std::slice::from_ref(&file));
    let before = all_plants(&conn);

    let report = run(&conn, &[file]);
    assert_eq!(report.inserted_total, 0);
    assert_eq!(report.skipped_total, 3);
    assert_eq!(all_plants(&conn), before);
}

#[test]
fn duplicate_within_file_first_wins() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let file = write_source(
        tmp.path(),
        "fruit.json",
        r#"[{"name":"Malina Polka","category":"fruit_bush"},{"name":"malina polka","category":"fruit_bush"}]"#,
    );

    let report = run(&conn, &[file]);
    assert_eq!(report.per_file[0].inserted, 1);
    assert_eq!(report.per_file[0].skipped, 1);

    let plants = all_plants(&conn);
    assert_eq!(plants.len(), 1);
    assert_eq!(plants[0].name, "Malina Polka");
}

#[test]
fn duplicates_across_files_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let a = write_source(tmp.path(), "a.json", r#"[{"name":"Basil","category":"herb"}]"#);
    let b = write_source(
        tmp.path(),
        "b.json",
        r#"[{"name":" BASIL ","category":"herb"},{"name":"Dill","category":"herb"}]"#,
    );

    let report = run(&conn, &[a, b]);
    assert_eq!(report.inserted_total, 2);
    assert_eq!(report.skipped_total, 1);
    assert_eq!(report.per_file[1].skipped, 1);
}

#[test]
fn names_stay_unique_after_import() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let a = write_source(tmp.path(), "a.json", VEGETABLES);
    let b = write_source(
        tmp.path(),
        "b.json",
        r#"[{"name":"KALE","category":"vegetable"},{"name":"tomato roma","category":"vegetable"}]"#,
    );
    run(&conn, &[a, b]);

    let plants = all_plants(&conn);
    let keys: std::collections::HashSet<_> = plants.iter().map(|p| p.name_key()).collect();
    assert_eq!(keys.len(), plants.len());
}

#[test]
fn latin_collision_is_a_warning_not_a_rejection() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let file = write_source(
        tmp.path(),
        "tomatoes.json",
        r#"[
  {"name": "Tomato Roma", "category": "vegetable", "latinName": "Solanum lycopersicum"},
  {"name": "Tomato Cherry", "category": "vegetable", "latinName": "solanum lycopersicum"}
]"#,
    );

    let report = run(&conn, &[file]);
    assert_eq!(report.inserted_total, 2);
    let warnings = &report.per_file[0].warnings;
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].name, "Tomato Cherry");
    assert_eq!(warnings[0].existing_name, "Tomato Roma");
    assert_eq!(report.warnings_total(), 1);
}

#[test]
fn missing_file_is_reported_and_batch_continues() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let missing = tmp.path().join("missing.json");
    let broken = write_source(tmp.path(), "broken.json", "{ nope");
    let good = write_source(tmp.path(), "herbs.json", r#"[{"name":"Basil","category":"herb"}]"#);

    let report = run(&conn, &[missing, broken, good]);
    assert_eq!(report.per_file.len(), 3);
    assert!(matches!(report.per_file[0].outcome, FileOutcome::Unavailable(_)));
    assert!(matches!(report.per_file[1].outcome, FileOutcome::Unavailable(_)));
    assert_eq!(report.per_file[2].outcome, FileOutcome::Imported);
    assert_eq!(report.unavailable_files().count(), 2);
    assert_eq!(report.inserted_total, 1);
}

#[test]
fn bad_records_are_counted_and_skipped() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let file = write_source(
        tmp.path(),
        "mixed.json",
        r#"[
  {"name": "Basil", "category": "herb"},
  {"category": "herb"},
  {"name": "Kale"},
  {"name": "Chard", "category": "vegetable", "daysToHarvest": "soon"},
  {"name": ["wrong"], "category": "herb"},
  {"name": "Dill", "category": "herb"}
]"#,
    );

    let report = run(&conn, &[file]);
    let file = &report.per_file[0];
    assert_eq!(file.inserted, 2);
    assert_eq!(file.errors, 4);
    assert_eq!(report.errors_total, 4);
    assert_eq!(file.issues[0].index, 1);
    assert_eq!(file.issues[1].name.as_deref(), Some("Kale"));
}

#[test]
fn pending_contribution_blocks_import_of_same_name() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let basil = verdant_catalog::PlantPayload::new("Basil", "herb")
        .normalize()
        .unwrap();
    insert_plant(&conn, &basil, &RecordOrigin::Contributor("u1".into())).unwrap();

    let file = write_source(tmp.path(), "herbs.json", r#"[{"name":"basil","category":"herb"}]"#);
    let report = run(&conn, &[file]);
    assert_eq!(report.skipped_total, 1);
    assert_eq!(report.inserted_total, 0);
}

#[test]
fn import_after_delete_reuses_name() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let file = write_source(tmp.path(), "v.json", r#"[{"name":"Tomato Roma","category":"vegetable"}]"#);

    run(&conn, std::slice::from_ref(&file));
    let existing = find_by_normalized_name(&conn, "Tomato Roma").unwrap().unwrap();
    delete_plant(&conn, existing.id).unwrap();

    let report = run(&conn, &[file]);
    assert_eq!(report.inserted_total, 1);
}

#[test]
fn dry_run_leaves_store_untouched() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let file = write_source(tmp.path(), "vegetables.json", VEGETABLES);

    let options = ImportOptions {
        dry_run: true,
        ..Default::default()
    };
    let report = import_all(&conn, &[file], &options, None).unwrap();
    assert!(report.dry_run);
    assert_eq!(report.inserted_total, 3);
    assert!(all_plants(&conn).is_empty());
    assert!(list_import_logs(&conn, None).unwrap().is_empty());
}

#[test]
fn import_log_written_per_file() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let a = write_source(tmp.path(), "a.json", VEGETABLES);
    let missing = tmp.path().join("missing.json");

    run(&conn, &[a, missing]);
    let logs = list_import_logs(&conn, None).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].source_name, "a.json");
    assert_eq!(logs[0].records_inserted, 3);
}

#[test]
fn duplicate_audit_reported_after_run() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let kale = verdant_catalog::PlantPayload::new("Kale", "vegetable")
        .normalize()
        .unwrap();
    let id = insert_plant(&conn, &kale, &RecordOrigin::Contributor("u1".into())).unwrap();
    update_status(&conn, id, PlantStatus::Pending, PlantStatus::Rejected, Some("dup")).unwrap();

    let file = write_source(tmp.path(), "v.json", r#"[{"name":"kale","category":"vegetable"}]"#);
    let report = run(&conn, &[file]);
    assert_eq!(report.inserted_total, 1);
    assert_eq!(report.duplicate_names_audit.len(), 1);
    assert_eq!(report.duplicate_names_audit[0].name_key, "kale");
}

struct CancelAfterFirst<'a>(&'a AtomicBool);

impl ImportProgress for CancelAfterFirst<'_> {
    fn on_record(&self, _current: usize, _total: usize, _name: &str) {
        self.0.store(true, Ordering::Relaxed);
    }
    fn on_file(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

#[test]
fn cancellation_stops_between_records() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let a = write_source(tmp.path(), "a.json", VEGETABLES);
    let b = write_source(tmp.path(), "b.json", r#"[{"name":"Dill","category":"herb"}]"#);

    let flag = AtomicBool::new(false);
    let progress = CancelAfterFirst(&flag);
    let options = ImportOptions {
        cancel: Some(&flag),
        ..Default::default()
    };
    let report = import_all(&conn, &[a, b], &options, Some(&progress)).unwrap();

    assert!(report.cancelled);
    assert_eq!(report.inserted_total, 1);
    assert_eq!(report.per_file.len(), 1);
    assert_eq!(all_plants(&conn).len(), 1);
}

/// Claims "Dill" as a pending contribution once the first record is done,
/// after the importer has taken its name snapshot for the file.
struct ClaimDillAfterFirst<'c>(&'c rusqlite::Connection);

impl ImportProgress for ClaimDillAfterFirst<'_> {
    fn on_record(&self, current: usize, _total: usize, _name: &str) {
        if current == 1 {
            let dill = verdant_catalog::PlantPayload::new("Dill", "herb")
                .normalize()
                .unwrap();
            insert_plant(self.0, &dill, &RecordOrigin::Contributor("u1".into())).unwrap();
        }
    }
    fn on_file(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

#[test]
fn concurrent_writer_after_snapshot_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let file = write_source(
        tmp.path(),
        "herbs.json",
        r#"[{"name":"Basil","category":"herb"},{"name":"DILL","category":"herb"}]"#,
    );

    let progress = ClaimDillAfterFirst(&conn);
    let report = import_all(&conn, &[file], &ImportOptions::default(), Some(&progress)).unwrap();

    assert_eq!(
        (report.inserted_total, report.skipped_total, report.errors_total),
        (1, 1, 0)
    );
    let dill = find_by_normalized_name(&conn, "dill").unwrap().unwrap();
    assert_eq!(dill.status, PlantStatus::Pending);
    assert_eq!(dill.name, "Dill");
}
