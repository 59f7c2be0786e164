use verdant_catalog::types::*;
use verdant_catalog::{ListField, PlantPayload};
use verdant_db::*;

fn plant(name: &str, category: &str) -> NewPlant {
    PlantPayload::new(name, category).normalize().unwrap()
}

fn plant_with_latin(name: &str, latin: &str) -> NewPlant {
    PlantPayload {
        latin_name: Some(latin.to_string()),
        ..PlantPayload::new(name, "vegetable")
    }
    .normalize()
    .unwrap()
}

fn contributor(id: &str) -> RecordOrigin {
    RecordOrigin::Contributor(id.to_string())
}

#[test]
fn insert_system_record_is_approved() {
    let conn = open_memory().unwrap();
    let id = insert_plant(&conn, &plant("Tomato Roma", "vegetable"), &RecordOrigin::System).unwrap();

    let record = find_plant(&conn, id).unwrap().unwrap();
    assert_eq!(record.name, "Tomato Roma");
    assert_eq!(record.status, PlantStatus::Approved);
    assert!(record.owner_id.is_none());
    assert!(!record.is_custom);
    assert!(record.rejection_reason.is_none());
    assert!(!record.created_at.is_empty());
}

#[test]
fn insert_contribution_is_pending_and_custom() {
    let conn = open_memory().unwrap();
    let id = insert_plant(&conn, &plant("Basil Genovese", "herb"), &contributor("u1")).unwrap();

    let record = find_plant(&conn, id).unwrap().unwrap();
    assert_eq!(record.status, PlantStatus::Pending);
    assert_eq!(record.owner_id.as_deref(), Some("u1"));
    assert!(record.is_custom);
}

#[test]
fn list_fields_round_trip_through_storage() {
    let conn = open_memory().unwrap();
    let new = PlantPayload {
        uses: Some(ListField::One("sauce, canning".into())),
        companion_plants: Some(ListField::from(vec!["Basil", "Marigold"])),
        ..PlantPayload::new("Tomato Roma", "vegetable")
    }
    .normalize()
    .unwrap();
    let id = insert_plant(&conn, &new, &RecordOrigin::System).unwrap();

    let record = find_plant(&conn, id).unwrap().unwrap();
    assert_eq!(record.traits, new.traits);
}

#[test]
fn live_names_are_unique_case_insensitively() {
    let conn = open_memory().unwrap();
    insert_plant(&conn, &plant("Malina Polka", "fruit_bush"), &RecordOrigin::System).unwrap();

    let err = insert_plant(&conn, &plant("  malina POLKA", "fruit_bush"), &contributor("u1"))
        .unwrap_err();
    assert!(matches!(err, OperationError::DuplicateName { .. }));
}

#[test]
fn rejected_records_do_not_reserve_the_name() {
    let conn = open_memory().unwrap();
    let id = insert_plant(&conn, &plant("Kale", "vegetable"), &contributor("u1")).unwrap();
    assert!(
        update_status(&conn, id, PlantStatus::Pending, PlantStatus::Rejected, Some("dup")).unwrap()
    );

    insert_plant(&conn, &plant("kale", "vegetable"), &contributor("u2")).unwrap();
}

#[test]
fn find_by_normalized_name_ignores_rejected() {
    let conn = open_memory().unwrap();
    let id = insert_plant(&conn, &plant("Kale", "vegetable"), &contributor("u1")).unwrap();
    assert!(find_by_normalized_name(&conn, " KALE ").unwrap().is_some());

    update_status(&conn, id, PlantStatus::Pending, PlantStatus::Rejected, Some("dup")).unwrap();
    assert!(find_by_normalized_name(&conn, "kale").unwrap().is_none());
}

#[test]
fn find_by_latin_name_returns_all_holders() {
    let conn = open_memory().unwrap();
    insert_plant(
        &conn,
        &plant_with_latin("Tomato Roma", "Solanum lycopersicum"),
        &RecordOrigin::System,
    )
    .unwrap();
    insert_plant(
        &conn,
        &plant_with_latin("Tomato Cherry", "solanum LYCOPERSICUM"),
        &RecordOrigin::System,
    )
    .unwrap();

    let holders = find_by_normalized_latin_name(&conn, "Solanum Lycopersicum").unwrap();
    let names: Vec<_> = holders.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Tomato Roma", "Tomato Cherry"]);
}

#[test]
fn active_name_keys_snapshot() {
    let conn = open_memory().unwrap();
    insert_plant(&conn, &plant("Tomato Roma", "vegetable"), &RecordOrigin::System).unwrap();
    let id = insert_plant(&conn, &plant("Kale", "vegetable"), &contributor("u1")).unwrap();
    update_status(&conn, id, PlantStatus::Pending, PlantStatus::Rejected, Some("dup")).unwrap();

    let keys = active_name_keys(&conn).unwrap();
    assert!(keys.contains("tomato roma"));
    assert!(!keys.contains("kale"));
}

#[test]
fn update_status_is_compare_and_set() {
    let conn = open_memory().unwrap();
    let id = insert_plant(&conn, &plant("Kale", "vegetable"), &contributor("u1")).unwrap();

    assert!(update_status(&conn, id, PlantStatus::Pending, PlantStatus::Approved, None).unwrap());
    // Second attempt from the stale state changes nothing.
    assert!(
        !update_status(&conn, id, PlantStatus::Pending, PlantStatus::Rejected, Some("late"))
            .unwrap()
    );
    let record = find_plant(&conn, id).unwrap().unwrap();
    assert_eq!(record.status, PlantStatus::Approved);
}

#[test]
fn delete_frees_name_and_is_final() {
    let conn = open_memory().unwrap();
    let id = insert_plant(&conn, &plant("Tomato Roma", "vegetable"), &RecordOrigin::System).unwrap();

    delete_plant(&conn, id).unwrap();
    assert!(find_plant(&conn, id).unwrap().is_none());
    assert!(matches!(
        delete_plant(&conn, id),
        Err(OperationError::NotFound { .. })
    ));

    let new_id =
        insert_plant(&conn, &plant("Tomato Roma", "vegetable"), &RecordOrigin::System).unwrap();
    assert_ne!(new_id, id);
}

#[test]
fn moderation_log_survives_delete() {
    let conn = open_memory().unwrap();
    let id = insert_plant(&conn, &plant("Kale", "vegetable"), &contributor("u1")).unwrap();
    insert_moderation_log(&conn, id, "Kale", ModerationAction::Delete, "admin", None).unwrap();
    delete_plant(&conn, id).unwrap();

    let entries = list_moderation_log(&conn, Some(id), None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, ModerationAction::Delete);
    assert_eq!(entries[0].plant_name, "Kale");
}

#[test]
fn import_log_round_trip() {
    let conn = open_memory().unwrap();
    let log = ImportLog {
        id: 0,
        source_name: "vegetables.json".to_string(),
        imported_at: "2026-01-01T00:00:00Z".to_string(),
        records_inserted: 10,
        records_skipped: 2,
        records_errored: 1,
        warnings: 3,
    };
    insert_import_log(&conn, &log).unwrap();

    let logs = list_import_logs(&conn, None).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].source_name, "vegetables.json");
    assert_eq!(logs[0].records_inserted, 10);
    assert_eq!(logs[0].warnings, 3);
}
