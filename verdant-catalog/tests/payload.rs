use verdant_catalog::{PayloadError, PlantPayload};

fn parse(json: &str) -> PlantPayload {
    serde_json::from_str(json).unwrap()
}

#[test]
fn normalize_full_payload() {
    let payload = parse(
        r#"{
  "name": "  Tomato Roma ",
  "displayName": "Roma tomato",
  "latinName": "Solanum lycopersicum",
  "category": "Vegetable",
  "subcategory": "Fruiting Vegetable",
  "sunRequirement": "full sun",
  "daysToHarvest": "75",
  "hardinessZone": 6,
  "companionPlants": ["Basil", "Marigold"],
  "avoidPlants": "Fennel; Potato",
  "uses": "sauce, canning"
}"#,
    );

    let plant = payload.normalize().unwrap();
    assert_eq!(plant.name, "Tomato Roma");
    assert_eq!(plant.display_name, "Roma tomato");
    assert_eq!(plant.category, "vegetable");
    assert_eq!(plant.subcategory.as_deref(), Some("fruiting_vegetable"));
    assert_eq!(plant.traits.days_to_harvest, Some(75));
    assert_eq!(plant.traits.hardiness_zone.as_deref(), Some("6"));
    assert_eq!(plant.traits.companion_plants, vec!["Basil", "Marigold"]);
    assert_eq!(plant.traits.avoid_plants, vec!["Fennel", "Potato"]);
    assert_eq!(plant.traits.uses, vec!["sauce", "canning"]);
    assert_eq!(plant.name_key(), "tomato roma");
}

#[test]
fn snake_case_keys_are_accepted() {
    let plant = parse(r#"{"name": "Sage", "category": "herb", "latin_name": "Salvia officinalis"}"#)
        .normalize()
        .unwrap();
    assert_eq!(plant.latin_name.as_deref(), Some("Salvia officinalis"));
}

#[test]
fn display_name_defaults_to_name() {
    let plant = PlantPayload::new("Basil Genovese", "herb").normalize().unwrap();
    assert_eq!(plant.display_name, "Basil Genovese");
    assert!(plant.latin_name.is_none());
    assert!(plant.traits.uses.is_empty());
}

#[test]
fn name_and_category_are_required() {
    assert_eq!(
        parse(r#"{"category": "herb"}"#).normalize(),
        Err(PayloadError::MissingField("name"))
    );
    assert_eq!(
        parse(r#"{"name": "   ", "category": "herb"}"#).normalize(),
        Err(PayloadError::MissingField("name"))
    );
    assert_eq!(
        parse(r#"{"name": "Basil"}"#).normalize(),
        Err(PayloadError::MissingField("category"))
    );
}

#[test]
fn non_numeric_days_is_invalid() {
    let err = parse(r#"{"name": "Kale", "category": "vegetable", "daysToHarvest": "soon"}"#)
        .normalize()
        .unwrap_err();
    assert!(matches!(
        err,
        PayloadError::InvalidField {
            field: "daysToHarvest",
            ..
        }
    ));
}

#[test]
fn blank_latin_name_becomes_none() {
    let plant = parse(r#"{"name": "Mint", "category": "herb", "latinName": "  "}"#)
        .normalize()
        .unwrap();
    assert!(plant.latin_key().is_none());
}
