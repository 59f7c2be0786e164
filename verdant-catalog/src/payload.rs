//! Inbound plant payloads and their normalization.
//!
//! Source files and user submissions both arrive in this loose shape: list
//! fields may be an array or a delimited string, numbers may be quoted. Every
//! payload passes through [`PlantPayload::normalize`] before it reaches the
//! store, so nothing downstream sees the original shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{NewPlant, PlantTraits};

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("invalid value for '{field}': {detail}")]
    InvalidField { field: &'static str, detail: String },
}

/// A list-valued field as it arrives: an array, or one delimited string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListField {
    Many(Vec<String>),
    One(String),
}

impl ListField {
    /// Flatten into trimmed, non-empty entries. Case-insensitive repeats are
    /// dropped, keeping the first spelling.
    pub fn into_list(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            Self::Many(items) => items
                .iter()
                .flat_map(|item| split_delimited(item))
                .collect(),
            Self::One(s) => split_delimited(&s),
        };

        let mut seen = std::collections::HashSet::new();
        raw.into_iter()
            .filter(|item| seen.insert(item.to_lowercase()))
            .collect()
    }
}

impl From<Vec<&str>> for ListField {
    fn from(items: Vec<&str>) -> Self {
        Self::Many(items.into_iter().map(str::to_string).collect())
    }
}

fn split_delimited(s: &str) -> Vec<String> {
    s.split([',', ';', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// A scalar that may be written as a number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        let s = match self {
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.trim().to_string(),
        };
        (!s.is_empty()).then_some(s)
    }

    fn into_int(self, field: &'static str) -> Result<Option<i64>, PayloadError> {
        match self {
            Self::Int(n) => Ok(Some(n)),
            Self::Float(f) => Ok(Some(f.round() as i64)),
            Self::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                s.parse::<i64>()
                    .or_else(|_| s.parse::<f64>().map(|f| f.round() as i64))
                    .map(Some)
                    .map_err(|_| PayloadError::InvalidField {
                        field,
                        detail: format!("'{s}' is not a number"),
                    })
            }
        }
    }
}

/// A plant as submitted by a source file or a contributor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlantPayload {
    pub name: Option<String>,
    #[serde(alias = "display_name")]
    pub display_name: Option<String>,
    #[serde(alias = "latin_name")]
    pub latin_name: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    #[serde(alias = "sun_requirement")]
    pub sun_requirement: Option<String>,
    #[serde(alias = "water_needs")]
    pub water_needs: Option<String>,
    #[serde(alias = "soil_type")]
    pub soil_type: Option<String>,
    #[serde(alias = "days_to_harvest")]
    pub days_to_harvest: Option<Scalar>,
    #[serde(alias = "hardiness_zone")]
    pub hardiness_zone: Option<Scalar>,
    #[serde(alias = "spacing_cm")]
    pub spacing_cm: Option<Scalar>,
    #[serde(alias = "height_cm")]
    pub height_cm: Option<Scalar>,
    #[serde(alias = "sowing_period")]
    pub sowing_period: Option<String>,
    #[serde(alias = "propagation_method")]
    pub propagation_method: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "companion_plants")]
    pub companion_plants: Option<ListField>,
    #[serde(alias = "avoid_plants")]
    pub avoid_plants: Option<ListField>,
    pub uses: Option<ListField>,
}

impl PlantPayload {
    /// Minimal payload with the two required fields.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    /// Validate required fields and convert to the canonical representation.
    pub fn normalize(self) -> Result<NewPlant, PayloadError> {
        let name = clean(self.name).ok_or(PayloadError::MissingField("name"))?;
        let category = clean(self.category)
            .map(|c| category_slug(&c))
            .filter(|c| !c.is_empty())
            .ok_or(PayloadError::MissingField("category"))?;
        let subcategory = clean(self.subcategory)
            .map(|c| category_slug(&c))
            .filter(|c| !c.is_empty());
        let display_name = clean(self.display_name).unwrap_or_else(|| name.clone());

        let traits = PlantTraits {
            sun_requirement: clean(self.sun_requirement),
            water_needs: clean(self.water_needs),
            soil_type: clean(self.soil_type),
            days_to_harvest: int_field(self.days_to_harvest, "daysToHarvest")?,
            hardiness_zone: self.hardiness_zone.and_then(Scalar::into_text),
            spacing_cm: int_field(self.spacing_cm, "spacingCm")?,
            height_cm: int_field(self.height_cm, "heightCm")?,
            sowing_period: clean(self.sowing_period),
            propagation_method: clean(self.propagation_method),
            description: clean(self.description),
            companion_plants: list_field(self.companion_plants),
            avoid_plants: list_field(self.avoid_plants),
            uses: list_field(self.uses),
        };

        Ok(NewPlant {
            name,
            display_name,
            latin_name: clean(self.latin_name),
            category,
            subcategory,
            traits,
        })
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn int_field(value: Option<Scalar>, field: &'static str) -> Result<Option<i64>, PayloadError> {
    match value {
        Some(v) => v.into_int(field),
        None => Ok(None),
    }
}

fn list_field(value: Option<ListField>) -> Vec<String> {
    value.map(ListField::into_list).unwrap_or_default()
}

/// Normalize a classification label to a lowercase underscore slug:
/// `"Flower Perennial"` and `"flower-perennial"` both become `flower_perennial`.
pub fn category_slug(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_separator = false;

    for c in s.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_separator = false;
        } else if !last_was_separator && !result.is_empty() {
            result.push('_');
            last_was_separator = true;
        }
    }

    if result.ends_with('_') {
        result.pop();
    }

    result
}
