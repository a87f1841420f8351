//! Field-level validation for create and update bodies.
//!
//! Create requires all four fields; update accepts any subset but validates
//! every field that is present by the same rules. Violations are collected
//! per field so the client sees everything wrong with the request at once.

use chrono::NaiveDate;
use serde_json::Value;

use crate::city::{CityInput, CityPatch};

use super::error::ValidationErrors;

const MAX_STRING_LEN: usize = 255;

/// Validate a create body: all fields required.
pub fn city_input(body: &Value) -> Result<CityInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = string_field(body, "name", true, &mut errors);
    let country = string_field(body, "country", true, &mut errors);
    let population = population_field(body, true, &mut errors);
    let founded_at = date_field(body, true, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    // All four are present when no errors were recorded.
    match (name, country, population, founded_at) {
        (Some(name), Some(country), Some(population), Some(founded_at)) => Ok(CityInput {
            name,
            country,
            population,
            founded_at,
        }),
        _ => Err(errors),
    }
}

/// Validate an update body: any subset of the four fields, each validated
/// only when present.
pub fn city_patch(body: &Value) -> Result<CityPatch, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let patch = CityPatch {
        name: string_field(body, "name", false, &mut errors),
        country: string_field(body, "country", false, &mut errors),
        population: population_field(body, false, &mut errors),
        founded_at: date_field(body, false, &mut errors),
    };

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

fn record(errors: &mut ValidationErrors, field: &str, message: String) {
    errors.entry(field.to_string()).or_default().push(message);
}

fn string_field(
    body: &Value,
    field: &str,
    required: bool,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match body.get(field) {
        None => {
            if required {
                record(errors, field, format!("The {field} field is required."));
            }
            None
        }
        Some(Value::String(s)) if !s.is_empty() => {
            if s.chars().count() > MAX_STRING_LEN {
                record(
                    errors,
                    field,
                    format!("The {field} field must not be greater than {MAX_STRING_LEN} characters."),
                );
                None
            } else {
                Some(s.clone())
            }
        }
        Some(Value::String(_)) | Some(Value::Null) => {
            record(errors, field, format!("The {field} field is required."));
            None
        }
        Some(_) => {
            record(errors, field, format!("The {field} field must be a string."));
            None
        }
    }
}

fn population_field(body: &Value, required: bool, errors: &mut ValidationErrors) -> Option<u64> {
    match body.get("population") {
        None => {
            if required {
                record(errors, "population", "The population field is required.".into());
            }
            None
        }
        Some(Value::Null) => {
            record(errors, "population", "The population field is required.".into());
            None
        }
        Some(Value::Number(n)) => match n.as_u64() {
            Some(population) => Some(population),
            None => {
                if n.as_i64().is_some() {
                    record(
                        errors,
                        "population",
                        "The population field must be at least 0.".into(),
                    );
                } else {
                    record(
                        errors,
                        "population",
                        "The population field must be an integer.".into(),
                    );
                }
                None
            }
        },
        Some(_) => {
            record(
                errors,
                "population",
                "The population field must be an integer.".into(),
            );
            None
        }
    }
}

fn date_field(body: &Value, required: bool, errors: &mut ValidationErrors) -> Option<String> {
    match body.get("founded_at") {
        None => {
            if required {
                record(errors, "founded_at", "The founded at field is required.".into());
            }
            None
        }
        Some(Value::String(s)) if is_iso_date(s) => Some(s.clone()),
        Some(Value::Null) => {
            record(errors, "founded_at", "The founded at field is required.".into());
            None
        }
        Some(_) => {
            record(
                errors,
                "founded_at",
                "The founded at field must match the format Y-m-d.".into(),
            );
            None
        }
    }
}

/// Strict zero-padded `YYYY-MM-DD`, and the date must actually exist.
fn is_iso_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    if !bytes
        .iter()
        .enumerate()
        .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit())
    {
        return false;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
