//! The City entity and its input shapes.
//!
//! A `City` is a plain record: no computed fields, no behavior beyond
//! construction and (de)serialization. The serde derives give the
//! dictionary round-trip — a stored record missing a required field fails
//! to deserialize, which is how malformed records get dropped on load.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One city record as stored on disk and returned by the API.
///
/// `id` is assigned at creation and immutable thereafter. The four other
/// fields are always present on a stored record; partial updates merge into
/// a complete prior record and never leave a field unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub country: String,
    pub population: u64,
    /// ISO `YYYY-MM-DD`, zero-padded so years before 1000 sort correctly
    /// as strings (e.g. `0047-01-01`).
    pub founded_at: String,
}

/// The caller-supplied fields for creating a city. The id is always
/// generated server-side; any id in the request body is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityInput {
    pub name: String,
    pub country: String,
    pub population: u64,
    pub founded_at: String,
}

/// A partial update: any subset of the four mutable fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityPatch {
    pub name: Option<String>,
    pub country: Option<String>,
    pub population: Option<u64>,
    pub founded_at: Option<String>,
}

impl City {
    /// Build a new city from validated input, assigning a fresh id.
    pub fn new(input: CityInput) -> Self {
        Self {
            id: new_id(),
            name: input.name,
            country: input.country,
            population: input.population,
            founded_at: input.founded_at,
        }
    }

    /// Merge a patch onto this record: present fields override, everything
    /// else (including the id) is retained.
    pub fn apply(&mut self, patch: CityPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(population) = patch.population {
            self.population = population;
        }
        if let Some(founded_at) = patch.founded_at {
            self.founded_at = founded_at;
        }
    }
}

/// Generate a random 128-bit identifier.
///
/// Uniqueness is probabilistic, not coordinated — two processes writing the
/// same file can in principle collide, same as the original design.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
