//! Query types for paginated listing: sort keys, sort order, and the
//! page request/result shapes.

use std::cmp::Ordering;

use serde::Serialize;

use crate::city::City;

/// The fields a listing can be sorted by.
///
/// Sort keys arrive as free-form strings from the query string; unknown
/// names fall back to `FoundedAt` rather than erroring, matching the
/// original dynamic-field lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Country,
    Population,
    FoundedAt,
    Id,
}

impl SortKey {
    /// Map an accepted sort-key name to a key; anything unrecognized is
    /// `FoundedAt`.
    pub fn parse(name: &str) -> Self {
        match name {
            "name" => SortKey::Name,
            "country" => SortKey::Country,
            "population" => SortKey::Population,
            "founded_at" => SortKey::FoundedAt,
            "id" => SortKey::Id,
            _ => SortKey::FoundedAt,
        }
    }

    /// Compare two cities by this key.
    ///
    /// `founded_at` compares as a string, which orders correctly because
    /// dates are stored zero-padded ISO `YYYY-MM-DD`.
    pub fn compare(self, a: &City, b: &City) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Country => a.country.cmp(&b.country),
            SortKey::Population => a.population.cmp(&b.population),
            SortKey::FoundedAt => a.founded_at.cmp(&b.founded_at),
            SortKey::Id => a.id.cmp(&b.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// `"desc"` means descending; any other value means ascending.
    pub fn parse(order: &str) -> Self {
        if order == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

/// Parameters for one page of the listing.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
    pub search: Option<String>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<City>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: usize,
    pub per_page: usize,
    /// Count after search filtering, before slicing.
    pub total: usize,
    /// `ceil(total / per_page)`.
    pub last_page: usize,
}
