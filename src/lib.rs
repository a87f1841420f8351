//! cityd — a REST service exposing CRUD over a single City resource,
//! backed by a JSON file on disk and mirrored in an in-process cache.
//!
//! The repository layer owns all collection semantics (lazy load, cache,
//! wholesale persist, search/sort/paginate); the HTTP layer in [`api`] is a
//! thin boundary that routes, authenticates, validates, and wraps results
//! in the response envelope.

pub mod api;
pub mod city;
pub mod cli;
pub mod repository;
pub mod store;

pub use city::{City, CityInput, CityPatch};
pub use repository::{CityRepository, Page, PageMeta, PageRequest, RepositoryError, SortKey, SortOrder};
pub use store::FileStore;
