mod error;
mod query;
mod repository;

pub use error::RepositoryError;
pub use query::{Page, PageMeta, PageRequest, SortKey, SortOrder};
pub use repository::CityRepository;
