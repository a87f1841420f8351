//! Storage backend — one JSON file holding the whole collection.
//!
//! Every save re-serializes the entire collection and overwrites the file
//! (wholesale overwrite, no append, no write-ahead log). Loading is
//! best-effort: a missing file is an empty collection, a file that is not a
//! JSON array is an empty collection, and array elements that do not decode
//! as a complete city are dropped rather than failing the whole load.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::city::City;

/// Reads and writes the city collection as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the collection from disk.
    ///
    /// Missing file and malformed content both decode to an empty
    /// collection; individual malformed records are skipped. Only real I/O
    /// failures (permissions and the like) surface as errors.
    pub fn load(&self) -> io::Result<Vec<City>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&json) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "storage file is not a JSON array, treating as empty"
                );
                return Ok(Vec::new());
            }
        };

        let total = values.len();
        let cities: Vec<City> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();

        if cities.len() < total {
            tracing::warn!(
                path = %self.path.display(),
                dropped = total - cities.len(),
                "dropped malformed records during load"
            );
        }

        Ok(cities)
    }

    /// Overwrite the file with the full collection, creating parent
    /// directories as needed.
    pub fn save(&self, cities: &[City]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(cities)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(&self.path, json)
    }
}
