//! The city repository — sole owner of the collection.
//!
//! All mutation and query paths pass through `CityRepository`. The
//! collection is loaded lazily from the file store on first access and
//! cached process-wide; every create/update/delete mutates the cached
//! collection and immediately persists the whole thing back to disk
//! (wholesale overwrite), then the cache simply keeps the mutated state.
//!
//! A write lock is held across each read-modify-write sequence, so at most
//! one mutation is in flight at a time. Single-request semantics are
//! unchanged from an unsynchronized design; lost updates between racing
//! requests are not.

use std::sync::RwLock;

use crate::city::{City, CityInput, CityPatch};
use crate::store::FileStore;

use super::error::RepositoryError;
use super::query::{Page, PageMeta, PageRequest, SortOrder};

pub struct CityRepository {
    store: FileStore,
    /// `None` until the first access; `Some` thereafter, even when empty.
    cities: RwLock<Option<Vec<City>>>,
}

impl CityRepository {
    pub fn new(store: FileStore) -> Self {
        Self {
            store,
            cities: RwLock::new(None),
        }
    }

    /// Run `f` against the cached collection, loading it first if this is
    /// the initial access.
    fn read<T>(&self, f: impl FnOnce(&[City]) -> T) -> Result<T, RepositoryError> {
        {
            let guard = self
                .cities
                .read()
                .map_err(|_| RepositoryError::LockPoisoned("read"))?;
            if let Some(cities) = guard.as_ref() {
                return Ok(f(cities));
            }
        }

        let mut guard = self
            .cities
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("load"))?;
        if guard.is_none() {
            *guard = Some(self.store.load()?);
        }
        Ok(f(guard.get_or_insert_with(Vec::new)))
    }

    /// The full collection in insertion order.
    pub fn all(&self) -> Result<Vec<City>, RepositoryError> {
        self.read(|cities| cities.to_vec())
    }

    /// Linear scan for the first record with a matching id. Absence is not
    /// an error.
    pub fn find(&self, id: &str) -> Result<Option<City>, RepositoryError> {
        self.read(|cities| cities.iter().find(|city| city.id == id).cloned())
    }

    /// Append a new record with a freshly generated id and persist.
    pub fn create(&self, input: CityInput) -> Result<City, RepositoryError> {
        let mut guard = self
            .cities
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("create"))?;
        if guard.is_none() {
            *guard = Some(self.store.load()?);
        }
        let cities = guard.get_or_insert_with(Vec::new);

        let city = City::new(input);
        cities.push(city.clone());
        self.store.save(cities)?;

        Ok(city)
    }

    /// Merge a patch onto the record with the given id, keeping it at its
    /// original position, and persist. `None` (and no write) when the id is
    /// unknown.
    pub fn update(&self, id: &str, patch: CityPatch) -> Result<Option<City>, RepositoryError> {
        let mut guard = self
            .cities
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("update"))?;
        if guard.is_none() {
            *guard = Some(self.store.load()?);
        }
        let cities = guard.get_or_insert_with(Vec::new);

        let Some(position) = cities.iter().position(|city| city.id == id) else {
            return Ok(None);
        };

        cities[position].apply(patch);
        self.store.save(cities)?;

        Ok(Some(cities[position].clone()))
    }

    /// Remove the record with the given id and persist. `false` (and no
    /// write) when the id is unknown.
    pub fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut guard = self
            .cities
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("delete"))?;
        if guard.is_none() {
            *guard = Some(self.store.load()?);
        }
        let cities = guard.get_or_insert_with(Vec::new);

        let Some(position) = cities.iter().position(|city| city.id == id) else {
            return Ok(false);
        };

        cities.remove(position);
        self.store.save(cities)?;

        Ok(true)
    }

    /// Filter, sort, and slice the collection into one page.
    ///
    /// Search is a case-insensitive substring match on `name` or `country`
    /// only. The sort is stable, so equal keys retain their input order —
    /// descending order reverses the comparator rather than the result.
    /// Pages past the end yield an empty item list, never an error.
    pub fn paginate(&self, request: &PageRequest) -> Result<Page, RepositoryError> {
        if request.per_page == 0 {
            return Err(RepositoryError::ZeroPerPage);
        }

        self.read(|cities| {
            let mut items: Vec<City> = match request.search.as_deref() {
                Some(search) if !search.is_empty() => {
                    let needle = search.to_lowercase();
                    cities
                        .iter()
                        .filter(|city| {
                            city.name.to_lowercase().contains(&needle)
                                || city.country.to_lowercase().contains(&needle)
                        })
                        .cloned()
                        .collect()
                }
                _ => cities.to_vec(),
            };

            items.sort_by(|a, b| {
                let ordering = request.sort_by.compare(a, b);
                match request.sort_order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });

            let total = items.len();
            // Saturating math: a huge page number is just past the end.
            let start = request
                .page
                .saturating_sub(1)
                .saturating_mul(request.per_page);
            let items: Vec<City> = items
                .into_iter()
                .skip(start)
                .take(request.per_page)
                .collect();

            Page {
                items,
                meta: PageMeta {
                    current_page: request.page,
                    per_page: request.per_page,
                    total,
                    last_page: total.div_ceil(request.per_page),
                },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::SortKey;
    use std::fs;
    use tempfile::TempDir;

    fn test_repo() -> (CityRepository, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let repo = CityRepository::new(FileStore::new(dir.path().join("cities.json")));
        (repo, dir)
    }

    fn input(name: &str, country: &str, population: u64, founded_at: &str) -> CityInput {
        CityInput {
            name: name.into(),
            country: country.into(),
            population,
            founded_at: founded_at.into(),
        }
    }

    fn default_request() -> PageRequest {
        PageRequest {
            page: 1,
            per_page: 15,
            search: None,
            sort_by: SortKey::FoundedAt,
            sort_order: SortOrder::Desc,
        }
    }

    #[test]
    fn all_is_idempotent_without_mutation() {
        let (repo, _dir) = test_repo();
        repo.create(input("Tokyo", "Japan", 14_000_000, "1457-01-01"))
            .unwrap();
        repo.create(input("London", "UK", 9_000_000, "0047-01-01"))
            .unwrap();

        assert_eq!(repo.all().unwrap(), repo.all().unwrap());
    }

    #[test]
    fn create_appends_with_a_fresh_id() {
        let (repo, _dir) = test_repo();
        let first = repo
            .create(input("Tokyo", "Japan", 14_000_000, "1457-01-01"))
            .unwrap();
        let second = repo
            .create(input("London", "UK", 9_000_000, "0047-01-01"))
            .unwrap();

        let all = repo.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_ne!(first.id, second.id);
        assert_eq!(all[1].id, second.id, "new records append at the end");
    }

    #[test]
    fn create_persists_to_disk() {
        let (repo, dir) = test_repo();
        repo.create(input("Tokyo", "Japan", 14_000_000, "1457-01-01"))
            .unwrap();

        // A fresh repository over the same file sees the record.
        let reloaded = CityRepository::new(FileStore::new(dir.path().join("cities.json")));
        assert_eq!(reloaded.all().unwrap().len(), 1);
    }

    #[test]
    fn find_returns_none_for_unknown_id() {
        let (repo, _dir) = test_repo();
        assert!(repo.find("no-such-id").unwrap().is_none());
    }

    #[test]
    fn update_merges_partial_fields_in_place() {
        let (repo, _dir) = test_repo();
        repo.create(input("Tokyo", "Japan", 14_000_000, "1457-01-01"))
            .unwrap();
        let paris = repo
            .create(input("Paris", "France", 2_000_000, "0250-01-01"))
            .unwrap();
        repo.create(input("London", "UK", 9_000_000, "0047-01-01"))
            .unwrap();

        let updated = repo
            .update(
                &paris.id,
                CityPatch {
                    population: Some(2_148_000),
                    ..CityPatch::default()
                },
            )
            .unwrap()
            .expect("record exists");

        assert_eq!(updated.population, 2_148_000);
        assert_eq!(updated.name, "Paris");
        assert_eq!(updated.founded_at, "0250-01-01");

        // Replaced at its original position, not moved.
        let all = repo.all().unwrap();
        assert_eq!(all[1].id, paris.id);
    }

    #[test]
    fn update_unknown_id_is_a_no_op_without_a_write() {
        let (repo, dir) = test_repo();
        repo.create(input("Tokyo", "Japan", 14_000_000, "1457-01-01"))
            .unwrap();
        let before = fs::read_to_string(dir.path().join("cities.json")).unwrap();

        let result = repo
            .update(
                "no-such-id",
                CityPatch {
                    name: Some("Nowhere".into()),
                    ..CityPatch::default()
                },
            )
            .unwrap();

        assert!(result.is_none());
        let after = fs::read_to_string(dir.path().join("cities.json")).unwrap();
        assert_eq!(before, after, "storage must be untouched");
    }

    #[test]
    fn delete_removes_exactly_one_record() {
        let (repo, _dir) = test_repo();
        let tokyo = repo
            .create(input("Tokyo", "Japan", 14_000_000, "1457-01-01"))
            .unwrap();
        repo.create(input("London", "UK", 9_000_000, "0047-01-01"))
            .unwrap();

        assert!(repo.delete(&tokyo.id).unwrap());
        assert_eq!(repo.all().unwrap().len(), 1);
        assert!(repo.find(&tokyo.id).unwrap().is_none());

        assert!(!repo.delete(&tokyo.id).unwrap(), "second delete is a no-op");
        assert_eq!(repo.all().unwrap().len(), 1);
    }

    #[test]
    fn search_is_case_insensitive_on_name_and_country_only() {
        let (repo, _dir) = test_repo();
        repo.create(input("New York", "USA", 8_000_000, "1624-01-01"))
            .unwrap();
        repo.create(input("York", "UK", 200_000, "0071-01-01"))
            .unwrap();
        repo.create(input("Madrid", "Spain", 3_000_000, "0865-01-01"))
            .unwrap();

        let page = repo
            .paginate(&PageRequest {
                search: Some("york".into()),
                ..default_request()
            })
            .unwrap();
        assert_eq!(page.meta.total, 2);
        assert_eq!(page.items.len(), 2);

        // Matches country too, but never other fields.
        let page = repo
            .paginate(&PageRequest {
                search: Some("SPAIN".into()),
                ..default_request()
            })
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Madrid");

        let page = repo
            .paginate(&PageRequest {
                search: Some("1624".into()),
                ..default_request()
            })
            .unwrap();
        assert!(page.items.is_empty(), "search must not match founded_at");
    }

    #[test]
    fn sort_by_population_desc_orders_tokyo_before_london() {
        let (repo, _dir) = test_repo();
        repo.create(input("Tokyo", "Japan", 14_000_000, "1457-01-01"))
            .unwrap();
        repo.create(input("London", "UK", 9_000_000, "0047-01-01"))
            .unwrap();

        let page = repo
            .paginate(&PageRequest {
                sort_by: SortKey::Population,
                sort_order: SortOrder::Desc,
                ..default_request()
            })
            .unwrap();

        assert_eq!(page.items[0].name, "Tokyo");
        assert_eq!(page.items[1].name, "London");
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let (repo, _dir) = test_repo();
        repo.create(input("First", "A", 500, "1000-01-01")).unwrap();
        repo.create(input("Second", "B", 500, "1100-01-01"))
            .unwrap();
        repo.create(input("Third", "C", 500, "1200-01-01")).unwrap();

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let page = repo
                .paginate(&PageRequest {
                    sort_by: SortKey::Population,
                    sort_order: order,
                    ..default_request()
                })
                .unwrap();
            let names: Vec<&str> = page.items.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, ["First", "Second", "Third"]);
        }
    }

    #[test]
    fn string_sort_handles_pre_year_1000_dates() {
        let (repo, _dir) = test_repo();
        repo.create(input("Tokyo", "Japan", 14_000_000, "1457-01-01"))
            .unwrap();
        repo.create(input("London", "UK", 9_000_000, "0047-01-01"))
            .unwrap();

        let page = repo
            .paginate(&PageRequest {
                sort_by: SortKey::FoundedAt,
                sort_order: SortOrder::Asc,
                ..default_request()
            })
            .unwrap();
        assert_eq!(page.items[0].name, "London");
    }

    #[test]
    fn pagination_math_and_out_of_range_pages() {
        let (repo, _dir) = test_repo();
        for i in 0..7 {
            repo.create(input(&format!("City {i}"), "X", i, "1500-01-01"))
                .unwrap();
        }

        let page = repo
            .paginate(&PageRequest {
                per_page: 3,
                page: 3,
                sort_by: SortKey::Population,
                sort_order: SortOrder::Asc,
                search: None,
            })
            .unwrap();
        assert_eq!(page.meta.total, 7);
        assert_eq!(page.meta.last_page, 3);
        assert_eq!(page.items.len(), 1);

        let past_the_end = repo
            .paginate(&PageRequest {
                per_page: 3,
                page: 9,
                sort_by: SortKey::Population,
                sort_order: SortOrder::Asc,
                search: None,
            })
            .unwrap();
        assert!(past_the_end.items.is_empty());
        assert_eq!(past_the_end.meta.total, 7, "total is unaffected by the slice");
    }

    #[test]
    fn huge_page_numbers_yield_an_empty_page_without_overflow() {
        let (repo, _dir) = test_repo();
        repo.create(input("Tokyo", "Japan", 14_000_000, "1457-01-01"))
            .unwrap();

        // (page - 1) * per_page would overflow usize without saturation.
        for page in [usize::MAX, i64::MAX as usize, usize::MAX / 15 + 2] {
            let result = repo
                .paginate(&PageRequest {
                    page,
                    ..default_request()
                })
                .unwrap();
            assert!(result.items.is_empty());
            assert_eq!(result.meta.total, 1);
            assert_eq!(result.meta.current_page, page);
        }
    }

    #[test]
    fn zero_per_page_is_rejected() {
        let (repo, _dir) = test_repo();
        let result = repo.paginate(&PageRequest {
            per_page: 0,
            ..default_request()
        });
        assert!(matches!(result, Err(RepositoryError::ZeroPerPage)));
    }

    #[test]
    fn unknown_sort_key_falls_back_to_founded_at() {
        assert_eq!(SortKey::parse("elevation"), SortKey::FoundedAt);
        assert_eq!(SortKey::parse("name"), SortKey::Name);
    }

    #[test]
    fn sort_order_defaults_to_ascending() {
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("DESC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse(""), SortOrder::Asc);
    }
}
