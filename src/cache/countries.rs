//! Cached country/currency list

use log::debug;

use super::COUNTRIES;
use crate::api::Country;
use crate::error::Result;
use crate::store::{Database, TransactionMode};

/// Country directory over the `countries` collection
#[derive(Debug, Clone)]
pub struct CountryDirectory {
    db: Database,
}

impl CountryDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All stored countries, ordered by surrogate id
    pub fn load(&self) -> Result<Vec<Country>> {
        let tx = self.db.transaction(COUNTRIES, TransactionMode::ReadOnly)?;
        let mut countries: Vec<Country> = tx.get_all()?;
        countries.sort_by_key(|country| country.id);
        Ok(countries)
    }

    /// Upsert every country in one transaction.
    ///
    /// Existing records are kept; countries without an id get a new one.
    pub fn save(&self, countries: &[Country]) -> Result<()> {
        let mut tx = self.db.transaction(COUNTRIES, TransactionMode::ReadWrite)?;
        for country in countries {
            tx.put(country)?;
        }
        tx.commit()?;
        debug!("saved {} countries", countries.len());
        Ok(())
    }

    /// Number of stored countries
    pub fn count(&self) -> Result<usize> {
        Ok(self
            .db
            .transaction(COUNTRIES, TransactionMode::ReadOnly)?
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::open_store;
    use tempfile::TempDir;

    fn create_test_directory() -> (CountryDirectory, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = open_store(temp_dir.path()).unwrap();
        (CountryDirectory::new(db), temp_dir)
    }

    fn sample() -> Vec<Country> {
        vec![
            Country::new("USD", "United States dollar"),
            Country::new("EUR", "Euro"),
        ]
    }

    #[test]
    fn test_load_empty_store() {
        let (directory, _temp_dir) = create_test_directory();
        assert!(directory.load().unwrap().is_empty());
        assert_eq!(directory.count().unwrap(), 0);
    }

    #[test]
    fn test_save_assigns_surrogate_ids() {
        let (directory, _temp_dir) = create_test_directory();
        directory.save(&sample()).unwrap();

        let loaded = directory.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, Some(1));
        assert_eq!(loaded[0].currency_id, "USD");
        assert_eq!(loaded[1].id, Some(2));
        assert_eq!(loaded[1].currency_name, "Euro");
    }

    #[test]
    fn test_save_appends_rather_than_replaces() {
        let (directory, _temp_dir) = create_test_directory();
        directory.save(&sample()).unwrap();
        directory.save(&sample()).unwrap();

        let loaded = directory.load().unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(
            loaded.iter().filter(|c| c.currency_id == "USD").count(),
            2
        );
    }

    #[test]
    fn test_save_with_existing_id_overwrites() {
        let (directory, _temp_dir) = create_test_directory();
        directory.save(&sample()).unwrap();

        let mut loaded = directory.load().unwrap();
        loaded[0].currency_name = "US Dollar".to_string();
        directory.save(&loaded[..1]).unwrap();

        let reloaded = directory.load().unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[0].currency_name, "US Dollar");
    }

    #[test]
    fn test_load_orders_by_numeric_id() {
        let (directory, _temp_dir) = create_test_directory();
        let many: Vec<Country> = (0..12)
            .map(|i| Country::new(format!("C{i:02}"), format!("Currency {i}")))
            .collect();
        directory.save(&many).unwrap();

        let ids: Vec<u64> = directory
            .load()
            .unwrap()
            .iter()
            .filter_map(|c| c.id)
            .collect();
        assert_eq!(ids, (1..=12).collect::<Vec<u64>>());
    }
}
