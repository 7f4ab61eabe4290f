//! Cache module for reducing API calls
//!
//! Both caches live in one versioned local store: the country list in
//! `countries` and pairwise rates in `rate-cache`.

mod countries;
mod rates;

pub use countries::CountryDirectory;
pub use rates::{RateCache, RateLookup, RateRecord, DEFAULT_RATE_TTL_MINUTES};

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::store::{Database, Migration};

/// Name of the local database
pub const DATABASE_NAME: &str = "keyval-store";

/// Schema version the migrations below bring the store to
pub const SCHEMA_VERSION: u32 = 2;

/// Collection of selectable countries
pub const COUNTRIES: &str = "countries";

/// Collection of cached pair rates
pub const RATE_CACHE: &str = "rate-cache";

/// Schema history, keyed by the version each step upgrades from
pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::create_collection(0, COUNTRIES, "id", true),
        Migration::create_collection(1, RATE_CACHE, "key", false),
    ]
}

/// Open the local store under `data_dir`, migrating it if needed
pub fn open_store(data_dir: &Path) -> Result<Database> {
    Database::open(data_dir, DATABASE_NAME, SCHEMA_VERSION, &migrations())
}

/// Clear all cached data
pub fn clear_all(data_dir: &Path) -> Result<()> {
    let db_dir = data_dir.join(DATABASE_NAME);
    if db_dir.exists() {
        std::fs::remove_dir_all(db_dir)?;
    }
    Ok(())
}

/// Get cache status information
pub fn status(rates: &RateCache, countries: &CountryDirectory) -> Result<CacheStatus> {
    let now = Utc::now();
    let ttl = rates.ttl();

    let mut entries: Vec<RateStatus> = rates
        .entries()?
        .into_iter()
        .map(|record| RateStatus {
            fresh: record.is_fresh_at(now, ttl),
            age_secs: (now - record.date_updated).num_seconds().max(0),
            key: record.key,
            value: record.currency_value,
            updated_at: record.date_updated,
        })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(CacheStatus {
        schema_version: SCHEMA_VERSION,
        ttl_minutes: ttl.num_minutes(),
        countries: countries.count()?,
        rates: entries,
    })
}

/// Overall cache status
#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub schema_version: u32,
    pub ttl_minutes: i64,
    pub countries: usize,
    pub rates: Vec<RateStatus>,
}

/// Status of a single cached rate
#[derive(Debug, Serialize)]
pub struct RateStatus {
    pub key: String,
    pub value: f64,
    pub updated_at: DateTime<Utc>,
    pub age_secs: i64,
    pub fresh: bool,
}
