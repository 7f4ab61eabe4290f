//! Time-bounded memoization of directed currency-pair rates

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use super::RATE_CACHE;
use crate::api::pair_key;
use crate::error::Result;
use crate::store::{Database, TransactionMode};

/// Default freshness window: 60 minutes
pub const DEFAULT_RATE_TTL_MINUTES: u32 = 60;

/// A cached rate, as stored in the `rate-cache` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRecord {
    /// Directed pair, e.g. `USD_EUR`
    pub key: String,
    pub currency_value: f64,
    pub date_updated: DateTime<Utc>,
}

impl RateRecord {
    /// Fresh while `now` has not passed `date_updated + ttl`
    pub fn is_fresh_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now <= self.date_updated + ttl
    }
}

/// Outcome of a cache lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateLookup {
    Fresh(f64),
    Stale(f64),
    Missing,
}

/// Rate cache over the `rate-cache` collection
#[derive(Debug, Clone)]
pub struct RateCache {
    db: Database,
    ttl: Duration,
}

impl RateCache {
    /// Create a rate cache with the default 60 minute window
    pub fn new(db: Database) -> Self {
        Self::with_ttl(db, DEFAULT_RATE_TTL_MINUTES)
    }

    /// Create with custom window
    pub fn with_ttl(db: Database, ttl_minutes: u32) -> Self {
        Self {
            db,
            ttl: Duration::minutes(i64::from(ttl_minutes)),
        }
    }

    /// Freshness window
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up the rate for `from` → `to` against the current time
    pub fn lookup(&self, from: &str, to: &str) -> Result<RateLookup> {
        self.lookup_at(from, to, Utc::now())
    }

    /// Look up the rate for `from` → `to` as of `now`
    pub fn lookup_at(&self, from: &str, to: &str, now: DateTime<Utc>) -> Result<RateLookup> {
        let key = pair_key(from, to);
        let tx = self.db.transaction(RATE_CACHE, TransactionMode::ReadOnly)?;

        let record: Option<RateRecord> = tx.get(key.as_str())?;

        let lookup = match record {
            Some(record) if record.is_fresh_at(now, self.ttl) => {
                RateLookup::Fresh(record.currency_value)
            }
            Some(record) => RateLookup::Stale(record.currency_value),
            None => RateLookup::Missing,
        };

        debug!("rate cache {key}: {lookup:?}");
        Ok(lookup)
    }

    /// Store `value` for `from` → `to`, stamped with the current time
    pub fn record(&self, from: &str, to: &str, value: f64) -> Result<()> {
        self.record_at(from, to, value, Utc::now())
    }

    /// Store `value` for `from` → `to`, stamped with `now`.
    ///
    /// Replaces any previous entry for the same ordered pair.
    pub fn record_at(&self, from: &str, to: &str, value: f64, now: DateTime<Utc>) -> Result<()> {
        let record = RateRecord {
            key: pair_key(from, to),
            currency_value: value,
            date_updated: now,
        };

        let mut tx = self.db.transaction(RATE_CACHE, TransactionMode::ReadWrite)?;
        tx.put(&record)?;
        tx.commit()
    }

    /// Every cached rate, fresh or not
    pub fn entries(&self) -> Result<Vec<RateRecord>> {
        self.db
            .transaction(RATE_CACHE, TransactionMode::ReadOnly)?
            .get_all()
    }
}
