//! Common setup shared by the conversion commands

use log::{info, warn};

use crate::api::{Country, CurrencyClient};
use crate::cache::{self, CountryDirectory, RateCache};
use crate::config::{Config, Paths};
use crate::converter::Converter;
use crate::error::{ConverterError, Result};

/// API client plus the local caches, when usable
pub struct Session {
    client: CurrencyClient,
    caches: Option<(RateCache, CountryDirectory)>,
}

impl Session {
    /// Set up a session, falling back to network-only if the store won't open
    pub fn new(config: &Config, paths: &Paths, no_cache: bool) -> Result<Self> {
        let client = CurrencyClient::new(config)?;

        let caches = if no_cache || !config.cache.enabled {
            info!("local cache disabled");
            None
        } else {
            match open_caches(config, paths) {
                Ok(caches) => Some(caches),
                Err(e) => {
                    warn!("{e}; continuing without local cache");
                    None
                }
            }
        };

        Ok(Self { client, caches })
    }

    /// Fresh converter over this session's client and caches
    pub fn converter(&self) -> Converter<'_> {
        match self.caches {
            Some((ref rates, ref countries)) => {
                Converter::new(&self.client, rates.clone(), countries.clone())
            }
            None => Converter::without_cache(&self.client),
        }
    }
}

fn open_caches(config: &Config, paths: &Paths) -> Result<(RateCache, CountryDirectory)> {
    paths.ensure_dirs().map_err(ConverterError::store_open)?;
    let db = cache::open_store(&paths.data_dir)?;
    Ok((
        RateCache::with_ttl(db.clone(), config.cache.rate_ttl_minutes),
        CountryDirectory::new(db),
    ))
}

/// Normalize a user-typed currency id
pub fn currency_id(input: &str) -> Result<String> {
    let id = input.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConverterError::InvalidArgument(format!(
            "'{}' is not a currency id",
            input
        )));
    }
    Ok(id.to_ascii_uppercase())
}

/// One entry per currency id, sorted by id, optionally filtered by id or name
pub fn currency_options(countries: &[Country], filter: Option<&str>) -> Vec<Country> {
    let needle = filter.map(str::to_lowercase);

    let mut options: Vec<Country> = countries
        .iter()
        .filter(|c| match needle {
            Some(ref needle) => {
                c.currency_id.to_lowercase().contains(needle)
                    || c.currency_name.to_lowercase().contains(needle)
            }
            None => true,
        })
        .cloned()
        .collect();

    options.sort_by(|a, b| a.currency_id.cmp(&b.currency_id));
    options.dedup_by(|a, b| a.currency_id == b.currency_id);
    options
}
