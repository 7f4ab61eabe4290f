//! Conversion orchestration
//!
//! [`Converter`] owns the selection state and ties currency selection and
//! amount entry to the caches and the API client:
//!
//! - a completed pair is resolved once: fresh cached rate, otherwise a fetch
//!   that is then recorded;
//! - amount entry converts from the side edited last, without touching the
//!   cache or the network;
//! - a failed fetch leaves the converter retryable on the next input.

use log::{debug, info, warn};
use serde::Serialize;

use crate::api::{Country, CurrencyClient};
use crate::cache::{CountryDirectory, RateCache, RateLookup};
use crate::error::{ConverterError, Result};

/// Which amount field the user edited last
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    From,
    To,
}

/// Where a rate or country list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateOrigin {
    Cache,
    Network,
}

/// Lifecycle of a pair selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConverterState {
    /// No pair fully selected
    Idle,
    /// Both currencies chosen, resolution not started
    PairSelected,
    /// Consulting the cache or the API
    Resolving,
    /// Rate known, amounts convert locally
    Ready,
    /// Last resolution failed. Inputs report disabled, but an amount
    /// entered anyway retries the pair first.
    Failed,
}

/// A resolved rate for the selected pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    pub rate: f64,
    pub origin: RateOrigin,
}

/// Countries offered for selection
#[derive(Debug, Clone, Serialize)]
pub struct CountryListing {
    pub countries: Vec<Country>,
    pub origin: RateOrigin,
}

/// Displayed state of a conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub origin: RateOrigin,
    pub from_amount: f64,
    pub to_amount: f64,
    pub last_edited: Side,
}

/// Selection made by the user
#[derive(Debug, Clone, Default)]
struct Selection {
    from: Option<String>,
    to: Option<String>,
    last_edited: Side,
    /// Pair that last triggered a resolution
    triggered: Option<(String, String)>,
}

impl Selection {
    fn pair(&self) -> Option<(String, String)> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Some((from.clone(), to.clone())),
            _ => None,
        }
    }
}

/// Currency converter session
pub struct Converter<'a> {
    client: &'a CurrencyClient,
    rates: Option<RateCache>,
    countries: Option<CountryDirectory>,
    selection: Selection,
    state: ConverterState,
    resolution: Option<Resolution>,
    from_amount: f64,
    to_amount: f64,
}

impl<'a> Converter<'a> {
    /// Create a converter backed by the local caches
    pub fn new(client: &'a CurrencyClient, rates: RateCache, countries: CountryDirectory) -> Self {
        Self::build(client, Some(rates), Some(countries))
    }

    /// Create a converter that always goes to the network
    pub fn without_cache(client: &'a CurrencyClient) -> Self {
        Self::build(client, None, None)
    }

    fn build(
        client: &'a CurrencyClient,
        rates: Option<RateCache>,
        countries: Option<CountryDirectory>,
    ) -> Self {
        Self {
            client,
            rates,
            countries,
            selection: Selection::default(),
            state: ConverterState::Idle,
            resolution: None,
            from_amount: 0.0,
            to_amount: 0.0,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConverterState {
        self.state
    }

    /// Whether the amount inputs are enabled: only once a pair has resolved
    pub fn inputs_enabled(&self) -> bool {
        self.state == ConverterState::Ready
    }

    /// Whether the local caches are in use
    pub fn is_cached(&self) -> bool {
        self.rates.is_some()
    }

    pub fn selected_from(&self) -> Option<&str> {
        self.selection.from.as_deref()
    }

    pub fn selected_to(&self) -> Option<&str> {
        self.selection.to.as_deref()
    }

    /// Rate currently applied to amounts
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Countries to offer for selection, from cache or freshly fetched.
    ///
    /// A non-empty cached list is used as is; otherwise the list is fetched
    /// and saved for next time.
    pub fn load_countries(&self) -> Result<CountryListing> {
        if let Some(ref directory) = self.countries {
            match directory.load() {
                Ok(countries) if !countries.is_empty() => {
                    debug!("using {} cached countries", countries.len());
                    return Ok(CountryListing {
                        countries,
                        origin: RateOrigin::Cache,
                    });
                }
                Ok(_) => debug!("country cache empty"),
                Err(e) => warn!("country cache unreadable, fetching instead: {e}"),
            }
        }

        let countries = self.client.fetch_countries()?;
        if let Some(ref directory) = self.countries {
            if let Err(e) = directory.save(&countries) {
                warn!("could not cache country list: {e}");
            }
        }

        Ok(CountryListing {
            countries,
            origin: RateOrigin::Network,
        })
    }

    /// Choose the source currency
    pub fn select_from(&mut self, currency_id: &str) -> Result<Option<Conversion>> {
        self.selection.from = Some(currency_id.to_string());
        self.on_selection()
    }

    /// Choose the target currency
    pub fn select_to(&mut self, currency_id: &str) -> Result<Option<Conversion>> {
        self.selection.to = Some(currency_id.to_string());
        self.on_selection()
    }

    /// Enter an amount in the "from" field; converts into the "to" field
    pub fn input_from(&mut self, amount: f64) -> Result<Conversion> {
        self.selection.last_edited = Side::From;
        self.from_amount = amount;
        self.on_input()
    }

    /// Enter an amount in the "to" field; converts back into the "from" field
    pub fn input_to(&mut self, amount: f64) -> Result<Conversion> {
        self.selection.last_edited = Side::To;
        self.to_amount = amount;
        self.on_input()
    }

    /// Current conversion, if a rate has been resolved
    pub fn conversion(&self) -> Option<Conversion> {
        let resolution = self.resolution?;
        let (from, to) = self.selection.triggered.clone()?;
        Some(Conversion {
            from,
            to,
            rate: resolution.rate,
            origin: resolution.origin,
            from_amount: self.from_amount,
            to_amount: self.to_amount,
            last_edited: self.selection.last_edited,
        })
    }

    fn on_selection(&mut self) -> Result<Option<Conversion>> {
        let Some(pair) = self.selection.pair() else {
            return Ok(None);
        };

        if self.selection.triggered.as_ref() == Some(&pair) {
            debug!("pair {}_{} already resolved", pair.0, pair.1);
            return Ok(None);
        }

        self.selection.triggered = Some(pair);
        self.state = ConverterState::PairSelected;
        self.resolve().map(Some)
    }

    fn on_input(&mut self) -> Result<Conversion> {
        match self.state {
            ConverterState::Ready => {}
            ConverterState::Failed => {
                // Retry the pair that failed before converting
                self.selection.triggered = None;
                self.on_selection()?;
            }
            _ => return Err(ConverterError::InputDisabled),
        }

        self.apply();
        self.conversion().ok_or(ConverterError::InputDisabled)
    }

    fn resolve(&mut self) -> Result<Conversion> {
        let (from, to) = self
            .selection
            .triggered
            .clone()
            .ok_or(ConverterError::InputDisabled)?;
        self.state = ConverterState::Resolving;

        match self.resolve_rate(&from, &to) {
            Ok(resolution) => {
                self.resolution = Some(resolution);
                self.state = ConverterState::Ready;
                self.apply();
                self.conversion().ok_or(ConverterError::InputDisabled)
            }
            Err(e) => {
                warn!("resolving {from}_{to} failed: {e}");
                self.resolution = None;
                self.state = ConverterState::Failed;
                self.selection.triggered = None;
                Err(e)
            }
        }
    }

    fn resolve_rate(&self, from: &str, to: &str) -> Result<Resolution> {
        if let Some(ref rates) = self.rates {
            match rates.lookup(from, to) {
                Ok(RateLookup::Fresh(rate)) => {
                    info!("cache hit {from}_{to} = {rate}");
                    return Ok(Resolution {
                        rate,
                        origin: RateOrigin::Cache,
                    });
                }
                Ok(RateLookup::Stale(rate)) => info!("cached {from}_{to} = {rate} is stale"),
                Ok(RateLookup::Missing) => info!("cache miss {from}_{to}"),
                Err(e) => warn!("rate cache unreadable, fetching instead: {e}"),
            }
        }

        let rate = self.client.fetch_rate(from, to)?;
        if let Some(ref rates) = self.rates {
            if let Err(e) = rates.record(from, to, rate) {
                warn!("could not cache {from}_{to}: {e}");
            }
        }

        Ok(Resolution {
            rate,
            origin: RateOrigin::Network,
        })
    }

    /// Recompute the field opposite the one edited last
    fn apply(&mut self) {
        let Some(Resolution { rate, .. }) = self.resolution else {
            return;
        };
        match self.selection.last_edited {
            Side::From => self.to_amount = self.from_amount * rate,
            Side::To => self.from_amount = self.to_amount / rate,
        }
    }
}
