use serde::Serialize;

use crate::api::Country;
use crate::cache::CacheStatus;
use crate::converter::{Conversion, RateOrigin};
use crate::error::Result;

/// Format currencies as JSON
pub fn format_countries(countries: &[Country], origin: RateOrigin) -> Result<String> {
    format_json(&serde_json::json!({
        "origin": origin,
        "countries": countries,
    }))
}

/// Format a conversion as JSON
pub fn format_conversion(conversion: &Conversion) -> Result<String> {
    format_json(conversion)
}

/// Format cache status as JSON
pub fn format_cache_status(status: &CacheStatus, location: &str) -> Result<String> {
    format_json(&serde_json::json!({
        "location": location,
        "schema_version": status.schema_version,
        "ttl_minutes": status.ttl_minutes,
        "countries": status.countries,
        "rates": status.rates,
    }))
}

/// Format any serializable value as JSON
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
