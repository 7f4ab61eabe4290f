pub mod json;
pub mod pretty;

use crate::api::Country;
use crate::cache::CacheStatus;
use crate::cli::OutputFormat;
use crate::converter::{Conversion, RateOrigin};
use crate::error::{ConverterError, Result};

/// Shown whenever the currency API cannot be reached or answers badly
pub const CONNECTION_ALERT: &str = "Sorry, a connection issue has occurred. Please try again later.";

/// User-facing message for an error
pub fn error_message(err: &ConverterError) -> String {
    if err.is_network() {
        CONNECTION_ALERT.to_string()
    } else {
        err.to_string()
    }
}

/// Format the selectable currencies based on output format
pub fn format_countries(
    countries: &[Country],
    origin: RateOrigin,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_countries(countries, origin)),
        OutputFormat::Json => json::format_countries(countries, origin),
    }
}

/// Format a conversion based on output format
pub fn format_conversion(conversion: &Conversion, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_conversion(conversion)),
        OutputFormat::Json => json::format_conversion(conversion),
    }
}

/// Format cache status based on output format
pub fn format_cache_status(
    status: &CacheStatus,
    location: &str,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_cache_status(status, location)),
        OutputFormat::Json => json::format_cache_status(status, location),
    }
}
