use colored::Colorize;

use crate::api::Country;
use crate::cache::CacheStatus;
use crate::converter::{Conversion, RateOrigin, Side};

fn origin_label(origin: RateOrigin) -> colored::ColoredString {
    match origin {
        RateOrigin::Cache => "cached".green(),
        RateOrigin::Network => "live".cyan(),
    }
}

/// Format age in human-readable form
pub fn format_age(secs: i64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Format the currency list for pretty output
pub fn format_countries(countries: &[Country], origin: RateOrigin) -> String {
    if countries.is_empty() {
        return "No currencies found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{} [{}]\n",
        "Currencies".bold(),
        origin_label(origin)
    ));
    output.push_str(&"─".repeat(50));
    output.push('\n');

    for country in countries {
        output.push_str(&format!(
            "{:<5} {}\n",
            country.currency_id.bold(),
            country.currency_name
        ));
    }

    output.push_str(&format!("\n{} currencies", countries.len()).dimmed().to_string());
    output
}

/// Format a conversion for pretty output
pub fn format_conversion(conversion: &Conversion) -> String {
    let from = format!("{} {}", conversion.from_amount, conversion.from);
    let to = format!("{} {}", conversion.to_amount, conversion.to);

    // The edited amount is what the user typed; highlight the computed one
    let line = match conversion.last_edited {
        Side::From => format!("{} = {}", from, to.bold()),
        Side::To => format!("{} = {}", from.bold(), to),
    };

    format!(
        "{}\n{} 1 {} = {} {} [{}]",
        line,
        "Rate:".cyan(),
        conversion.from,
        conversion.rate,
        conversion.to,
        origin_label(conversion.origin)
    )
}

/// Format cache status for pretty output
pub fn format_cache_status(status: &CacheStatus, location: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", "Cache Status".bold()));
    output.push_str(&format!("Location: {}\n", location));
    output.push_str(&format!(
        "Schema: v{}, rates fresh for {} minutes\n\n",
        status.schema_version, status.ttl_minutes
    ));

    output.push_str(&"Countries:\n".dimmed().to_string());
    if status.countries > 0 {
        output.push_str(&format!("  Entries: {}\n", status.countries));
    } else {
        output.push_str(&format!("  {}\n", "Not cached".dimmed()));
    }

    output.push_str(&"\nRates:\n".dimmed().to_string());
    if status.rates.is_empty() {
        output.push_str(&format!("  {}\n", "Not cached".dimmed()));
    }
    for rate in &status.rates {
        let freshness = if rate.fresh {
            "(fresh)".green()
        } else {
            "(stale)".yellow()
        };
        output.push_str(&format!(
            "  {:<8} {:<12} {} {}\n",
            rate.key,
            rate.value,
            format_age(rate.age_secs),
            freshness
        ));
    }

    output.trim_end().to_string()
}
