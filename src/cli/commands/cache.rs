//! Cache management commands

use colored::Colorize;

use crate::cache::{self, CountryDirectory, RateCache};
use crate::cli::args::{CacheArgs, CacheCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::Result;
use crate::output;

/// Handle cache commands
pub fn cache(config: &Config, args: &CacheArgs, format: OutputFormat) -> Result<String> {
    let paths = Paths::new()?;

    match &args.command {
        CacheCommands::Status => status(config, &paths, format),
        CacheCommands::Clear => clear(&paths, format),
    }
}

fn status(config: &Config, paths: &Paths, format: OutputFormat) -> Result<String> {
    let db = cache::open_store(&paths.data_dir)?;
    let rates = RateCache::with_ttl(db.clone(), config.cache.rate_ttl_minutes);
    let countries = CountryDirectory::new(db);

    let status = cache::status(&rates, &countries)?;
    let location = paths.data_dir.join(cache::DATABASE_NAME);

    output::format_cache_status(&status, &location.display().to_string(), format)
}

fn clear(paths: &Paths, format: OutputFormat) -> Result<String> {
    cache::clear_all(&paths.data_dir)?;

    match format {
        OutputFormat::Pretty => Ok(format!("{} Cache cleared", "✓".green())),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "status": "cleared"
            });
            Ok(serde_json::to_string_pretty(&json)?)
        }
    }
}
