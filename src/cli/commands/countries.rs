use crate::cli::args::CountriesArgs;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output;

use super::common::{currency_options, Session};

/// List selectable currencies
pub fn countries(session: &Session, args: &CountriesArgs, format: OutputFormat) -> Result<String> {
    let listing = session.converter().load_countries()?;
    let options = currency_options(&listing.countries, args.filter.as_deref());

    output::format_countries(&options, listing.origin, format)
}
