use crate::cli::args::ConvertArgs;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output;

use super::common::{currency_id, Session};

/// Convert a single amount
pub fn convert(session: &Session, args: &ConvertArgs, format: OutputFormat) -> Result<String> {
    let from = currency_id(&args.from)?;
    let to = currency_id(&args.to)?;

    let mut converter = session.converter();
    converter.select_from(&from)?;
    converter.select_to(&to)?;

    let conversion = match args.target {
        Some(target) => converter.input_to(target)?,
        None => converter.input_from(args.amount.unwrap_or(1.0))?,
    };

    output::format_conversion(&conversion, format)
}
