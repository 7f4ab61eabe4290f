//! Line-driven conversion session
//!
//! Mirrors a two-dropdown converter form: pick the two currencies, then type
//! an amount on either side. Errors are reported and the session carries on.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::cli::OutputFormat;
use crate::converter::{Conversion, Converter};
use crate::error::{ConverterError, Result};
use crate::output;

use super::common::{currency_id, currency_options, Session};

const HELP: &str = "\
Commands:
  from ID       choose the currency to convert from
  to ID         choose the currency to convert to
  amount N      amount in the 'from' currency (a bare number works too)
  target N      amount in the 'to' currency
  countries [F] list currencies, optionally filtered
  status        show the current selection
  help          show this help
  quit          leave the session";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
enum Line {
    From(String),
    To(String),
    Amount(f64),
    Target(f64),
    Countries(Option<String>),
    Status,
    Help,
    Quit,
    Empty,
}

/// What the session loop should do after a line
enum Step {
    Print(String),
    Quit,
}

/// Run an interactive session on stdin/stdout
pub fn interactive(session: &Session, format: OutputFormat) -> Result<String> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut converter = session.converter();

    run(&mut converter, stdin.lock(), &mut stdout, format)?;
    Ok(String::new())
}

fn run<R: BufRead, W: Write>(
    converter: &mut Converter<'_>,
    input: R,
    out: &mut W,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Pretty {
        writeln!(out, "{}", "rateport interactive".bold())?;
        writeln!(out, "{}", "Type 'help' for commands, 'quit' to leave.".dimmed())?;
    }

    // Populate the currency list up front, like the form does on load
    match converter.load_countries() {
        Ok(listing) => {
            let count = currency_options(&listing.countries, None).len();
            if format == OutputFormat::Pretty {
                writeln!(out, "{} currencies available", count)?;
            }
        }
        Err(e) => report(out, &e, format)?,
    }

    let mut lines = input.lines();
    loop {
        if format == OutputFormat::Pretty {
            write!(out, "> ")?;
            out.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let step = parse_line(&line).and_then(|parsed| execute(converter, parsed, format));
        match step {
            Ok(Step::Print(text)) => {
                if !text.is_empty() {
                    writeln!(out, "{text}")?;
                }
            }
            Ok(Step::Quit) => break,
            Err(e) => report(out, &e, format)?,
        }
    }

    Ok(())
}

fn report<W: Write>(out: &mut W, err: &ConverterError, format: OutputFormat) -> Result<()> {
    let message = output::error_message(err);
    match format {
        OutputFormat::Pretty => writeln!(out, "{}: {}", "error".red().bold(), message)?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            serde_json::json!({ "error": message })
        )?,
    }
    Ok(())
}

fn parse_line(line: &str) -> Result<Line> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Line::Empty);
    };
    let arg = words.next();

    let parsed = match (command.to_ascii_lowercase().as_str(), arg) {
        ("from", Some(id)) => Line::From(currency_id(id)?),
        ("to", Some(id)) => Line::To(currency_id(id)?),
        ("amount", Some(n)) => Line::Amount(parse_amount(n)?),
        ("target", Some(n)) => Line::Target(parse_amount(n)?),
        ("countries" | "list", filter) => Line::Countries(filter.map(str::to_string)),
        ("status", None) => Line::Status,
        ("help" | "?", None) => Line::Help,
        ("quit" | "exit" | "q", None) => Line::Quit,
        (n, None) if n.parse::<f64>().is_ok() => Line::Amount(parse_amount(n)?),
        (cmd @ ("from" | "to" | "amount" | "target"), None) => {
            return Err(ConverterError::InvalidArgument(format!(
                "'{cmd}' needs an argument"
            )))
        }
        _ => {
            return Err(ConverterError::InvalidArgument(format!(
                "unknown command '{}', try 'help'",
                line.trim()
            )))
        }
    };
    Ok(parsed)
}

fn parse_amount(input: &str) -> Result<f64> {
    input
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ConverterError::InvalidArgument(format!("'{input}' is not an amount")))
}

fn execute(converter: &mut Converter<'_>, line: Line, format: OutputFormat) -> Result<Step> {
    let text = match line {
        Line::From(id) => {
            let conversion = converter.select_from(&id)?;
            selected(converter, conversion, format)?
        }
        Line::To(id) => {
            let conversion = converter.select_to(&id)?;
            selected(converter, conversion, format)?
        }
        Line::Amount(n) => output::format_conversion(&converter.input_from(n)?, format)?,
        Line::Target(n) => output::format_conversion(&converter.input_to(n)?, format)?,
        Line::Countries(filter) => {
            let listing = converter.load_countries()?;
            let options = currency_options(&listing.countries, filter.as_deref());
            output::format_countries(&options, listing.origin, format)?
        }
        Line::Status => status(converter, format)?,
        Line::Help => HELP.to_string(),
        Line::Quit => return Ok(Step::Quit),
        Line::Empty => String::new(),
    };
    Ok(Step::Print(text))
}

/// Output after a selection: the new conversion, or where the selection stands
fn selected(
    converter: &Converter<'_>,
    conversion: Option<Conversion>,
    format: OutputFormat,
) -> Result<String> {
    match conversion {
        Some(ref conversion) => output::format_conversion(conversion, format),
        None => status(converter, format),
    }
}

fn status(converter: &Converter<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let unset = || "(not set)".dimmed().to_string();
            let mut text = String::new();
            text.push_str(&format!(
                "{} {}\n",
                "From:".cyan(),
                converter.selected_from().map(str::to_string).unwrap_or_else(unset)
            ));
            text.push_str(&format!(
                "{} {}\n",
                "To:".cyan(),
                converter.selected_to().map(str::to_string).unwrap_or_else(unset)
            ));
            let inputs = if converter.inputs_enabled() {
                "enabled".green()
            } else {
                "disabled".yellow()
            };
            text.push_str(&format!("{} {}", "Amounts:".cyan(), inputs));
            if let Some(conversion) = converter.conversion() {
                text.push('\n');
                text.push_str(&output::pretty::format_conversion(&conversion));
            }
            Ok(text)
        }
        OutputFormat::Json => output::json::format_json(&serde_json::json!({
            "from": converter.selected_from(),
            "to": converter.selected_to(),
            "state": converter.state(),
            "inputs_enabled": converter.inputs_enabled(),
            "conversion": converter.conversion(),
        })),
    }
}
