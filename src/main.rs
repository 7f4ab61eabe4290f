use clap::Parser;
use colored::{control::set_override, Colorize};
use is_terminal::IsTerminal;
use log::info;

use rateport::cli::args::{Cli, Commands, CompletionsArgs};
use rateport::cli::commands::{self, Session};
use rateport::config::{Config, Paths};
use rateport::error::ConverterError;
use rateport::output;

fn main() {
    // Respect NO_COLOR environment variable (https://no-color.org/)
    // Also disable colors when stdout is not a terminal (for piping)
    if std::env::var("NO_COLOR").is_ok() || !std::io::stdout().is_terminal() {
        set_override(false);
    }

    if let Err(e) = run() {
        if e.is_network() {
            info!("{e}");
        }
        eprintln!("{}: {}", "error".red().bold(), output::error_message(&e));
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), ConverterError> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    // Handle completions command early (no config or client needed)
    if let Commands::Completions(CompletionsArgs { shell }) = &cli.command {
        Cli::print_completions(*shell);
        return Ok(());
    }

    let paths = Paths::new()?;
    let mut config = Config::load_from(&paths)?;
    let format = cli.format(&config.output.format);

    let output = match &cli.command {
        Commands::Completions(_) => unreachable!(), // Handled above
        Commands::Config(args) => commands::config(&mut config, args, format)?,
        Commands::Cache(args) => commands::cache(&config, args, format)?,

        // Everything else converts, so it needs the client and caches
        _ => {
            if let Some(ref key) = cli.api_key {
                config.api.key = Some(key.clone());
            }
            let session = Session::new(&config, &paths, cli.no_cache)?;

            match &cli.command {
                Commands::Countries(args) => commands::countries(&session, args, format)?,
                Commands::Convert(args) => commands::convert(&session, args, format)?,
                Commands::Interactive => commands::interactive(&session, format)?,
                Commands::Config(_) | Commands::Cache(_) | Commands::Completions(_) => {
                    unreachable!()
                }
            }
        }
    };

    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
