use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Currency converter backed by a local rate cache
#[derive(Parser)]
#[command(name = "rateport")]
#[command(version, propagate_version = true)]
#[command(about = "Currency converter backed by a local rate cache")]
pub struct Cli {
    /// Output format for command results (defaults to output.format from config)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Bypass the local cache for this run
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// API key (overrides the config file)
    #[arg(long, env = "RATEPORT_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Output format: the flag wins, then the config file's `output.format`
    pub fn format(&self, configured: &str) -> OutputFormat {
        self.output
            .or_else(|| OutputFormat::from_str(configured, true).ok())
            .unwrap_or_default()
    }

    /// Log level implied by -v / -q
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    /// Write shell completions to stdout
    pub fn print_completions(shell: Shell) {
        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    }
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, human-readable output
    #[default]
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List selectable currencies
    #[command(alias = "c")]
    Countries(CountriesArgs),

    /// Convert an amount between two currencies
    Convert(ConvertArgs),

    /// Start an interactive conversion session
    #[command(alias = "i")]
    Interactive,

    /// Manage local cache
    Cache(CacheArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the countries command
#[derive(Args)]
pub struct CountriesArgs {
    /// Filter by currency id or name
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Arguments for the convert command
#[derive(Args)]
pub struct ConvertArgs {
    /// Source currency id (e.g. USD)
    pub from: String,

    /// Target currency id (e.g. EUR)
    pub to: String,

    /// Amount in the source currency
    #[arg(conflicts_with = "target")]
    pub amount: Option<f64>,

    /// Amount in the target currency; converts backwards
    #[arg(short, long)]
    pub target: Option<f64>,
}

/// Arguments for the cache command
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

/// Cache subcommands
#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show cached rates and countries
    Status,
    /// Remove all cached data
    Clear,
}

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., api.key)
        key: String,
        /// Value to set
        value: String,
    },
    /// Show configuration file path
    Path,
    /// Initialize configuration interactively
    Init,
}

/// Arguments for the completions command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
