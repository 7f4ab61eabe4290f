use colored::Colorize;

use crate::cli::args::{ConfigArgs, ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::{ConverterError, Result};

/// Handle the config command
pub fn config(config: &mut Config, args: &ConfigArgs, format: OutputFormat) -> Result<String> {
    match &args.command {
        ConfigCommands::Show => config_show(config, format),
        ConfigCommands::Set { key, value } => config_set(config, key, value, format),
        ConfigCommands::Path => config_path(format),
        ConfigCommands::Init => config_init(config, format),
    }
}

/// Mask all but the ends of a secret
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

/// Show current configuration
fn config_show(config: &Config, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("{}\n", "Configuration".bold()));
            output.push_str(&"─".repeat(40));
            output.push('\n');

            output.push_str(&format!("\n{}\n", "[api]".cyan()));
            output.push_str(&format!("  base_url = {}\n", config.api.base_url));
            let key_display = config
                .api
                .key
                .as_deref()
                .map(mask)
                .unwrap_or_else(|| "(not set)".dimmed().to_string());
            output.push_str(&format!("  key = {}\n", key_display));

            output.push_str(&format!("\n{}\n", "[cache]".cyan()));
            output.push_str(&format!("  enabled = {}\n", config.cache.enabled));
            output.push_str(&format!(
                "  rate_ttl_minutes = {}\n",
                config.cache.rate_ttl_minutes
            ));

            output.push_str(&format!("\n{}\n", "[output]".cyan()));
            output.push_str(&format!("  format = {}\n", config.output.format));

            Ok(output)
        }
        OutputFormat::Json => {
            // Don't expose the full key in JSON output either
            let mut safe_config = config.clone();
            safe_config.api.key = safe_config.api.key.as_deref().map(mask);
            Ok(serde_json::to_string_pretty(&safe_config)?)
        }
    }
}

/// Set a configuration value
fn config_set(config: &mut Config, key: &str, value: &str, format: OutputFormat) -> Result<String> {
    config.set_value(key, value)?;
    config.save()?;

    let shown = if key == "api.key" {
        mask(value)
    } else {
        value.to_string()
    };

    match format {
        OutputFormat::Pretty => Ok(format!("{} Set {} = {}", "✓".green(), key, shown)),
        OutputFormat::Json => {
            let result = serde_json::json!({
                "success": true,
                "key": key,
                "value": shown
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

/// Show configuration file path
fn config_path(format: OutputFormat) -> Result<String> {
    let paths = Paths::new()?;

    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("Config file: {}\n", paths.config_file.display()));
            output.push_str(&format!(
                "Exists: {}\n",
                if paths.config_exists() {
                    "yes".green()
                } else {
                    "no".yellow()
                }
            ));
            output.push_str(&format!("Data: {}\n", paths.data_dir.display()));
            Ok(output)
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "path": paths.config_file.display().to_string(),
                "exists": paths.config_exists(),
                "data_dir": paths.data_dir.display().to_string()
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

/// Initialize configuration interactively
fn config_init(config: &mut Config, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Err(ConverterError::InvalidArgument(
            "config init requires interactive mode (--output pretty)".to_string(),
        ));
    }

    println!("{}", "rateport Configuration".bold());
    println!("{}", "─".repeat(40));
    println!();
    println!("The free currency API works without a key; press Enter to skip.");

    let key = rpassword::prompt_password("API key: ")?;
    let key = key.trim();

    if key.is_empty() {
        config.api.key = None;
    } else {
        config.set_key(key.to_string());
    }
    config.save()?;

    let paths = Paths::new()?;

    Ok(format!(
        "\n{} Configuration saved to: {}\n\nRun '{}' to try it out.",
        "✓".green(),
        paths.config_file.display(),
        "rateport convert USD EUR 100".cyan()
    ))
}
