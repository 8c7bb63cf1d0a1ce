//! `hackreg config` command - Configuration management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::helpers::load_config;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::LOCAL_CONFIG_FILE;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("api_url", "Base URL of the registration API"),
    ("timeout_secs", "HTTP timeout in seconds"),
    ("offline", "Use the built-in offline backend (true/false)"),
    ("event_name", "Event name shown in confirmations"),
    ("community_url", "Community link shown after registering"),
];

/// Effective values, after defaults are applied
#[derive(Debug, Serialize)]
struct EffectiveConfig {
    api_url: String,
    timeout_secs: Option<u64>,
    offline: bool,
    event_name: String,
    community_url: Option<String>,
}

impl From<&Config> for EffectiveConfig {
    fn from(config: &Config) -> Self {
        Self {
            api_url: config.api_url(),
            timeout_secs: config.timeout_secs,
            offline: config.offline(),
            event_name: config.event_name(),
            community_url: config.community_url(),
        }
    }
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);

    if let Some(key) = &args.key {
        return match get_config_value(&config, key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None if is_valid_key(key) => Err(miette::miette!("Key '{}' is not set", key)),
            None => Err(miette::miette!(
                help = "Run `hackreg config keys` to list the valid keys",
                "Unknown key '{}'",
                key
            )),
        };
    }

    let effective = EffectiveConfig::from(&config);
    if global.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&effective).into_diagnostic()?);
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    print_config_value("api_url", Some(&effective.api_url));
    print_config_value("timeout_secs", effective.timeout_secs.map(|t| t.to_string()).as_deref());
    print_config_value("offline", Some(&effective.offline.to_string()));
    print_config_value("event_name", Some(&effective.event_name));
    print_config_value("community_url", effective.community_url.as_deref());

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags (--offline)");
    println!("  2. Environment variables (HACKREG_API_URL, HACKREG_TIMEOUT_SECS, HACKREG_OFFLINE)");
    println!("  3. Local config (./{} or --config)", LOCAL_CONFIG_FILE);
    println!("  4. Global config (~/.config/hackreg/config.yaml)");

    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    let local = global
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));

    match Config::global_config_path() {
        Some(path) => print_path("Global", &path),
        None => println!("{}: {}", style("Global").bold(), style("(unavailable)").dim()),
    }
    print_path("Local", &local);
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available Configuration Keys").bold().underlined());
    println!();
    for (key, description) in VALID_KEYS {
        println!("  {:<15} {}", style(key).cyan(), description);
    }
    Ok(())
}

fn is_valid_key(key: &str) -> bool {
    VALID_KEYS.iter().any(|(k, _)| *k == key)
}

/// Explicitly set value for a key (defaults are not reported)
fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "api_url" => config.api_url.clone(),
        "timeout_secs" => config.timeout_secs.map(|t| t.to_string()),
        "offline" => config.offline.map(|o| o.to_string()),
        "event_name" => config.event_name.clone(),
        "community_url" => config.community_url.clone(),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("  {:<15} {}", style(key).cyan(), v),
        None => println!("  {:<15} {}", style(key).cyan(), style("(not set)").dim()),
    }
}

fn print_path(label: &str, path: &Path) {
    let status = if path.exists() {
        style("exists").green()
    } else {
        style("not found").dim()
    };
    println!("{}: {} ({})", style(label).bold(), path.display(), status);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_value_only_reports_set_keys() {
        let config = Config {
            api_url: Some("https://api.example.com".into()),
            offline: Some(false),
            ..Config::default()
        };
        assert_eq!(get_config_value(&config, "api_url").as_deref(), Some("https://api.example.com"));
        assert_eq!(get_config_value(&config, "offline").as_deref(), Some("false"));
        assert!(get_config_value(&config, "event_name").is_none());
        assert!(get_config_value(&config, "editor").is_none());
    }

    #[test]
    fn test_every_key_is_readable() {
        for (key, _) in VALID_KEYS {
            assert!(is_valid_key(key));
        }
        assert!(!is_valid_key("author"));
    }
}
