//! Shared helper functions for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::service::{EntityDirectory, FieldErrors, HttpClient, RegistrationService, SimulatedBackend};

/// Install the stderr log subscriber; `RUST_LOG` wins over the flags
pub fn init_logging(global: &GlobalOpts) {
    let default_level = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // a second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Effective configuration, with command-line overrides applied
pub fn load_config(global: &GlobalOpts) -> Config {
    let mut config = Config::load(global.config.as_deref());
    if global.offline {
        config.offline = Some(true);
    }
    config
}

/// Registration service and entity directory for one session
pub struct Backends {
    pub service: Box<dyn RegistrationService>,
    pub directory: Box<dyn EntityDirectory>,
}

impl Backends {
    /// Offline backend or HTTP client, as configured
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.offline() {
            tracing::debug!("using the offline backend");
            let backend = Rc::new(SimulatedBackend::new());
            return Ok(Self {
                service: Box::new(backend.clone()),
                directory: Box::new(backend),
            });
        }

        tracing::debug!("using the registration API at {}", config.api_url());
        let client = HttpClient::from_config(config).into_diagnostic()?;
        Ok(Self {
            service: Box::new(client.clone()),
            directory: Box::new(client),
        })
    }
}

/// Print per-field errors returned by the service
pub fn print_field_errors(errors: &FieldErrors) {
    for (field, messages) in errors {
        for message in messages {
            eprintln!("  {} {}: {}", style("•").red(), style(field).cyan(), message);
        }
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("¿Cuál es tu apellido?", 8), "¿Cuál...");
    }

    #[test]
    fn test_offline_backends() {
        let config = Config {
            offline: Some(true),
            ..Config::default()
        };
        let backends = Backends::from_config(&config).unwrap();
        assert!(!backends
            .directory
            .search(crate::core::EntityKind::Team, "")
            .is_empty());
    }
}
