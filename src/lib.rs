pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::currency::normalize_code;
use crate::providers::ExchangeRateApiProvider;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Convert an amount once and exit
    Convert {
        amount: f64,
        from: Option<String>,
        to: Option<String>,
    },
    /// List all rates for a base currency
    Rates { base: Option<String> },
    /// Search the currency catalog
    Currencies { query: Option<String> },
    /// Start an interactive session
    Interactive {
        from: Option<String>,
        to: Option<String>,
    },
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Picks the explicit code if given, else the configured default.
fn code_or(code: Option<String>, default: &str) -> String {
    normalize_code(code.as_deref().unwrap_or(default))
}

/// Config and rate source for commands that talk to the exchange rate service.
fn load_source(config_path: Option<&str>) -> Result<(AppConfig, ExchangeRateApiProvider)> {
    let config = load_config(config_path)?;
    let source = ExchangeRateApiProvider::from_config(&config.provider)?;
    Ok((config, source))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    match command {
        AppCommand::Convert { amount, from, to } => {
            let (config, source) = load_source(config_path)?;
            let from = code_or(from, &config.base_currency);
            let to = code_or(to, &config.target_currency);
            cli::convert::run(source, amount, &from, &to).await
        }
        AppCommand::Rates { base } => {
            let (config, source) = load_source(config_path)?;
            let base = code_or(base, &config.base_currency);
            cli::rates::run(source, &base).await
        }
        AppCommand::Currencies { query } => {
            // Static catalog, no config.
            cli::currencies::run(query.as_deref());
            Ok(())
        }
        AppCommand::Interactive { from, to } => {
            let (config, source) = load_source(config_path)?;
            let from = code_or(from, &config.base_currency);
            let to = code_or(to, &config.target_currency);
            cli::session::run(source, &from, &to).await
        }
    }
}
