use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                fxconv::AppCommand::Convert { amount, from, to }
            }
            Commands::Rates { base } => fxconv::AppCommand::Rates { base },
            Commands::Currencies { query } => fxconv::AppCommand::Currencies { query },
            Commands::Interactive { from, to } => fxconv::AppCommand::Interactive { from, to },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn parse_finite(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(format!("'{value}' is not a finite number")),
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        #[arg(allow_negative_numbers = true, value_parser = parse_finite)]
        amount: f64,
        /// Currency to convert from (defaults to the configured base currency)
        from: Option<String>,
        /// Currency to convert to (defaults to the configured target currency)
        to: Option<String>,
    },
    /// List exchange rates for a base currency
    Rates {
        /// Base currency (defaults to the configured base currency)
        base: Option<String>,
    },
    /// Search supported currencies by code or name
    Currencies {
        /// Text to search for; lists popular currencies when omitted
        query: Option<String>,
    },
    /// Start an interactive conversion session
    Interactive {
        /// Currency to convert from
        #[arg(long)]
        from: Option<String>,
        /// Currency to convert to
        #[arg(long)]
        to: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
