//! `pronouns` binary.

use clap::{Parser, Subcommand};
use pronouns_server::{AppState, ServerConfig, init_tracing, serve};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pronouns", author, version, about = "Discord pronoun picker bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interaction webhook
    Serve {
        /// Configuration file (default: ./pronouns.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen address, overrides the configuration
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Print the effective configuration with secrets masked
    ShowConfig {
        /// Configuration file (default: ./pronouns.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind } => {
            let mut config = ServerConfig::load(config.as_deref())?;
            if let Some(bind) = bind {
                config = config.with_bind(bind);
            }
            init_tracing(config.log_level(), *config.json_logs())?;
            info!(version = env!("CARGO_PKG_VERSION"), "Starting pronouns bot");

            let state = AppState::from_config(&config).await?;
            serve(config.bind(), state).await?;
        }

        Commands::ShowConfig { config } => {
            let config = ServerConfig::load(config.as_deref())?;
            println!("{}", config.redacted());
        }
    }

    Ok(())
}
