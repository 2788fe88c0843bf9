//! House Price Predictor CLI
//!
//! A command-line client for the price prediction service: request
//! predictions, inspect the loaded model and check service health.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{model, predict};

/// House Price Predictor CLI
#[derive(Parser)]
#[command(name = "hpp")]
#[command(author, version, about = "CLI for the House Price Predictor API", long_about = None)]
pub struct Cli {
    /// API endpoint URL (falls back to ~/.config/hpp/config.json, then http://localhost:8000)
    #[arg(long, env = "HPP_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check service health
    Health,

    /// Show the loaded model's metadata
    Info,

    /// Predict the price of the reference house
    Example,

    /// Predict the price of a house
    Predict {
        /// Attribute set to start from
        #[arg(long, value_enum, default_value = "standard")]
        preset: predict::Preset,

        #[command(flatten)]
        attributes: predict::AttributeArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load()?;
    let client = client::ApiClient::new(&config.resolve_api_url(cli.api_url))?;

    match cli.command {
        Commands::Health => model::show_health(&client, cli.format).await?,
        Commands::Info => model::show_model_info(&client, cli.format).await?,
        Commands::Example => predict::example(&client, cli.format).await?,
        Commands::Predict { preset, attributes } => {
            predict::predict(&client, preset, &attributes, cli.format).await?
        }
    }

    Ok(())
}
