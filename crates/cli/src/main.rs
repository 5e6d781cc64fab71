//! CarMarket Pro CLI
//!
//! A command-line client for the car price prediction service.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{health, predict, status};

/// CarMarket Pro price service CLI
#[derive(Parser)]
#[command(name = "carprice")]
#[command(author, version, about = "CLI for the CarMarket Pro price service", long_about = None)]
pub struct Cli {
    /// Service URL (can also be set via CARPRICE_API_URL env var)
    #[arg(long, env = "CARPRICE_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the service status
    Status,

    /// Estimate the price of a car
    Predict(CarArgs),

    /// Show component health
    Health,
}

/// Car attributes for a price estimate
#[derive(Args, Debug)]
pub struct CarArgs {
    #[arg(long)]
    pub brand: String,

    #[arg(long)]
    pub model: String,

    #[arg(long, allow_negative_numbers = true)]
    pub year: i64,

    /// Engine displacement in litres
    #[arg(long, allow_negative_numbers = true)]
    pub engine_size: f64,

    #[arg(long)]
    pub fuel_type: String,

    #[arg(long)]
    pub transmission: String,

    #[arg(long, allow_negative_numbers = true)]
    pub mileage: i64,

    #[arg(long)]
    pub car_type: String,

    #[arg(long)]
    pub drive_type: String,
}

impl From<CarArgs> for client::CarFeatures {
    fn from(args: CarArgs) -> Self {
        Self {
            brand: args.brand,
            model: args.model,
            year: args.year,
            engine_size: args.engine_size,
            fuel_type: args.fuel_type,
            transmission: args.transmission,
            mileage: args.mileage,
            car_type: args.car_type,
            drive_type: args.drive_type,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Status => status::show_status(&client, cli.format).await?,
        Commands::Predict(args) => {
            let car = client::CarFeatures::from(args);
            predict::predict_price(&client, &car, cli.format).await?;
        }
        Commands::Health => health::show_health(&client, cli.format).await?,
    }

    Ok(())
}
