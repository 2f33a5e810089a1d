//! Car Price Predictor
//!
//! Command-line front end for importing the dataset, training the model
//! and estimating prices.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use car_price::commands;
use car_price::predictor::Owner;
use car_price::PipelineContext;
use clap::{Parser, Subcommand};
use config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Car Price Predictor
#[derive(Parser)]
#[command(name = "car-price")]
#[command(about = "Random forest price estimates for cars from their specifications")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Database URL (overrides `DATABASE_URL`)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Source dataset CSV (overrides `CAR_DATASET_PATH`)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Model artifact location (overrides `MODEL_PATH`)
    #[arg(long, global = true)]
    model_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,

    /// Import the source dataset if the car table is empty
    Import,

    /// Load the model, training it if no artifact exists
    Train {
        /// Discard any existing artifact and retrain
        #[arg(short, long)]
        force: bool,
    },

    /// Estimate the price of a car
    Predict {
        /// JSON file describing the car, or `-` for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// User to record the prediction for
        #[arg(short, long, default_value = "demo")]
        user: String,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// List accepted categories and numeric ranges
    Options,

    /// Show recent predictions of a user
    History {
        #[arg(short, long, default_value = "demo")]
        user: String,

        /// Maximum number of predictions to show
        #[arg(short, long, default_value = "10")]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::from_env();
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }
    if let Some(dataset) = cli.dataset {
        config.dataset_path = dataset;
    }
    if let Some(model_path) = cli.model_path {
        config.model_path = model_path;
    }

    // Connecting applies pending migrations.
    let context = Arc::new(PipelineContext::connect(&config).await?);

    match cli.command {
        Commands::Migrate => {
            info!("Migrations completed successfully");
        }
        Commands::Import => commands::import::run(&context).await?,
        Commands::Train { force } => commands::train::run(&context, force).await?,
        Commands::Predict { input, user, json } => {
            commands::predict::run(context, &input, Owner::named(&user), json).await?;
        }
        Commands::Options => commands::options::run(&context).await?,
        Commands::History { user, limit } => {
            commands::history::run(context, Owner::named(&user), limit).await?;
        }
    }

    Ok(())
}
