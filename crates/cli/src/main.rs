//! Fairprice CLI - Database migrations, seeding and price quotes.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! fp-cli migrate
//!
//! # Load products, competitors and zip codes from YAML
//! fp-cli seed data/seed.yaml
//!
//! # Quote a product for a shopper
//! fp-cli quote 1 --zip 94103
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed database from a YAML file
//! - `quote` - Price a product through the proximity rule

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fp-cli")]
#[command(author, version, about = "Fairprice CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed the database from a YAML file
    Seed {
        /// Path to the seed file
        file: String,
    },
    /// Quote a product's price for a shopper zip code
    Quote {
        /// Product ID
        product_id: i32,

        /// Shopper zip code
        #[arg(short, long)]
        zip: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { file } => commands::seed::from_file(&file).await?,
        Commands::Quote { product_id, zip } => {
            commands::quote::product(product_id, zip.as_deref()).await?;
        }
    }
    Ok(())
}
