mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "wardrobe")]
#[command(about = "Find and curate shopping results for clothing searches")]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "WARDROBE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// YAML store catalog to use instead of the built-in one.
    #[arg(long, global = true, env = "WARDROBE_STORES_PATH")]
    stores: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the web for products matching a query.
    Search {
        query: String,
        #[command(flatten)]
        filters: Filters,
    },
    /// Search for each piece of an outfit concurrently.
    Outfit {
        /// One outfit piece, e.g. "white linen shirt". Repeatable.
        #[arg(long = "piece", required = true)]
        pieces: Vec<String>,
        #[command(flatten)]
        filters: Filters,
    },
    /// Explain whether URLs are accepted as product pages (offline).
    Classify {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Run the curation pipeline over a saved provider response (offline).
    Curate {
        /// Path to the provider's JSON response body.
        #[arg(long)]
        file: PathBuf,
        /// The query the response answered.
        #[arg(long)]
        query: String,
        #[command(flatten)]
        filters: Filters,
    },
}

/// Filters shared by every command that produces product records.
#[derive(Debug, Clone, Default, PartialEq, Args)]
struct Filters {
    #[arg(long)]
    budget_min: Option<f64>,
    #[arg(long)]
    budget_max: Option<f64>,
    /// Preferred store name. Repeatable.
    #[arg(long = "store")]
    prefer_stores: Vec<String>,
    #[arg(long)]
    size: Option<String>,
    #[arg(long)]
    color: Option<String>,
    /// Defaults to `WARDROBE_MAX_RESULTS` for online searches, else 10.
    #[arg(long)]
    max_results: Option<usize>,
    /// Fill missing prices with keyword-based estimates.
    #[arg(long = "estimate-prices")]
    estimate_prices: bool,
    /// Drop records scoring below this relevance (0-100).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    min_relevance: Option<u8>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let stores = cli.stores.as_deref();
    match cli.command {
        Commands::Search { query, filters } => {
            commands::run_search(&query, &filters, stores).await
        }
        Commands::Outfit { pieces, filters } => {
            commands::run_outfit(&pieces, &filters, stores).await
        }
        Commands::Classify { urls } => commands::run_classify(&urls, stores),
        Commands::Curate {
            file,
            query,
            filters,
        } => commands::run_curate(&file, &query, &filters, stores),
    }
}

#[cfg(test)]
mod tests;
