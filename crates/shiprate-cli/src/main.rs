mod quote;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shiprate")]
#[command(about = "Distance-based shipping rate calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Calculate a shipping quote for one origin/destination pair.
    Quote {
        /// Origin as "lat,lng" or a free-form address.
        #[arg(long, allow_hyphen_values = true)]
        origin: String,
        /// Destination as "lat,lng" or a free-form address.
        #[arg(long, allow_hyphen_values = true)]
        destination: String,
        /// Cart subtotal.
        #[arg(long, default_value = "0")]
        subtotal: String,
        /// Total number of items in the cart.
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long, default_value_t = 1)]
        product_id: i64,
        /// Shipping class id of the line item, if any.
        #[arg(long)]
        shipping_class: Option<i64>,
    },
    /// List the available distance providers.
    Providers,
    /// Validate provider settings with a live test request.
    Validate {
        /// Provider slug; defaults to SHIPRATE_PROVIDER.
        #[arg(long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let log_level = std::env::var("SHIPRATE_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Quote {
            origin,
            destination,
            subtotal,
            quantity,
            product_id,
            shipping_class,
        } => {
            quote::run_quote(
                &origin,
                &destination,
                &subtotal,
                quantity,
                product_id,
                shipping_class,
            )
            .await
        }
        Commands::Providers => quote::run_providers(),
        Commands::Validate { provider } => quote::run_validate(provider.as_deref()).await,
    }
}
